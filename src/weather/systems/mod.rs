//! The diorama's sub-simulations, listed in back-to-front render order
//! by the orchestrator.

pub mod airplane;
pub mod birds;
pub mod clouds;
pub mod fireflies;
pub mod fog;
pub mod leaves;
pub mod lightning;
pub mod moon;
pub mod rain;
pub mod scene;
pub mod smoke;
pub mod snow;
pub mod stars;
pub mod sun;
