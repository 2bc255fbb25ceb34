//! Animation patterns
//!
//! Each pattern is a self-contained simulation driven by the render loop
//! engine through one interface: (re)allocate on `init`, advance time in
//! `update`, paint in `render`.

pub mod aurora;
pub mod bonsai;
pub mod fire;
pub mod rain;
pub mod snow;
pub mod waves;

use crate::terminal::Terminal;

/// The polymorphic unit the engine drives.
pub trait Pattern {
    /// (Re)allocate all state sized to the grid. Called on first activation
    /// and on every resize.
    fn init(&mut self, cols: usize, rows: usize);

    /// Advance simulation time; no drawing.
    fn update(&mut self, dt_ms: f32);

    /// Paint only; simulation state is not mutated.
    fn render(&self, term: &mut Terminal, cols: usize, rows: usize);

    /// Release resources when swapped out.
    fn dispose(&mut self) {}
}
