//! Fireflies wandering the lower part of the yard, pulsing on a sine glow.

use crate::terminal::{rgb, Terminal};
use crate::weather::WeatherSystem;
use rand::prelude::*;

const DIRECTION_CHANGE_CHANCE: f32 = 0.02;

struct Firefly {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    glow_phase: f32,
    glow_speed: f32,
}

pub struct FireflySystem {
    rng: StdRng,
    fireflies: Vec<Firefly>,
    cols: usize,
    rows: usize,
}

impl FireflySystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            fireflies: Vec::new(),
            cols: 0,
            rows: 0,
        }
    }
}

impl WeatherSystem for FireflySystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.fireflies.clear();

        let count = (cols / 15).max(3);
        let zone_top = rows.saturating_sub((rows as f32 * 0.4).floor() as usize) as f32;
        let zone_bottom = rows.saturating_sub(2) as f32;

        for _ in 0..count {
            self.fireflies.push(Firefly {
                x: self.rng.gen::<f32>() * cols as f32,
                y: zone_top + self.rng.gen::<f32>() * (zone_bottom - zone_top),
                vx: (self.rng.gen::<f32>() - 0.5) * 0.3,
                vy: (self.rng.gen::<f32>() - 0.5) * 0.2,
                glow_phase: self.rng.gen::<f32>() * std::f32::consts::TAU,
                glow_speed: 0.1 + self.rng.gen::<f32>() * 0.15,
            });
        }
    }

    fn update(&mut self, dt_ms: f32) {
        let s = dt_ms / 1000.0;
        let cols = self.cols as f32;
        let rows = self.rows as f32;

        for f in &mut self.fireflies {
            // Glow runs on raw milliseconds for a fast shimmer
            f.glow_phase += f.glow_speed * dt_ms;

            if self.rng.gen::<f32>() < DIRECTION_CHANGE_CHANCE {
                f.vx = (self.rng.gen::<f32>() - 0.5) * 0.3;
                f.vy = (self.rng.gen::<f32>() - 0.5) * 0.2;
            }

            f.x += f.vx * s * 15.0;
            f.y += f.vy * s * 15.0;

            if f.x < 0.0 {
                f.x = cols - 1.0;
            }
            if f.x >= cols {
                f.x = 0.0;
            }
            f.y = f.y.clamp(rows * 0.5, rows - 2.0);
        }
    }

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        for f in &self.fireflies {
            let brightness = (f.glow_phase.sin().max(0.0) * 255.0).floor() as i32;
            if brightness < 64 {
                continue;
            }

            let (ch, color) = if brightness > 200 {
                ('*', rgb(190, 175, 80))
            } else if brightness > 128 {
                ('.', rgb(160, 180, 90))
            } else {
                ('·', rgb(130, 160, 75))
            };
            term.set(f.x.floor() as i32, f.y.floor() as i32, ch, Some(color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fireflies_keep_to_the_night_zone() {
        let mut fireflies = FireflySystem::new(6);
        fireflies.init(90, 30);
        assert_eq!(fireflies.fireflies.len(), 6);
        for _ in 0..2000 {
            fireflies.update(16.0);
        }
        for f in &fireflies.fireflies {
            assert!(f.y >= 15.0 && f.y <= 28.0);
            assert!(f.x >= 0.0 && f.x < 90.0);
        }
    }
}
