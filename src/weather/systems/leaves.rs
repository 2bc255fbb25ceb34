//! Falling autumn leaves, tumbling between two glyphs as they sway.

use crate::terminal::{rgb, Terminal};
use crate::weather::service::WeatherData;
use crate::weather::WeatherSystem;
use crossterm::style::Color;
use rand::prelude::*;

const COLORS: [Color; 6] = [
    rgb(255, 165, 0),
    rgb(218, 165, 32),
    rgb(184, 134, 11),
    rgb(205, 92, 92),
    rgb(160, 82, 45),
    rgb(139, 69, 19),
];

const CHAR_PAIRS: [(char, char); 3] = [('*', '+'), (',', '.'), ('~', '-')];

const MAX_LEAVES: usize = 15;
const SPAWN_CHANCE: f32 = 0.008;

struct Leaf {
    x: f32,
    y: f32,
    speed: f32,
    sway_phase: f32,
    sway_amplitude: f32,
    color: Color,
    char_pair: (char, char),
}

pub struct LeavesSystem {
    rng: StdRng,
    leaves: Vec<Leaf>,
    cols: usize,
    rows: usize,
    wind_x: f32,
}

impl LeavesSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            leaves: Vec::new(),
            cols: 0,
            rows: 0,
            wind_x: 0.0,
        }
    }
}

impl WeatherSystem for LeavesSystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.leaves.clear();
    }

    fn configure(&mut self, weather: &WeatherData) {
        let rad = weather.wind_direction.to_radians();
        self.wind_x = weather.wind_speed / 30.0 * -rad.sin();
    }

    fn update(&mut self, dt_ms: f32) {
        let s = dt_ms / 1000.0;
        let cols = self.cols as f32;
        let rows = self.rows as f32;
        let wind_x = self.wind_x;

        for l in &mut self.leaves {
            l.y += l.speed * s;
            l.sway_phase += s * 2.0;
            l.x += l.sway_phase.sin() * l.sway_amplitude * 0.1 * 15.0 * s;
            l.x += wind_x * s;
        }
        self.leaves
            .retain(|l| l.y <= rows && l.x >= -5.0 && l.x <= cols + 5.0);

        if self.leaves.len() < MAX_LEAVES && self.rng.gen::<f32>() < SPAWN_CHANCE {
            self.leaves.push(Leaf {
                x: self.rng.gen::<f32>() * cols,
                y: -1.0,
                speed: 1.5 + self.rng.gen::<f32>() * 2.0,
                sway_phase: self.rng.gen::<f32>() * std::f32::consts::TAU,
                sway_amplitude: 0.5 + self.rng.gen::<f32>() * 1.5,
                color: COLORS[self.rng.gen_range(0..COLORS.len())],
                char_pair: CHAR_PAIRS[self.rng.gen_range(0..CHAR_PAIRS.len())],
            });
        }
    }

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        for l in &self.leaves {
            // |sin| < 1 floors to 0 almost always; the second glyph only
            // shows at the exact peak, a brief tumble
            let flipped = (l.sway_phase * 2.0).sin().abs().floor() as usize == 1;
            let ch = if flipped { l.char_pair.1 } else { l.char_pair.0 };
            term.set(l.x.floor() as i32, l.y.floor() as i32, ch, Some(l.color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_count_is_capped() {
        let mut leaves = LeavesSystem::new(19);
        leaves.init(70, 25);
        for _ in 0..20_000 {
            leaves.update(16.0);
            assert!(leaves.leaves.len() <= MAX_LEAVES);
        }
    }
}
