//! Ground fog: slow horizontal wisps drifting through the bottom band.

use crate::terminal::{rgb, Terminal};
use crate::weather::WeatherSystem;
use crossterm::style::Color;
use rand::prelude::*;

const CHARS: [char; 4] = ['.', ',', '-', '~'];
const COLORS: [Color; 3] = [rgb(120, 120, 120), rgb(90, 90, 95), rgb(70, 70, 75)];

const MAX_WISPS: usize = 80;
const SPAWN_RATE: f32 = 0.05;

struct Wisp {
    x: f32,
    y: f32,
    speed: f32,
    ch: char,
    color: Color,
    life: f32,
}

pub struct FogSystem {
    rng: StdRng,
    wisps: Vec<Wisp>,
    cols: usize,
    rows: usize,
    zone_top: f32,
    zone_bottom: f32,
}

impl FogSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            wisps: Vec::new(),
            cols: 0,
            rows: 0,
            zone_top: 0.0,
            zone_bottom: 0.0,
        }
    }
}

impl WeatherSystem for FogSystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.zone_top = rows.saturating_sub(20) as f32;
        self.zone_bottom = rows.saturating_sub(3) as f32;
        self.wisps.clear();
    }

    fn update(&mut self, dt_ms: f32) {
        let s = dt_ms / 1000.0;
        let cols = self.cols as f32;

        for w in &mut self.wisps {
            w.x += w.speed * s;
            w.life -= s;
        }
        self.wisps
            .retain(|w| w.life > 0.0 && w.x >= -3.0 && w.x <= cols + 3.0);

        if self.wisps.len() < MAX_WISPS && self.rng.gen::<f32>() < SPAWN_RATE {
            let from_left = self.rng.gen::<f32>() > 0.5;
            self.wisps.push(Wisp {
                x: if from_left { -1.0 } else { cols },
                y: self.zone_top + self.rng.gen::<f32>() * (self.zone_bottom - self.zone_top),
                speed: (if from_left { 1.0f32 } else { -1.0 }) * (0.3 + self.rng.gen::<f32>() * 0.6),
                ch: CHARS[self.rng.gen_range(0..CHARS.len())],
                color: COLORS[self.rng.gen_range(0..COLORS.len())],
                life: 5.0 + self.rng.gen::<f32>() * 10.0,
            });
        }
    }

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        for w in &self.wisps {
            term.set(w.x.floor() as i32, w.y.floor() as i32, w.ch, Some(w.color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wisps_stay_in_the_ground_zone_and_capped() {
        let mut fog = FogSystem::new(2);
        fog.init(80, 30);
        for _ in 0..5000 {
            fog.update(16.0);
            assert!(fog.wisps.len() <= MAX_WISPS);
            for w in &fog.wisps {
                assert!(w.y >= 10.0 && w.y <= 27.0);
            }
        }
    }

    #[test]
    fn zone_clamps_on_short_grids() {
        let mut fog = FogSystem::new(1);
        fog.init(40, 10);
        assert_eq!(fog.zone_top, 0.0);
        assert_eq!(fog.zone_bottom, 7.0);
    }
}
