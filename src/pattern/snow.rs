//! Snowfall on two depth layers; background flakes fall slower, sway less,
//! and draw dimmer.

use crate::pattern::Pattern;
use crate::terminal::{rgb, Terminal};
use crossterm::style::Color;
use rand::prelude::*;

const SPAWN_MARGIN: f32 = 0.2;
const SWAY_FREQUENCY: f32 = 0.2;
const SWAY_PHASE_RANGE: f32 = std::f32::consts::TAU * 50.0;
const RESPAWN_Y_MIN: f32 = -1.0;
const RESPAWN_Y_MAX: f32 = -3.0;
const SPEED_CHAR_LOW: f32 = 0.33;
const SPEED_CHAR_HIGH: f32 = 0.66;

const COLOR_BG: Color = rgb(100, 100, 100);
const COLOR_FG: Color = rgb(220, 220, 220);

#[derive(Clone)]
pub struct SnowConfig {
    pub density: f32, // flakes per column
    pub speed_range: (f32, f32),
    pub sway_amount: f32,
    pub wind: f32,
    pub seed: Option<u64>,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            density: 0.4,
            speed_range: (1.0, 4.0),
            sway_amount: 1.0,
            wind: 0.0,
            seed: None,
        }
    }
}

struct Flake {
    ch: char,
    background: bool,
    speed_y: f32,
    sway_amplitude: f32,
    sway_offset: f32,
    x: f32,
    y: f32,
}

fn char_for_speed(speed_y: f32, min: f32, max: f32) -> char {
    let t = (speed_y - min) / (max - min);
    if t < SPEED_CHAR_LOW {
        '.'
    } else if t > SPEED_CHAR_HIGH {
        '*'
    } else {
        '+'
    }
}

pub struct SnowPattern {
    config: SnowConfig,
    rng: StdRng,
    flakes: Vec<Flake>,
    cols: usize,
    rows: usize,
}

impl SnowPattern {
    pub fn new(config: SnowConfig) -> Self {
        let seed = config.seed.unwrap_or_else(crate::engine::clock_seed);
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            flakes: Vec::new(),
            cols: 0,
            rows: 0,
        }
    }

    fn make_flake(&mut self, initial_spread: bool) -> Flake {
        let (min, max) = self.config.speed_range;
        let background = self.rng.gen::<f32>() < 0.5;
        let mid = (min + max) / 2.0;

        // Background layer takes the slow half of the speed range
        let speed_y = if background {
            self.rng.gen_range(min..mid)
        } else {
            self.rng.gen_range(mid..max)
        };
        let sway_amplitude = if background {
            self.config.sway_amount * 0.5
        } else {
            self.config.sway_amount
        };

        let spawn_min = -(self.cols as f32) * SPAWN_MARGIN;
        let spawn_max = self.cols as f32 * (1.0 + SPAWN_MARGIN);

        Flake {
            ch: char_for_speed(speed_y, min, max),
            background,
            speed_y,
            sway_amplitude,
            sway_offset: self.rng.gen::<f32>() * SWAY_PHASE_RANGE,
            x: self.rng.gen_range(spawn_min..spawn_max),
            y: if initial_spread {
                self.rng.gen_range(0.0..self.rows as f32)
            } else {
                self.rng.gen_range(RESPAWN_Y_MAX..RESPAWN_Y_MIN)
            },
        }
    }
}

impl Pattern for SnowPattern {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        let count = (cols as f32 * self.config.density).floor() as usize;
        self.flakes = (0..count).map(|_| self.make_flake(true)).collect();
    }

    fn update(&mut self, dt_ms: f32) {
        let s = dt_ms / 1000.0;
        let wind = self.config.wind;
        let rows = self.rows as f32;

        for flake in &mut self.flakes {
            flake.y += flake.speed_y * s;
            flake.x += (flake.y * SWAY_FREQUENCY + flake.sway_offset).sin()
                * flake.sway_amplitude
                * s;
            flake.x += wind * s;
        }

        let spawn_min = -(self.cols as f32) * SPAWN_MARGIN;
        let spawn_max = self.cols as f32 * (1.0 + SPAWN_MARGIN);
        for i in 0..self.flakes.len() {
            if self.flakes[i].y > rows {
                self.flakes[i].y = self.rng.gen_range(RESPAWN_Y_MAX..RESPAWN_Y_MIN);
                self.flakes[i].x = self.rng.gen_range(spawn_min..spawn_max);
            }
        }
    }

    fn render(&self, term: &mut Terminal, cols: usize, rows: usize) {
        for flake in &self.flakes {
            let col = flake.x.floor() as i32;
            let row = flake.y.floor() as i32;
            if col < 0 || col >= cols as i32 || row < 0 || row >= rows as i32 {
                continue;
            }

            let color = if flake.background { COLOR_BG } else { COLOR_FG };
            term.set(col, row, flake.ch, Some(color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flake_count_scales_with_density() {
        let mut snow = SnowPattern::new(SnowConfig {
            seed: Some(6),
            ..SnowConfig::default()
        });
        snow.init(100, 30);
        assert_eq!(snow.flakes.len(), 40);
    }

    #[test]
    fn flakes_respawn_above_the_top() {
        let mut snow = SnowPattern::new(SnowConfig {
            seed: Some(2),
            ..SnowConfig::default()
        });
        snow.init(50, 20);
        for flake in &mut snow.flakes {
            flake.y = 25.0;
        }
        snow.update(16.0);
        for flake in &snow.flakes {
            assert!(flake.y < 0.0, "flake not recycled: y = {}", flake.y);
            assert!(flake.y >= RESPAWN_Y_MAX);
        }
    }

    #[test]
    fn wind_drifts_flakes_horizontally() {
        let mut snow = SnowPattern::new(SnowConfig {
            wind: 10.0,
            sway_amount: 0.0,
            seed: Some(5),
            ..SnowConfig::default()
        });
        snow.init(50, 20);
        for flake in &mut snow.flakes {
            flake.y = 0.0;
        }
        let before: Vec<f32> = snow.flakes.iter().map(|f| f.x).collect();
        snow.update(1000.0);
        for (flake, x0) in snow.flakes.iter().zip(before) {
            assert!(flake.x > x0);
        }
    }
}
