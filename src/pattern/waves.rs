//! Rolling ocean surface from three stacked sine waves plus a noise term
//! for chop. Character pairs alternate on a checkerboard to break up the
//! horizontal banding.

use crate::noise::Noise3;
use crate::pattern::Pattern;
use crate::terminal::{rgb, Terminal};
use clap::ValueEnum;
use crossterm::style::Color;
use rand::prelude::*;
use std::f32::consts::TAU;

const CHAR_TIERS: [(f32, char, char); 4] = [
    (0.75, '~', '^'),
    (0.55, '~', '≈'),
    (0.35, '-', '='),
    (0.15, '░', '▒'),
];

const FALLBACK_CHARS: (char, char) = ('.', ' ');

const OCEAN_COLORS: [(f32, Color); 4] = [
    (0.75, rgb(230, 240, 255)),
    (0.55, rgb(100, 180, 255)),
    (0.35, rgb(40, 100, 200)),
    (0.15, rgb(20, 50, 120)),
];

const OCEAN_COLOR_DARK: Color = rgb(10, 20, 40);

const MONO_BASE: f32 = 30.0;
const MONO_RANGE: f32 = 200.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum WavePalette {
    Ocean,
    Mono,
}

#[derive(Clone)]
pub struct WaveConfig {
    pub amplitude: f32,
    pub choppiness: f32,
    pub frequency: f32,
    pub speed: f32,
    pub palette: WavePalette,
    pub seed: Option<u64>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.8,
            choppiness: 0.3,
            frequency: 1.5,
            speed: 1.0,
            palette: WavePalette::Ocean,
            seed: None,
        }
    }
}

fn pick_char(col: usize, row: usize, a: char, b: char) -> char {
    if (col + row * 7) % 2 == 0 {
        a
    } else {
        b
    }
}

fn ocean_color(value: f32) -> Color {
    for (threshold, color) in OCEAN_COLORS {
        if value > threshold {
            return color;
        }
    }
    OCEAN_COLOR_DARK
}

fn mono_color(value: f32) -> Color {
    let v = (value * MONO_RANGE + MONO_BASE).floor() as u8;
    rgb(v, v, v)
}

pub struct WavePattern {
    config: WaveConfig,
    noise: Noise3,
    time: f32,
}

impl WavePattern {
    pub fn new(config: WaveConfig) -> Self {
        let seed = config.seed.unwrap_or_else(crate::engine::clock_seed);
        Self {
            config,
            noise: Noise3::new(StdRng::seed_from_u64(seed).gen()),
            time: 0.0,
        }
    }

    fn height_at(&self, x: f32, y: f32, t: f32) -> f32 {
        let c = &self.config;
        (x * c.frequency * TAU + t * c.speed).sin() * c.amplitude
            + (x * c.frequency * 1.5 * TAU + t * c.speed * 1.3).sin() * c.amplitude * 0.5
            + (x * c.frequency * 2.5 * TAU + t * c.speed * 0.7).sin() * c.amplitude * 0.3
            + self.noise.sample(x * 3.0, y * 3.0, t * 0.5) * c.choppiness
            + (y * 3.0 + t).sin() * c.amplitude * 0.3
    }
}

impl Pattern for WavePattern {
    fn init(&mut self, _cols: usize, _rows: usize) {
        self.time = 0.0;
    }

    fn update(&mut self, dt_ms: f32) {
        self.time += dt_ms / 1000.0;
    }

    fn render(&self, term: &mut Terminal, cols: usize, rows: usize) {
        let c = &self.config;
        let t = self.time;
        let max_h = 2.1 * c.amplitude + c.choppiness;
        let range = 2.0 * max_h;
        let mono = c.palette == WavePalette::Mono;

        for row in 0..rows {
            for col in 0..cols {
                let x = col as f32 / cols as f32;
                let y = row as f32 / rows as f32;

                let h = self.height_at(x, y, t);
                let value = ((h + max_h) / range).clamp(0.0, 1.0);

                let mut ch = pick_char(col, row, FALLBACK_CHARS.0, FALLBACK_CHARS.1);
                for (threshold, a, b) in CHAR_TIERS {
                    if value > threshold {
                        ch = pick_char(col, row, a, b);
                        break;
                    }
                }

                if ch == ' ' {
                    continue;
                }

                let color = if mono { mono_color(value) } else { ocean_color(value) };
                term.set(col as i32, row as i32, ch, Some(color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_stays_inside_normalization_bounds() {
        let waves = WavePattern::new(WaveConfig {
            seed: Some(12),
            ..WaveConfig::default()
        });
        let c = &waves.config;
        let max_h = 2.1 * c.amplitude + c.choppiness;
        for i in 0..1000 {
            let t = i as f32 * 0.05;
            let h = waves.height_at((i % 80) as f32 / 80.0, (i % 24) as f32 / 24.0, t);
            assert!(h.abs() <= max_h + 1e-4, "height {h} exceeds bound {max_h}");
        }
    }

    #[test]
    fn checkerboard_alternates() {
        assert_eq!(pick_char(0, 0, 'a', 'b'), 'a');
        assert_eq!(pick_char(1, 0, 'a', 'b'), 'b');
        assert_eq!(pick_char(0, 1, 'a', 'b'), 'b');
        assert_eq!(pick_char(1, 1, 'a', 'b'), 'a');
    }

    #[test]
    fn render_fills_grid() {
        let mut waves = WavePattern::new(WaveConfig {
            seed: Some(1),
            ..WaveConfig::default()
        });
        waves.init(40, 12);
        waves.update(500.0);
        let mut term = Terminal::headless(40, 12);
        waves.render(&mut term, 40, 12);
        let painted = (0..12)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| term.get(x, y).and_then(|c| c.ch).is_some())
            .count();
        assert!(painted > 0);
    }
}
