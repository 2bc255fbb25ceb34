//! Aurora curtains: fractal value noise masked by a vertical falloff so
//! the glow hangs from the top of the screen.

use crate::noise::Noise3;
use crate::pattern::Pattern;
use crate::terminal::{rgb, Terminal};
use clap::ValueEnum;
use crossterm::style::Color;
use rand::prelude::*;

const CHARS: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const OCTAVES: u32 = 3;
const PERSISTENCE: f32 = 0.5;
const LACUNARITY: f32 = 2.0;

const FALLOFF_EXPONENT: f32 = 1.5;

const AURORA_STOPS: [(f32, f32, f32); 5] = [
    (20.0, 0.0, 40.0),
    (60.0, 20.0, 120.0),
    (0.0, 180.0, 160.0),
    (80.0, 255.0, 80.0),
    (220.0, 50.0, 180.0),
];

const MONO_BASE: f32 = 40.0;
const MONO_RANGE: f32 = 180.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum AuroraPalette {
    Aurora,
    Mono,
}

#[derive(Clone)]
pub struct AuroraConfig {
    pub scale_x: f32,
    pub scale_y: f32,
    pub speed: f32,
    pub threshold: f32,
    pub palette: AuroraPalette,
    pub seed: Option<u64>,
}

impl Default for AuroraConfig {
    fn default() -> Self {
        Self {
            scale_x: 0.03,
            scale_y: 0.08,
            speed: 0.4,
            threshold: 0.3,
            palette: AuroraPalette::Aurora,
            seed: None,
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_color(normalized: f32) -> Color {
    let segment = normalized * 4.0;
    let i = (segment.floor() as usize).min(3);
    let f = segment - i as f32;

    let from = AURORA_STOPS[i];
    let to = AURORA_STOPS[i + 1];

    rgb(
        lerp(from.0, to.0, f).round() as u8,
        lerp(from.1, to.1, f).round() as u8,
        lerp(from.2, to.2, f).round() as u8,
    )
}

fn mono_color(normalized: f32) -> Color {
    let v = (normalized * MONO_RANGE + MONO_BASE).floor() as u8;
    rgb(v, v, v)
}

pub struct AuroraPattern {
    config: AuroraConfig,
    noise: Noise3,
    time: f32,
}

impl AuroraPattern {
    pub fn new(config: AuroraConfig) -> Self {
        let seed = config.seed.unwrap_or_else(crate::engine::clock_seed);
        Self {
            config,
            noise: Noise3::new(StdRng::seed_from_u64(seed).gen()),
            time: 0.0,
        }
    }
}

impl Pattern for AuroraPattern {
    fn init(&mut self, _cols: usize, _rows: usize) {
        self.time = 0.0;
    }

    fn update(&mut self, dt_ms: f32) {
        self.time += dt_ms / 1000.0;
    }

    fn render(&self, term: &mut Terminal, cols: usize, rows: usize) {
        let c = &self.config;
        let t = self.time * c.speed;
        let threshold_inv = 1.0 / (1.0 - c.threshold);
        let mono = c.palette == AuroraPalette::Mono;
        let char_max = CHARS.len() - 1;

        for row in 0..rows {
            let falloff = 1.0 - (row as f32 / rows as f32).powf(FALLOFF_EXPONENT);
            let ny = row as f32 * c.scale_y;

            for col in 0..cols {
                let raw = self
                    .noise
                    .fractal(col as f32 * c.scale_x, ny, t, OCTAVES, PERSISTENCE, LACUNARITY);
                let value = raw * falloff;

                if value <= c.threshold {
                    continue;
                }

                let normalized = ((value - c.threshold) * threshold_inv).min(1.0);
                let ch = CHARS[(normalized * char_max as f32).floor() as usize];
                if ch == ' ' {
                    continue;
                }

                let color = if mono {
                    mono_color(normalized)
                } else {
                    lerp_color(normalized)
                };
                term.set(col as i32, row as i32, ch, Some(color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_endpoints_match_stops() {
        assert_eq!(lerp_color(0.0), rgb(20, 0, 40));
        assert_eq!(lerp_color(1.0), rgb(220, 50, 180));
    }

    #[test]
    fn bottom_row_is_fully_attenuated() {
        let mut aurora = AuroraPattern::new(AuroraConfig {
            seed: Some(3),
            ..AuroraConfig::default()
        });
        aurora.init(60, 20);
        aurora.update(4000.0);
        let mut term = Terminal::headless(60, 20);
        aurora.render(&mut term, 60, 20);

        // falloff at the last row is 1 - ((rows-1)/rows)^1.5, well under the
        // 0.3 threshold for any fractal value in [0,1]
        for x in 0..60 {
            assert!(term.get(x, 19).unwrap().ch.is_none());
        }
    }

    #[test]
    fn rendering_is_deterministic_for_a_seed() {
        let mut a = AuroraPattern::new(AuroraConfig {
            seed: Some(44),
            ..AuroraConfig::default()
        });
        let mut b = AuroraPattern::new(AuroraConfig {
            seed: Some(44),
            ..AuroraConfig::default()
        });
        a.init(40, 15);
        b.init(40, 15);
        a.update(700.0);
        b.update(700.0);

        let mut ta = Terminal::headless(40, 15);
        let mut tb = Terminal::headless(40, 15);
        a.render(&mut ta, 40, 15);
        b.render(&mut tb, 40, 15);

        for y in 0..15 {
            for x in 0..40 {
                assert_eq!(ta.get(x, y).unwrap().ch, tb.get(x, y).unwrap().ch);
            }
        }
    }
}
