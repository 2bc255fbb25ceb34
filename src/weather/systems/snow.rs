//! Weather snow layer: swaying flakes on two depth planes.

use crate::terminal::{rgb, Terminal};
use crate::weather::service::{Condition, WeatherData};
use crate::weather::WeatherSystem;
use rand::prelude::*;

const CHARS: [char; 3] = ['.', '·', '*'];
const SPAWN_WIDTH_FACTOR: f32 = 3.0;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Intensity {
    Light,
    Medium,
    Heavy,
}

impl Intensity {
    fn count(self, cols: usize) -> usize {
        match self {
            Intensity::Light => (cols as f32 * 0.3) as usize,
            Intensity::Medium => (cols as f32 * 0.6) as usize,
            Intensity::Heavy => cols,
        }
    }
}

struct Flake {
    x: f32,
    y: f32,
    speed: f32,
    sway_offset: f32,
    foreground: bool,
    ch: char,
}

pub struct SnowSystem {
    rng: StdRng,
    flakes: Vec<Flake>,
    cols: usize,
    rows: usize,
    intensity: Intensity,
    wind_x: f32,
}

impl SnowSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            flakes: Vec::new(),
            cols: 0,
            rows: 0,
            intensity: Intensity::Medium,
            wind_x: 0.0,
        }
    }

    fn create_flake(&mut self, random_y: bool) -> Flake {
        let foreground = self.rng.gen::<f32>() > 0.5;
        let speed = if foreground {
            1.5 + self.rng.gen::<f32>() * 2.5
        } else {
            0.5 + self.rng.gen::<f32>() * 1.5
        };

        let char_idx = if speed < 1.5 {
            0
        } else if speed > 3.0 {
            2
        } else {
            1
        };
        let spawn_w = self.cols as f32 * SPAWN_WIDTH_FACTOR;

        Flake {
            x: self.rng.gen::<f32>() * spawn_w - (spawn_w - self.cols as f32) / 2.0,
            y: if random_y {
                self.rng.gen::<f32>() * self.rows as f32
            } else {
                -(self.rng.gen::<f32>() * 5.0)
            },
            speed,
            sway_offset: self.rng.gen::<f32>() * 100.0,
            foreground,
            ch: CHARS[char_idx],
        }
    }

    fn adjust_flake_count(&mut self) {
        let target = self.intensity.count(self.cols);
        while self.flakes.len() < target {
            let flake = self.create_flake(true);
            self.flakes.push(flake);
        }
        self.flakes.truncate(target);
    }
}

impl WeatherSystem for SnowSystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.flakes.clear();
    }

    fn configure(&mut self, weather: &WeatherData) {
        self.intensity = match weather.condition {
            Condition::HeavySnow => Intensity::Heavy,
            Condition::Snow => Intensity::Medium,
            _ => Intensity::Light,
        };

        let rad = weather.wind_direction.to_radians();
        self.wind_x = weather.wind_speed / 20.0 * -rad.sin();

        self.adjust_flake_count();
    }

    fn update(&mut self, dt_ms: f32) {
        let s = dt_ms / 1000.0;
        let rows = self.rows as f32;
        let wind_x = self.wind_x;

        for i in 0..self.flakes.len() {
            let f = &mut self.flakes[i];
            f.y += f.speed * s;
            f.x += (f.y * 0.2 + f.sway_offset).sin() * 0.5 * s;
            f.x += wind_x * s;

            if self.flakes[i].y > rows {
                self.flakes[i] = self.create_flake(false);
            }
        }
    }

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        for f in &self.flakes {
            let color = if f.foreground {
                rgb(220, 220, 230)
            } else {
                rgb(100, 100, 110)
            };
            term.set(f.x.floor() as i32, f.y.floor() as i32, f.ch, Some(color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::service::DEFAULT_WEATHER;

    #[test]
    fn flake_count_follows_intensity() {
        let mut snow = SnowSystem::new(11);
        snow.init(100, 30);

        snow.configure(&WeatherData {
            condition: Condition::Snow,
            ..DEFAULT_WEATHER
        });
        assert_eq!(snow.flakes.len(), 60);

        snow.configure(&WeatherData {
            condition: Condition::HeavySnow,
            ..DEFAULT_WEATHER
        });
        assert_eq!(snow.flakes.len(), 100);
    }

    #[test]
    fn flakes_recycle_at_the_bottom() {
        let mut snow = SnowSystem::new(4);
        snow.init(60, 20);
        snow.configure(&WeatherData {
            condition: Condition::Snow,
            ..DEFAULT_WEATHER
        });
        for f in &mut snow.flakes {
            f.y = 25.0;
        }
        snow.update(16.0);
        for f in &snow.flakes {
            assert!(f.y <= 0.0);
        }
    }
}
