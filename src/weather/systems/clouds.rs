//! Drifting clouds. Density and tint follow the configured condition.

use crate::terminal::{rgb, Terminal};
use crate::weather::service::{Condition, WeatherData};
use crate::weather::WeatherSystem;
use rand::prelude::*;

const CLOUD_SHAPES: [&[&str]; 4] = [
    &["     .--.     ", "  .-(    ).   ", " (___.__)__)  "],
    &[
        "        _ _       ",
        "      ( `  )_     ",
        "     (    )   `)  ",
        "      \\_  (___ )  ",
    ],
    &["     .--.     ", "  .-(    ).   ", " (___.__)_)   "],
    &[
        "      _ _      ",
        "    ( `  )_    ",
        "   (    )   `) ",
        "     `--'      ",
    ],
];

const SPEED_MIN: f32 = 0.5;
const SPEED_MAX: f32 = 1.5;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Density {
    Sparse,
    Medium,
    Dense,
}

impl Density {
    fn max_clouds(self, cols: usize) -> usize {
        match self {
            Density::Sparse => (cols / 40).max(1),
            Density::Medium => (cols / 25).max(2),
            Density::Dense => (cols / 15).max(3),
        }
    }

    fn spawn_chance(self) -> f32 {
        match self {
            Density::Sparse => 0.001,
            Density::Medium => 0.003,
            Density::Dense => 0.006,
        }
    }
}

struct Cloud {
    x: f32,
    y: i32,
    shape: &'static [&'static str],
    speed: f32,
}

pub struct CloudSystem {
    rng: StdRng,
    clouds: Vec<Cloud>,
    cols: usize,
    rows: usize,
    density: Density,
    dark: bool,
}

impl CloudSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            clouds: Vec::new(),
            cols: 0,
            rows: 0,
            density: Density::Medium,
            dark: false,
        }
    }
}

impl WeatherSystem for CloudSystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.clouds.clear();
    }

    fn configure(&mut self, weather: &WeatherData) {
        self.density = match weather.condition {
            Condition::Clear => Density::Sparse,
            Condition::PartlyCloudy => Density::Medium,
            _ => Density::Dense,
        };
        self.dark = matches!(
            weather.condition,
            Condition::Overcast | Condition::HeavyRain | Condition::Thunderstorm | Condition::Fog
        );
    }

    fn update(&mut self, dt_ms: f32) {
        let s = dt_ms / 1000.0;
        let max = self.density.max_clouds(self.cols);
        let cols = self.cols as f32;

        for cloud in &mut self.clouds {
            cloud.x += cloud.speed * s;
        }
        self.clouds.retain(|c| c.x <= cols + 5.0);

        if self.clouds.len() < max && self.rng.gen::<f32>() < self.density.spawn_chance() {
            let shape = CLOUD_SHAPES[self.rng.gen_range(0..CLOUD_SHAPES.len())];
            let width = shape.iter().map(|l| l.len()).max().unwrap_or(0);
            self.clouds.push(Cloud {
                x: -(width as f32),
                y: self.rng.gen_range(0..((self.rows as f32 * 0.3) as i32).max(1)),
                shape,
                speed: SPEED_MIN + self.rng.gen::<f32>() * (SPEED_MAX - SPEED_MIN),
            });
        }
    }

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        let color = if self.dark {
            rgb(90, 90, 100)
        } else {
            rgb(180, 180, 190)
        };

        for cloud in &self.clouds {
            for (row, line) in cloud.shape.iter().enumerate() {
                for (col, ch) in line.chars().enumerate() {
                    if ch == ' ' {
                        continue;
                    }
                    term.set(
                        cloud.x.floor() as i32 + col as i32,
                        cloud.y + row as i32,
                        ch,
                        Some(color),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::service::DEFAULT_WEATHER;

    #[test]
    fn density_tracks_condition() {
        let mut clouds = CloudSystem::new(1);
        clouds.init(100, 30);

        clouds.configure(&DEFAULT_WEATHER);
        assert!(clouds.density == Density::Sparse);

        clouds.configure(&WeatherData {
            condition: Condition::Thunderstorm,
            ..DEFAULT_WEATHER
        });
        assert!(clouds.density == Density::Dense);
        assert!(clouds.dark);
    }

    #[test]
    fn cloud_count_never_exceeds_density_cap() {
        let mut clouds = CloudSystem::new(8);
        clouds.init(100, 30);
        clouds.configure(&WeatherData {
            condition: Condition::Overcast,
            ..DEFAULT_WEATHER
        });
        for _ in 0..10_000 {
            clouds.update(16.0);
            assert!(clouds.clouds.len() <= Density::Dense.max_clouds(100));
        }
    }
}
