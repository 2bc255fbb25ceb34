//! Weather rain layer: wind-sheared drops on two depth planes with
//! three-frame ground splashes.

use crate::terminal::{rgb, Terminal};
use crate::weather::service::{Condition, WeatherData};
use crate::weather::WeatherSystem;
use rand::prelude::*;

const SPLASH_CHARS: [char; 3] = ['.', 'o', 'O'];
const SPLASH_FRAME_DURATION: f32 = 0.1;
const MAX_SPLASHES: usize = 100;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Intensity {
    Drizzle,
    Light,
    Heavy,
    Storm,
}

struct IntensityConfig {
    count: usize,
    speed_min: f32,
    speed_max: f32,
    splash_chance: f32,
}

impl Intensity {
    fn config(self, cols: usize) -> IntensityConfig {
        match self {
            Intensity::Drizzle => IntensityConfig {
                count: (cols as f32 * 0.25) as usize,
                speed_min: 8.0,
                speed_max: 14.0,
                splash_chance: 0.1,
            },
            Intensity::Light => IntensityConfig {
                count: (cols as f32 * 0.5) as usize,
                speed_min: 14.0,
                speed_max: 28.0,
                splash_chance: 0.25,
            },
            Intensity::Heavy => IntensityConfig {
                count: cols,
                speed_min: 24.0,
                speed_max: 40.0,
                splash_chance: 0.45,
            },
            Intensity::Storm => IntensityConfig {
                count: (cols as f32 * 1.5) as usize,
                speed_min: 32.0,
                speed_max: 50.0,
                splash_chance: 0.6,
            },
        }
    }

    // (foreground, background) drop glyphs
    fn drop_chars(self, wind_x: f32) -> (char, char) {
        match self {
            Intensity::Storm => {
                let ch = if wind_x < -0.5 {
                    '/'
                } else if wind_x > 0.5 {
                    '\\'
                } else {
                    '|'
                };
                (ch, ch)
            }
            Intensity::Drizzle => (',', '.'),
            _ => ('|', ':'),
        }
    }
}

struct Drop {
    x: f32,
    y: f32,
    speed: f32,
    foreground: bool,
}

struct Splash {
    x: i32,
    y: i32,
    frame: usize,
    timer: f32,
}

pub struct RainSystem {
    rng: StdRng,
    drops: Vec<Drop>,
    splashes: Vec<Splash>,
    cols: usize,
    rows: usize,
    intensity: Intensity,
    wind_x: f32,
}

impl RainSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            drops: Vec::new(),
            splashes: Vec::new(),
            cols: 0,
            rows: 0,
            intensity: Intensity::Light,
            wind_x: 0.0,
        }
    }

    fn create_drop(&mut self, random_y: bool) -> Drop {
        let cfg = self.intensity.config(self.cols);
        let foreground = self.rng.gen::<f32>() > 0.5;
        let speed_factor = if foreground { 1.0 } else { 0.6 };
        let cols = self.cols as f32;

        Drop {
            x: self.rng.gen::<f32>() * cols * 2.0 - cols * 0.5,
            y: if random_y {
                self.rng.gen::<f32>() * self.rows as f32
            } else {
                -(self.rng.gen::<f32>() * 5.0)
            },
            speed: (cfg.speed_min + self.rng.gen::<f32>() * (cfg.speed_max - cfg.speed_min))
                * speed_factor,
            foreground,
        }
    }

    fn adjust_drop_count(&mut self) {
        let target = self.intensity.config(self.cols).count;
        while self.drops.len() < target {
            let drop = self.create_drop(true);
            self.drops.push(drop);
        }
        self.drops.truncate(target);
    }
}

impl WeatherSystem for RainSystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.drops.clear();
        self.splashes.clear();
    }

    fn configure(&mut self, weather: &WeatherData) {
        self.intensity = match weather.condition {
            Condition::Drizzle => Intensity::Drizzle,
            Condition::Rain => Intensity::Light,
            Condition::HeavyRain => Intensity::Heavy,
            Condition::Thunderstorm => Intensity::Storm,
            _ => Intensity::Light,
        };

        let rad = weather.wind_direction.to_radians();
        self.wind_x = weather.wind_speed / 40.0 * -rad.sin();

        self.adjust_drop_count();
    }

    fn update(&mut self, dt_ms: f32) {
        let s = dt_ms / 1000.0;
        let cfg = self.intensity.config(self.cols);
        let rows = self.rows as f32;
        let wind_x = self.wind_x;

        for i in 0..self.drops.len() {
            self.drops[i].y += self.drops[i].speed * s;
            self.drops[i].x += wind_x * self.drops[i].speed * 0.3 * s;

            if self.drops[i].y >= rows {
                if self.drops[i].foreground
                    && self.splashes.len() < MAX_SPLASHES
                    && self.rng.gen::<f32>() < cfg.splash_chance
                {
                    self.splashes.push(Splash {
                        x: self.drops[i].x.floor() as i32,
                        y: self.rows as i32 - 1,
                        frame: 0,
                        timer: 0.0,
                    });
                }
                self.drops[i] = self.create_drop(false);
            }
        }

        for splash in &mut self.splashes {
            splash.timer += s;
            if splash.timer >= SPLASH_FRAME_DURATION {
                splash.timer -= SPLASH_FRAME_DURATION;
                splash.frame += 1;
            }
        }
        self.splashes.retain(|sp| sp.frame < SPLASH_CHARS.len());
    }

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        let (fg_char, bg_char) = self.intensity.drop_chars(self.wind_x);
        let cyan_tint = matches!(self.intensity, Intensity::Drizzle | Intensity::Heavy);

        for drop in &self.drops {
            let gx = drop.x.floor() as i32;
            let gy = drop.y.floor() as i32;
            if drop.foreground {
                let color = if cyan_tint {
                    rgb(100, 200, 220)
                } else {
                    rgb(200, 200, 210)
                };
                term.set(gx, gy, fg_char, Some(color));
            } else {
                term.set(gx, gy, bg_char, Some(rgb(80, 80, 90)));
            }
        }

        for splash in &self.splashes {
            term.set(
                splash.x,
                splash.y,
                SPLASH_CHARS[splash.frame],
                Some(rgb(150, 180, 200)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::service::DEFAULT_WEATHER;

    #[test]
    fn drop_count_follows_intensity() {
        let mut rain = RainSystem::new(3);
        rain.init(100, 30);

        rain.configure(&WeatherData {
            condition: Condition::Drizzle,
            ..DEFAULT_WEATHER
        });
        assert_eq!(rain.drops.len(), 25);

        rain.configure(&WeatherData {
            condition: Condition::Thunderstorm,
            ..DEFAULT_WEATHER
        });
        assert_eq!(rain.drops.len(), 150);

        rain.configure(&WeatherData {
            condition: Condition::Drizzle,
            ..DEFAULT_WEATHER
        });
        assert_eq!(rain.drops.len(), 25);
    }

    #[test]
    fn splashes_never_exceed_cap() {
        let mut rain = RainSystem::new(5);
        rain.init(200, 10);
        rain.configure(&WeatherData {
            condition: Condition::Thunderstorm,
            ..DEFAULT_WEATHER
        });
        for _ in 0..2000 {
            rain.update(16.0);
            assert!(rain.splashes.len() <= MAX_SPLASHES);
        }
    }

    #[test]
    fn storm_drop_char_leans_with_wind() {
        assert_eq!(Intensity::Storm.drop_chars(-1.0).0, '/');
        assert_eq!(Intensity::Storm.drop_chars(1.0).0, '\\');
        assert_eq!(Intensity::Storm.drop_chars(0.0).0, '|');
    }
}
