//! Chimney smoke: particles rising and drifting from the house chimney,
//! aging through softer glyphs. Rain puts the fire out.

use crate::terminal::{rgb, Terminal};
use crate::weather::service::{Condition, WeatherData};
use crate::weather::systems::scene;
use crate::weather::WeatherSystem;
use rand::prelude::*;

const MAX_PARTICLES: usize = 30;
const SPAWN_INTERVAL: f32 = 0.5;

struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    age: f32,
    max_age: f32,
}

pub struct SmokeSystem {
    rng: StdRng,
    particles: Vec<Particle>,
    cols: usize,
    rows: usize,
    spawn_timer: f32,
    suppressed: bool,
}

impl SmokeSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            particles: Vec::new(),
            cols: 0,
            rows: 0,
            spawn_timer: 0.0,
            suppressed: false,
        }
    }
}

impl WeatherSystem for SmokeSystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.particles.clear();
        self.spawn_timer = 0.0;
    }

    fn configure(&mut self, weather: &WeatherData) {
        self.suppressed = matches!(
            weather.condition,
            Condition::Rain | Condition::HeavyRain | Condition::Drizzle | Condition::Thunderstorm
        );
    }

    fn update(&mut self, dt_ms: f32) {
        let s = dt_ms / 1000.0;

        for p in &mut self.particles {
            p.x += p.vx * s * 15.0;
            p.y += p.vy * s * 15.0;
            p.age += s;
        }
        self.particles.retain(|p| p.age < p.max_age && p.y >= 0.0);

        if self.suppressed {
            return;
        }

        self.spawn_timer += s;
        if self.spawn_timer >= SPAWN_INTERVAL && self.particles.len() < MAX_PARTICLES {
            self.spawn_timer = 0.0;
            let (cx, cy) = scene::chimney_position(self.cols, self.rows);
            self.particles.push(Particle {
                x: cx as f32 + (self.rng.gen::<f32>() - 0.5) * 2.0,
                y: cy as f32,
                vx: self.rng.gen::<f32>() * 0.3 - 0.15,
                vy: -0.5 - self.rng.gen::<f32>() * 0.3,
                age: 0.0,
                max_age: 2.0 + self.rng.gen::<f32>(),
            });
        }
    }

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        for p in &self.particles {
            let ch = if p.age < 0.5 {
                'o'
            } else if p.age < 1.0 {
                '.'
            } else if p.age < 1.5 {
                '~'
            } else {
                '·'
            };
            let v = (200.0 - p.age * 50.0).max(60.0).floor() as u8;
            term.set(p.x.floor() as i32, p.y.floor() as i32, ch, Some(rgb(v, v, v)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::service::DEFAULT_WEATHER;

    #[test]
    fn smoke_rises_from_the_chimney() {
        let mut smoke = SmokeSystem::new(4);
        smoke.init(120, 40);
        smoke.update(600.0);
        assert_eq!(smoke.particles.len(), 1);
        let (cx, cy) = scene::chimney_position(120, 40);
        let p = &smoke.particles[0];
        assert!((p.x - cx as f32).abs() <= 3.0);
        assert!(p.y <= cy as f32);
    }

    #[test]
    fn rain_suppresses_new_smoke_but_not_existing() {
        let mut smoke = SmokeSystem::new(8);
        smoke.init(120, 40);
        smoke.update(600.0);
        assert_eq!(smoke.particles.len(), 1);

        let mut rainy = DEFAULT_WEATHER;
        rainy.condition = Condition::HeavyRain;
        smoke.configure(&rainy);

        let y_before = smoke.particles[0].y;
        smoke.update(600.0);
        assert_eq!(smoke.particles.len(), 1);
        assert!(smoke.particles[0].y < y_before);
    }

    #[test]
    fn particles_expire() {
        let mut smoke = SmokeSystem::new(12);
        smoke.init(120, 40);
        smoke.update(600.0);
        for _ in 0..20 {
            smoke.suppressed = true;
            smoke.update(500.0);
        }
        assert!(smoke.particles.is_empty());
    }
}
