//! Birds crossing the sky left to right, flapping between two glyphs.

use crate::terminal::{rgb, Terminal};
use crate::weather::WeatherSystem;
use rand::prelude::*;

const MAX_BIRDS: usize = 3;
const SPAWN_CHANCE: f32 = 0.005;
const FLAP_INTERVAL: f32 = 0.15;

struct Bird {
    x: f32,
    y: i32,
    speed: f32,
    flap_timer: f32,
    wings_up: bool,
}

pub struct BirdSystem {
    rng: StdRng,
    birds: Vec<Bird>,
    cols: usize,
    rows: usize,
}

impl BirdSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            birds: Vec::new(),
            cols: 0,
            rows: 0,
        }
    }
}

impl WeatherSystem for BirdSystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.birds.clear();
    }

    fn update(&mut self, dt_ms: f32) {
        let s = dt_ms / 1000.0;
        let cols = self.cols as f32;

        for b in &mut self.birds {
            b.x += b.speed * s;
            b.flap_timer += s;

            if b.flap_timer >= FLAP_INTERVAL {
                b.flap_timer -= FLAP_INTERVAL;
                b.wings_up = !b.wings_up;
            }
        }
        self.birds.retain(|b| b.x <= cols + 3.0);

        if self.birds.len() < MAX_BIRDS && self.rng.gen::<f32>() < SPAWN_CHANCE {
            let y_range = ((self.rows as f32 * 0.3) as i32).max(1);
            self.birds.push(Bird {
                x: -2.0,
                y: 2 + self.rng.gen_range(0..y_range),
                speed: 2.0 + self.rng.gen::<f32>() * 2.0,
                flap_timer: 0.0,
                wings_up: true,
            });
        }
    }

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        for b in &self.birds {
            let ch = if b.wings_up { 'v' } else { '-' };
            term.set(b.x.floor() as i32, b.y, ch, Some(rgb(200, 180, 60)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flock_is_capped_and_birds_leave() {
        let mut birds = BirdSystem::new(14);
        birds.init(50, 20);
        for _ in 0..20_000 {
            birds.update(16.0);
            assert!(birds.birds.len() <= MAX_BIRDS);
            for b in &birds.birds {
                assert!(b.x <= 53.0);
            }
        }
    }
}
