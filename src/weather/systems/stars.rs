//! Twinkling star field over the upper half of the sky, with rare
//! shooting stars dragging a short trail.

use crate::terminal::{rgb, Terminal};
use crate::weather::WeatherSystem;
use rand::prelude::*;
use std::collections::VecDeque;

const DENSITY_DIVISOR: usize = 80;
const MIN_SPACING: f32 = 3.0;
const PLACEMENT_ATTEMPTS: usize = 50;
const TWINKLE_SPEED: f32 = 3.0;
const SHOOTING_STAR_CHANCE: f32 = 0.003;
const TRAIL_LENGTH: usize = 5;

struct Star {
    x: f32,
    y: f32,
    phase: f32,
    phase_speed: f32,
}

struct ShootingStar {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    trail: VecDeque<(f32, f32)>,
    life: f32,
}

pub struct StarsSystem {
    rng: StdRng,
    stars: Vec<Star>,
    shooting_stars: Vec<ShootingStar>,
    cols: usize,
    rows: usize,
}

impl StarsSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            stars: Vec::new(),
            shooting_stars: Vec::new(),
            cols: 0,
            rows: 0,
        }
    }

    fn place_star(&mut self, half_rows: f32) {
        // Rejection-sample a Manhattan-spaced spot; give up after a
        // bounded number of attempts and place anywhere
        for _ in 0..PLACEMENT_ATTEMPTS {
            let x = self.rng.gen::<f32>() * self.cols as f32;
            let y = self.rng.gen::<f32>() * half_rows;

            let too_close = self
                .stars
                .iter()
                .any(|s| (s.x - x).abs() + (s.y - y).abs() < MIN_SPACING);

            if !too_close {
                let phase = self.rng.gen::<f32>() * std::f32::consts::TAU;
                let phase_speed = 0.8 + self.rng.gen::<f32>() * 0.4;
                self.stars.push(Star {
                    x,
                    y,
                    phase,
                    phase_speed,
                });
                return;
            }
        }

        self.stars.push(Star {
            x: self.rng.gen::<f32>() * self.cols as f32,
            y: self.rng.gen::<f32>() * half_rows,
            phase: self.rng.gen::<f32>() * std::f32::consts::TAU,
            phase_speed: 0.8 + self.rng.gen::<f32>() * 0.4,
        });
    }
}

impl WeatherSystem for StarsSystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.stars.clear();
        self.shooting_stars.clear();

        let count = cols * rows / DENSITY_DIVISOR;
        let half_rows = (rows / 2) as f32;
        for _ in 0..count {
            self.place_star(half_rows);
        }
    }

    fn update(&mut self, dt_ms: f32) {
        let s = dt_ms / 1000.0;

        for star in &mut self.stars {
            star.phase += TWINKLE_SPEED * star.phase_speed * s;
        }

        if self.rng.gen::<f32>() < SHOOTING_STAR_CHANCE {
            let dir = if self.rng.gen::<f32>() > 0.5 { 1.0 } else { -1.0 };
            self.shooting_stars.push(ShootingStar {
                x: self.rng.gen::<f32>() * self.cols as f32,
                y: self.rng.gen::<f32>() * (self.rows as f32 * 0.3),
                vx: dir * (20.0 + self.rng.gen::<f32>() * 20.0),
                vy: 8.0 + self.rng.gen::<f32>() * 8.0,
                trail: VecDeque::new(),
                life: 1.0,
            });
        }

        let cols = self.cols as f32;
        let rows = self.rows as f32;
        for ss in &mut self.shooting_stars {
            ss.trail.push_front((ss.x, ss.y));
            if ss.trail.len() > TRAIL_LENGTH {
                ss.trail.pop_back();
            }
            ss.x += ss.vx * s;
            ss.y += ss.vy * s;
            ss.life -= s * 2.0;
        }
        self.shooting_stars
            .retain(|ss| ss.life > 0.0 && ss.x >= -5.0 && ss.x <= cols + 5.0 && ss.y <= rows);
    }

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        for star in &self.stars {
            let brightness = (star.phase.sin() + 1.0) / 2.0;
            let ch = if brightness > 0.8 {
                '*'
            } else if brightness > 0.4 {
                '+'
            } else {
                '.'
            };
            let v = if brightness > 0.6 { 200 } else { 100 };
            term.set(
                star.x.floor() as i32,
                star.y.floor() as i32,
                ch,
                Some(rgb(v, v, v)),
            );
        }

        for ss in &self.shooting_stars {
            term.set(
                ss.x.floor() as i32,
                ss.y.floor() as i32,
                '*',
                Some(rgb(200, 200, 220)),
            );

            for (i, &(tx, ty)) in ss.trail.iter().enumerate() {
                let ch = if i == 0 { '+' } else { '.' };
                let v = (180 - i as i32 * 30).max(0) as u8;
                term.set(
                    tx.floor() as i32,
                    ty.floor() as i32,
                    ch,
                    Some(rgb(v, v, v.saturating_add(30))),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_stay_in_the_upper_half() {
        let mut stars = StarsSystem::new(7);
        stars.init(80, 24);
        assert_eq!(stars.stars.len(), 80 * 24 / DENSITY_DIVISOR);
        for star in &stars.stars {
            assert!(star.y < 12.0);
        }
    }

    #[test]
    fn shooting_stars_expire() {
        let mut stars = StarsSystem::new(1);
        stars.init(80, 24);
        stars.shooting_stars.push(ShootingStar {
            x: 10.0,
            y: 2.0,
            vx: 30.0,
            vy: 10.0,
            trail: VecDeque::new(),
            life: 1.0,
        });
        for _ in 0..120 {
            stars.update(16.0);
        }
        // life drains at 2/s; after ~2 simulated seconds all are gone
        assert!(stars.shooting_stars.iter().all(|ss| ss.life > 0.0));
        assert!(stars
            .shooting_stars
            .iter()
            .all(|ss| ss.x <= 80.0 + 5.0 && ss.y <= 24.0));
    }
}
