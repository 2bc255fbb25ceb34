//! Lightning: random idle gaps, a one-frame whole-screen flash, then a
//! fading random-walk bolt with occasional short branches.

use crate::terminal::{rgb, Terminal};
use crate::weather::WeatherSystem;
use rand::prelude::*;

const IDLE_MIN: f32 = 1.5;
const IDLE_MAX: f32 = 8.0;
const FADE_DURATION: f32 = 0.5;
const BRANCH_CHANCE: f32 = 0.2;
const BRANCH_LENGTH: i32 = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
    Idle,
    Flash,
    Fading,
}

struct BoltSegment {
    x: i32,
    y: i32,
    ch: char,
}

pub struct LightningSystem {
    rng: StdRng,
    cols: usize,
    rows: usize,
    state: State,
    timer: f32,
    idle_duration: f32,
    bolt: Vec<BoltSegment>,
    flash_active: bool,
}

impl LightningSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            cols: 0,
            rows: 0,
            state: State::Idle,
            timer: 0.0,
            idle_duration: 0.0,
            bolt: Vec::new(),
            flash_active: false,
        }
    }

    fn generate_bolt(&mut self) {
        self.bolt.clear();
        if self.cols < 12 || self.rows < 6 {
            return;
        }

        let mut x = 5 + self.rng.gen_range(0..self.cols as i32 - 10);
        for y in 2..self.rows as i32 - 3 {
            let dx = self.rng.gen_range(-1..=1);
            x = (x + dx).clamp(1, self.cols as i32 - 2);

            let ch = match dx.cmp(&0) {
                std::cmp::Ordering::Less => '/',
                std::cmp::Ordering::Greater => '\\',
                std::cmp::Ordering::Equal => '|',
            };
            self.bolt.push(BoltSegment { x, y, ch });

            if self.rng.gen::<f32>() < BRANCH_CHANCE {
                let branch_dir = if dx <= 0 { 1 } else { -1 };
                let mut bx = x;
                for b in 0..BRANCH_LENGTH {
                    bx += branch_dir;
                    let by = y + b;
                    if bx < 0 || bx >= self.cols as i32 || by >= self.rows as i32 {
                        break;
                    }
                    self.bolt.push(BoltSegment {
                        x: bx,
                        y: by,
                        ch: if branch_dir < 0 { '/' } else { '\\' },
                    });
                }
            }
        }
    }
}

impl WeatherSystem for LightningSystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.state = State::Idle;
        self.idle_duration = IDLE_MIN + self.rng.gen::<f32>() * (IDLE_MAX - IDLE_MIN);
        self.timer = 0.0;
        self.bolt.clear();
        self.flash_active = false;
    }

    fn update(&mut self, dt_ms: f32) {
        self.timer += dt_ms / 1000.0;
        self.flash_active = false;

        match self.state {
            State::Idle => {
                if self.timer >= self.idle_duration {
                    self.generate_bolt();
                    self.state = State::Flash;
                    self.timer = 0.0;
                }
            }
            State::Flash => {
                self.flash_active = true;
                self.state = State::Fading;
                self.timer = 0.0;
            }
            State::Fading => {
                if self.timer >= FADE_DURATION {
                    self.bolt.clear();
                    self.state = State::Idle;
                    self.timer = 0.0;
                    self.idle_duration = IDLE_MIN + self.rng.gen::<f32>() * (IDLE_MAX - IDLE_MIN);
                }
            }
        }
    }

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        if self.bolt.is_empty() {
            return;
        }

        let color = if self.state == State::Fading {
            let alpha = (1.0 - self.timer / FADE_DURATION).max(0.0);
            let v = (255.0 * alpha).floor() as u8;
            rgb(v, v, (v as f32 * 0.8).floor() as u8)
        } else {
            rgb(255, 255, 240)
        };

        for seg in &self.bolt {
            term.set(seg.x, seg.y, seg.ch, Some(color));
        }
    }

    fn flash_overlay(&self) -> bool {
        self.flash_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_lasts_exactly_one_frame() {
        let mut lightning = LightningSystem::new(9);
        lightning.init(80, 24);
        lightning.timer = lightning.idle_duration; // force the strike
        lightning.update(16.0);
        assert!(!lightning.bolt.is_empty());
        assert_eq!(lightning.state, State::Flash);

        lightning.update(16.0);
        assert!(lightning.flash_overlay());
        assert_eq!(lightning.state, State::Fading);

        lightning.update(16.0);
        assert!(!lightning.flash_overlay());
    }

    #[test]
    fn bolt_clears_after_fade() {
        let mut lightning = LightningSystem::new(3);
        lightning.init(80, 24);
        lightning.timer = lightning.idle_duration;
        lightning.update(16.0);
        lightning.update(16.0);
        lightning.update(600.0); // past FADE_DURATION
        assert!(lightning.bolt.is_empty());
        assert_eq!(lightning.state, State::Idle);
    }

    #[test]
    fn bolt_stays_inside_the_grid() {
        let mut lightning = LightningSystem::new(5);
        lightning.init(40, 20);
        lightning.generate_bolt();
        for seg in &lightning.bolt {
            assert!(seg.x >= 0 && seg.x < 40);
            assert!(seg.y >= 0 && seg.y < 20);
        }
    }
}
