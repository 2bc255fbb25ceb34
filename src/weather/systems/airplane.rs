//! A rare airplane crossing high in the sky, one at a time with a long
//! cooldown between passes.

use crate::terminal::{rgb, Terminal};
use crate::weather::WeatherSystem;
use crossterm::style::Color;
use rand::prelude::*;

const SPRITE: [&str; 7] = [
    "           _       ",
    "         -=\\`\\     ",
    "     |\\ ____\\_\\__  ",
    "   -=\\c\"\"\"\"\"\"\"  \"`)'",
    "      `~~~~~/ /~~` ",
    "        -==/ /     ",
    "          '-'      ",
];

const DEFAULT_COLOR: Color = rgb(200, 200, 210);

fn sprite_color(ch: char) -> Color {
    match ch {
        '"' => rgb(100, 200, 220),
        '\\' => rgb(80, 120, 200),
        '_' => rgb(100, 100, 110),
        '~' => rgb(140, 140, 150),
        _ => DEFAULT_COLOR,
    }
}

const SPAWN_CHANCE: f32 = 0.0005;
const COOLDOWN: f32 = 30.0;
const SPEED_MIN: f32 = 3.0;
const SPEED_MAX: f32 = 5.0;

pub struct AirplaneSystem {
    rng: StdRng,
    cols: usize,
    rows: usize,
    x: f32,
    y: i32,
    speed: f32,
    active: bool,
    cooldown: f32,
    sprite_width: usize,
}

impl AirplaneSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            cols: 0,
            rows: 0,
            x: 0.0,
            y: 0,
            speed: 0.0,
            active: false,
            cooldown: 0.0,
            sprite_width: SPRITE.iter().map(|l| l.chars().count()).max().unwrap_or(0),
        }
    }
}

impl WeatherSystem for AirplaneSystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.active = false;
        self.cooldown = 5.0 + self.rng.gen::<f32>() * 10.0;
    }

    fn update(&mut self, dt_ms: f32) {
        let s = dt_ms / 1000.0;

        if self.active {
            self.x += self.speed * s;
            if self.x > self.cols as f32 + 5.0 {
                self.active = false;
                self.cooldown = COOLDOWN + self.rng.gen::<f32>() * 15.0;
            }
            return;
        }

        self.cooldown -= s;
        if self.cooldown <= 0.0 && self.rng.gen::<f32>() < SPAWN_CHANCE {
            self.x = -(self.sprite_width as f32);
            let y_range = ((self.rows as f32 * 0.2) as i32).max(1);
            self.y = 1 + self.rng.gen_range(0..y_range);
            self.speed = SPEED_MIN + self.rng.gen::<f32>() * (SPEED_MAX - SPEED_MIN);
            self.active = true;
        }
    }

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        if !self.active {
            return;
        }

        for (row, line) in SPRITE.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                term.set(
                    self.x.floor() as i32 + col as i32,
                    self.y + row as i32,
                    ch,
                    Some(sprite_color(ch)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_despawns_and_cools_down_past_the_right_edge() {
        let mut plane = AirplaneSystem::new(7);
        plane.init(60, 20);
        plane.active = true;
        plane.x = 64.0;
        plane.speed = 4.0;
        plane.update(1000.0);
        assert!(!plane.active);
        assert!(plane.cooldown >= COOLDOWN);
    }

    #[test]
    fn no_spawn_during_cooldown() {
        let mut plane = AirplaneSystem::new(2);
        plane.init(60, 20);
        plane.cooldown = 10.0;
        for _ in 0..60 {
            plane.update(16.0);
            assert!(!plane.active);
        }
    }
}
