//! Two-frame animated sun, upper left of the sky.

use crate::terminal::{rgb, Terminal};
use crate::weather::WeatherSystem;

const FRAME_INTERVAL: f32 = 0.8;

const SUN_FRAMES: [&[&str]; 2] = [
    &[
        "      ;   :   ;    ",
        "   .   \\_,!,_/   , ",
        "    `.'     `.'    ",
        "     /         \\   ",
        "~ -- :         : --~",
        "     \\         /   ",
        "    ,'`._   _.'`.  ",
        "   '   / `!` \\   ` ",
        "      ;   :   ;    ",
    ],
    &[
        "      .   |   .    ",
        "   ;   \\_,|,_/   ; ",
        "    `.'     `.'    ",
        "     /         \\   ",
        "~ -- |         | --~",
        "     \\         /   ",
        "    ,'`._   _.'`.  ",
        "   ;   / `|` \\   ; ",
        "      .   |   .    ",
    ],
];

pub struct SunSystem {
    pos_x: i32,
    pos_y: i32,
    frame_timer: f32,
    frame_index: usize,
}

impl SunSystem {
    pub fn new() -> Self {
        Self {
            pos_x: 0,
            pos_y: 0,
            frame_timer: 0.0,
            frame_index: 0,
        }
    }
}

impl WeatherSystem for SunSystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.pos_x = (cols as f32 * 0.15).floor() as i32;
        self.pos_y = (rows as f32 * 0.05).floor() as i32;
        self.frame_timer = 0.0;
        self.frame_index = 0;
    }

    fn update(&mut self, dt_ms: f32) {
        self.frame_timer += dt_ms / 1000.0;
        if self.frame_timer >= FRAME_INTERVAL {
            self.frame_timer -= FRAME_INTERVAL;
            self.frame_index = (self.frame_index + 1) % SUN_FRAMES.len();
        }
    }

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        for (row, line) in SUN_FRAMES[self.frame_index].iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                term.set(
                    self.pos_x + col as i32,
                    self.pos_y + row as i32,
                    ch,
                    Some(rgb(255, 220, 80)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_alternate_on_the_interval() {
        let mut sun = SunSystem::new();
        sun.init(80, 24);
        assert_eq!(sun.frame_index, 0);
        sun.update(800.0);
        assert_eq!(sun.frame_index, 1);
        sun.update(800.0);
        assert_eq!(sun.frame_index, 0);
    }
}
