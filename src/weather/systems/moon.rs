//! Moon in its current phase, computed from the synodic month. The `~`
//! cells are the opaque body: they paint as blank space so stars behind
//! the disc are occluded.

use crate::terminal::{rgb, Terminal};
use crate::weather::WeatherSystem;
use chrono::Utc;

const SYNODIC_MONTH: f64 = 29.53058770576;

// Reference new moon: 2024-01-11 11:57 UTC
const KNOWN_NEW_MOON_UNIX: i64 = 1_704_974_220;

fn moon_phase_index() -> usize {
    let elapsed_days = (Utc::now().timestamp() - KNOWN_NEW_MOON_UNIX) as f64 / 86_400.0;
    let phase = elapsed_days.rem_euclid(SYNODIC_MONTH);
    ((phase / SYNODIC_MONTH * 8.0).floor() as usize) % 8
}

const MOON_PHASES: [&[&str]; 8] = [
    // New moon: invisible
    &[],
    // Waxing crescent
    &[
        "    _.--._  ",
        "  ./      \\.",
        " /    ~    |",
        "|     ~    |",
        "|     ~    |",
        " \\    ~    |",
        "  `.\\    ./'",
        "    `--'   ",
    ],
    // First quarter
    &[
        "    _.--._  ",
        "  ./~~~~~~\\.",
        " /~~~~~~~~~|",
        "|~~~~~~~~~~|",
        "|~~~~~~~~~~|",
        " \\~~~~~~~~~|",
        "  `.~~~~~~./'",
        "    `--'   ",
    ],
    // Waxing gibbous
    &[
        "    _.--._  ",
        "  ./~~o~~~\\.",
        " /~~~~~~~~~\\",
        "|~~~o~~~~~~~|",
        "|~~~~~~~~~~~|",
        " \\~~~~~~~~~/",
        "  `.~~o~~./'",
        "    `--'   ",
    ],
    // Full moon
    &[
        "    _.--._  ",
        "  ./~~o~~~\\.",
        " /~~.~~~~~~\\",
        "|~~~o~~~~~~~|",
        "|~~~~~.~~~~~|",
        " \\~~~~~~~~~/",
        "  `.~~o~~./'",
        "    `--'   ",
    ],
    // Waning gibbous
    &[
        "  _.--._    ",
        "./~~~o~~\\.  ",
        "/~~~~~~~~~\\ ",
        "|~~~~~~~o~~~|",
        "|~~~~~~~~~~~|",
        " \\~~~~~~~~~/",
        "  './~~o~~.`",
        "    '--`   ",
    ],
    // Last quarter
    &[
        "  _.--._    ",
        "./~~~~~~\\.  ",
        "|~~~~~~~~~\\ ",
        "|~~~~~~~~~~|",
        "|~~~~~~~~~~|",
        "|~~~~~~~~~/ ",
        "  './~~~~~~.`",
        "    '--`   ",
    ],
    // Waning crescent
    &[
        "  _.--._    ",
        "./      \\.  ",
        "|    ~    \\ ",
        "|    ~     |",
        "|    ~     |",
        "|    ~    / ",
        "  './    .`",
        "    '--`   ",
    ],
];

pub struct MoonSystem {
    cols: usize,
    rows: usize,
    pos_x: i32,
    pos_y: i32,
}

impl MoonSystem {
    pub fn new() -> Self {
        Self {
            cols: 0,
            rows: 0,
            pos_x: 0,
            pos_y: 0,
        }
    }
}

impl WeatherSystem for MoonSystem {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.pos_x = (cols as f32 * 0.7).floor() as i32;
        self.pos_y = (rows as f32 * 0.08).floor() as i32;
    }

    fn update(&mut self, _dt_ms: f32) {}

    fn render(&self, term: &mut Terminal, _cols: usize, _rows: usize) {
        let lines = MOON_PHASES[moon_phase_index()];

        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }

                let gx = self.pos_x + col as i32;
                let gy = self.pos_y + row as i32;

                if ch == '~' {
                    term.set(gx, gy, ' ', Some(rgb(30, 30, 40)));
                } else {
                    term.set(gx, gy, ch, Some(rgb(220, 220, 200)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_index_is_in_range() {
        let idx = moon_phase_index();
        assert!(idx < 8);
    }

    #[test]
    fn body_cells_occlude_what_is_behind() {
        if moon_phase_index() == 0 {
            return; // new moon paints nothing
        }

        let mut moon = MoonSystem::new();
        moon.init(80, 24);
        let mut term = Terminal::headless(80, 24);
        // Star field under the whole sprite bounding box
        for y in 0..12 {
            for x in 0..16 {
                term.set(moon.pos_x + x, moon.pos_y + y, '*', None);
            }
        }
        moon.render(&mut term, 80, 24);

        let remaining = (0..12)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .filter(|&(x, y)| {
                term.get(moon.pos_x + x, moon.pos_y + y)
                    .map_or(false, |c| c.ch == Some('*'))
            })
            .count();
        assert!(remaining < 12 * 16, "moon covered no star cells");
    }
}
