//! Matrix-style rain: per-column drops leaving an alpha trail in a cell
//! field, with impact flashes and ballistic splash particles at the bottom.

use crate::pattern::Pattern;
use crate::terminal::{rgb, Terminal};
use rand::prelude::*;

const CHARS: &[char] = &[
    'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ', 'サ', 'シ', 'ス', 'セ', 'ソ',
    'タ', 'チ', 'ツ', 'テ', 'ト', 'ナ', 'ニ', 'ヌ', 'ネ', 'ノ', '0', '1', '2', '3', '4', '5',
    '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];

// Lower decay base = longer trail
const TRAIL_DECAY_PER_SECOND: f32 = 0.05;
const SPLASH_DECAY_PER_SECOND: f32 = 2.8;
const SPLASH_GRAVITY: f32 = 5.0; // rows/s² pulling splash particles down
const IMPACT_FRAMES: i32 = 3;
const ALPHA_CUTOFF: f32 = 0.05;
const SPLASH_CHAR_THRESHOLD: f32 = 0.4;

struct Column {
    hit_bottom: bool,
    length: f32,
    speed: f32,
    y: f32,
}

struct Splash {
    alpha: f32,
    col: f32,
    row: f32,
    v_col: f32,
    v_row: f32,
    heavy_char: char,
    light_char: char,
}

struct Impact {
    col: usize,
    row: usize,
    frames_left: i32,
}

fn grey(alpha: f32) -> crossterm::style::Color {
    let v = (alpha.clamp(0.0, 1.0) * 255.0).floor() as u8;
    rgb(v, v, v)
}

// Angled splash particles read as a fan, not a pile of dots
fn splash_chars_for(v_col: f32) -> (char, char) {
    if v_col < -0.8 {
        ('\\', ',')
    } else if v_col > 0.8 {
        ('/', '.')
    } else {
        ('|', '\'')
    }
}

pub struct RainPattern {
    rng: StdRng,
    cols: usize,
    rows: usize,
    columns: Vec<Column>,
    alpha: Vec<f32>,
    chars: Vec<u8>,
    splashes: Vec<Splash>,
    impacts: Vec<Impact>,
}

impl RainPattern {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(crate::engine::clock_seed);
        Self {
            rng: StdRng::seed_from_u64(seed),
            cols: 0,
            rows: 0,
            columns: Vec::new(),
            alpha: Vec::new(),
            chars: Vec::new(),
            splashes: Vec::new(),
            impacts: Vec::new(),
        }
    }

    // initial spawn spreads drops over a wide off-screen range so they
    // arrive gradually; respawn keeps the gap short
    fn make_column(&mut self, initial: bool) -> Column {
        let spread = if initial { 4.0 } else { 0.5 };
        Column {
            hit_bottom: false,
            length: self.rng.gen::<f32>() * 15.0 + 5.0,
            speed: self.rng.gen::<f32>() * 2.0 + 1.0,
            y: -(self.rng.gen::<f32>() * self.rows as f32 * spread),
        }
    }

    fn spawn_splash(&mut self, col: usize) {
        self.impacts.push(Impact {
            col,
            row: self.rows - 1,
            frames_left: IMPACT_FRAMES,
        });

        let count = 2 + self.rng.gen_range(0..3);
        for _ in 0..count {
            let v_col = (self.rng.gen::<f32>() - 0.5) * 6.0;
            let (heavy_char, light_char) = splash_chars_for(v_col);
            self.splashes.push(Splash {
                alpha: 0.75 + self.rng.gen::<f32>() * 0.25,
                col: col as f32 + (self.rng.gen::<f32>() - 0.5),
                row: self.rows as f32 - 1.0,
                v_col,
                v_row: -(self.rng.gen::<f32>() * 5.0 + 2.0),
                heavy_char,
                light_char,
            });
        }
    }

    fn update_columns(&mut self, dt_sec: f32) {
        let decay_factor = TRAIL_DECAY_PER_SECOND.powf(dt_sec);

        for col in 0..self.cols {
            self.columns[col].y += self.columns[col].speed * dt_sec;

            for row in 0..self.rows {
                self.alpha[row * self.cols + col] *= decay_factor;
            }

            let head = self.columns[col].y.floor();
            if head >= 0.0 && (head as usize) < self.rows {
                let idx = head as usize * self.cols + col;
                self.alpha[idx] = 1.0;
                self.chars[idx] = self.rng.gen_range(0..CHARS.len()) as u8;
            }

            if !self.columns[col].hit_bottom && head >= self.rows as f32 - 1.0 {
                self.columns[col].hit_bottom = true;
                self.spawn_splash(col);
            }

            if self.columns[col].y > self.rows as f32 + self.columns[col].length {
                self.columns[col] = self.make_column(false);
            }
        }
    }

    fn update_splashes(&mut self, dt_sec: f32) {
        let decay_amount = SPLASH_DECAY_PER_SECOND * dt_sec;
        let rows = self.rows as f32;

        for s in &mut self.splashes {
            s.col += s.v_col * dt_sec;
            s.row += s.v_row * dt_sec;
            s.v_row += SPLASH_GRAVITY * dt_sec;
            s.alpha -= decay_amount;
        }

        self.splashes.retain(|s| s.alpha > ALPHA_CUTOFF && s.row < rows);
    }

    fn update_impacts(&mut self) {
        for impact in &mut self.impacts {
            impact.frames_left -= 1;
        }
        self.impacts.retain(|i| i.frames_left > 0);
    }
}

impl Pattern for RainPattern {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.splashes.clear();
        self.impacts.clear();
        self.alpha = vec![0.0; cols * rows];
        self.chars = vec![0; cols * rows];
        self.columns = (0..cols).map(|_| self.make_column(true)).collect();
    }

    fn update(&mut self, dt_ms: f32) {
        let dt_sec = dt_ms / 1000.0;
        self.update_columns(dt_sec);
        self.update_splashes(dt_sec);
        self.update_impacts();
    }

    fn render(&self, term: &mut Terminal, cols: usize, rows: usize) {
        for row in 0..rows.min(self.rows) {
            for col in 0..cols.min(self.cols) {
                let idx = row * self.cols + col;
                let cell_alpha = self.alpha[idx];
                if cell_alpha < ALPHA_CUTOFF {
                    continue;
                }

                let is_head = self.columns[col].y.floor() as usize == row;
                let alpha = if is_head { 1.0 } else { cell_alpha };
                let ch = CHARS[self.chars[idx] as usize];
                term.set(col as i32, row as i32, ch, Some(grey(alpha)));
            }
        }

        for impact in &self.impacts {
            term.set(
                impact.col as i32,
                impact.row as i32,
                '*',
                Some(grey(impact.frames_left as f32 / IMPACT_FRAMES as f32)),
            );
        }

        for s in &self.splashes {
            let col = s.col.round() as i32;
            let row = s.row.round() as i32;
            if col < 0 || col >= cols as i32 || row < 0 || row >= rows as i32 {
                continue;
            }
            let ch = if s.alpha > SPLASH_CHAR_THRESHOLD {
                s.heavy_char
            } else {
                s.light_char
            };
            term.set(col, row, ch, Some(grey(s.alpha)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_alpha_decays_below_cutoff() {
        let mut rain = RainPattern::new(Some(9));
        rain.init(40, 20);
        // Force one bright cell and decay it with no head on top
        rain.alpha[5 * 40 + 3] = 1.0;
        rain.columns[3].y = 1000.0;
        for _ in 0..120 {
            let decay = TRAIL_DECAY_PER_SECOND.powf(0.016);
            rain.alpha[5 * 40 + 3] *= decay;
        }
        assert!(rain.alpha[5 * 40 + 3] < ALPHA_CUTOFF);
    }

    #[test]
    fn splashes_expire() {
        let mut rain = RainPattern::new(Some(4));
        rain.init(40, 20);
        rain.spawn_splash(10);
        assert!(!rain.splashes.is_empty());
        assert!(!rain.impacts.is_empty());

        for _ in 0..300 {
            rain.update(16.0);
        }
        assert!(rain.splashes.is_empty());
        assert!(rain.impacts.is_empty());
    }

    #[test]
    fn columns_recycle_after_leaving_grid() {
        let mut rain = RainPattern::new(Some(1));
        rain.init(10, 10);
        rain.columns[0].y = 100.0;
        rain.update(16.0);
        assert!(rain.columns[0].y < 0.0);
        assert!(!rain.columns[0].hit_bottom);
    }
}
