//! Frame loop: fixed-rate simulation ticks driven by an accumulator, with
//! rendering, input, and resize handling around them.

use crate::pattern::Pattern;
use crate::terminal::Terminal;
use crossterm::event::KeyCode;
use std::io;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Longest wall-clock gap a single frame is allowed to account for. A
/// suspended terminal would otherwise flood the accumulator on resume.
const MAX_FRAME_MS: f32 = 100.0;

/// Seed for runs where none was given on the command line.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn clamp_frame(dt_ms: f32) -> f32 {
    dt_ms.clamp(0.0, MAX_FRAME_MS)
}

/// Drain the accumulator into whole simulation ticks.
fn ticks_due(accumulator: &mut f32, tick_ms: f32) -> u32 {
    let mut ticks = 0;
    while *accumulator >= tick_ms {
        *accumulator -= tick_ms;
        ticks += 1;
    }
    ticks
}

pub struct Engine {
    term: Terminal,
    tick_ms: f32,
    pattern: Option<Box<dyn Pattern>>,
    running: bool,
}

impl Engine {
    pub fn new(term: Terminal, fps: u32) -> Self {
        Self {
            term,
            tick_ms: 1000.0 / fps.max(1) as f32,
            pattern: None,
            running: false,
        }
    }

    /// Swap in a new pattern, disposing the old one. The new pattern is
    /// initialised against the current grid.
    pub fn set_pattern(&mut self, mut pattern: Box<dyn Pattern>) {
        if let Some(old) = self.pattern.as_mut() {
            old.dispose();
        }
        let (w, h) = self.term.size();
        pattern.init(w as usize, h as usize);
        self.pattern = Some(pattern);
    }

    /// Idempotent; the loop exits at the top of its next iteration.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Drive the pattern until the user quits with `q` or Esc. Space pauses;
    /// a resize reinitialises the pattern on the new grid.
    pub fn run(&mut self) -> io::Result<()> {
        let mut pattern = match self.pattern.take() {
            Some(p) => p,
            None => return Ok(()),
        };
        self.running = true;

        let (w, h) = self.term.size();
        let (mut cols, mut rows) = (w as usize, h as usize);

        let mut last = Instant::now();
        let mut accumulator = 0.0f32;
        let mut paused = false;

        while self.running {
            let (new_w, new_h) =
                crossterm::terminal::size().unwrap_or((cols as u16, rows as u16));
            if new_w as usize != cols || new_h as usize != rows {
                cols = new_w as usize;
                rows = new_h as usize;
                self.term.resize(new_w, new_h);
                self.term.clear_screen()?;
                pattern.init(cols, rows);
            }

            if let Some(code) = self.term.check_key()? {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => self.stop(),
                    KeyCode::Char(' ') => {
                        paused = !paused;
                        // Time spent paused must not count as elapsed
                        last = Instant::now();
                        accumulator = 0.0;
                    }
                    _ => {}
                }
            }
            if !self.running {
                break;
            }

            if paused {
                self.term.sleep(0.1);
                continue;
            }

            let now = Instant::now();
            let dt_ms = clamp_frame(now.duration_since(last).as_secs_f32() * 1000.0);
            last = now;

            accumulator += dt_ms;
            for _ in 0..ticks_due(&mut accumulator, self.tick_ms) {
                pattern.update(self.tick_ms);
            }

            self.term.clear();
            pattern.render(&mut self.term, cols, rows);
            self.term.present()?;
            self.term.sleep(self.tick_ms / 1000.0 * 0.5);
        }

        pattern.dispose();
        self.pattern = Some(pattern);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_gap_is_clamped() {
        assert_eq!(clamp_frame(16.0), 16.0);
        assert_eq!(clamp_frame(5000.0), MAX_FRAME_MS);
        assert_eq!(clamp_frame(-3.0), 0.0);
    }

    #[test]
    fn accumulator_yields_whole_ticks() {
        let tick = 40.0;
        let mut acc = 0.0;

        acc += 16.0;
        assert_eq!(ticks_due(&mut acc, tick), 0);
        acc += 16.0;
        assert_eq!(ticks_due(&mut acc, tick), 0);
        acc += 16.0;
        assert_eq!(ticks_due(&mut acc, tick), 1);
        assert!((acc - 8.0).abs() < 1e-3);

        acc += 100.0;
        assert_eq!(ticks_due(&mut acc, tick), 2);
    }

    #[test]
    fn clock_seed_is_nonzero_and_moves() {
        let a = clock_seed();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = clock_seed();
        assert_ne!(a, 0);
        assert_ne!(a, b);
    }
}
