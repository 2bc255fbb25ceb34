use crate::metrics::{grid_size, GlyphMetrics};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, window_size, Clear, ClearType,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Assumed cell size when a terminal reports pixels but not a cell grid.
const FALLBACK_GLYPH: GlyphMetrics = GlyphMetrics {
    width: 8.0,
    height: 16.0,
};

/// Cell dimensions of the attached terminal. Some emulators report a zero
/// cell grid but a valid pixel size; derive the grid from pixels then.
fn detect_size() -> io::Result<(u16, u16)> {
    let (w, h) = size()?;
    if w > 0 && h > 0 {
        return Ok((w, h));
    }
    let ws = window_size()?;
    let glyph =
        GlyphMetrics::measure(ws.width, ws.height, ws.columns, ws.rows).unwrap_or(FALLBACK_GLYPH);
    let (cols, rows) = grid_size(ws.width as f32, ws.height as f32, glyph);
    Ok((cols as u16, rows as u16))
}

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Cell>,
    raw_mode: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, Default)]
pub struct Cell {
    pub ch: Option<char>,
    pub fg: Option<Color>,
}

impl Terminal {
    /// Initialize the terminal for drawing. Failing here is fatal: without a
    /// drawing surface there is nothing to recover to.
    pub fn new() -> io::Result<Self> {
        let (width, height) = detect_size()?;

        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide)?;

        Ok(Self {
            width,
            height,
            buffer: vec![Cell::default(); width as usize * height as usize],
            raw_mode: true,
        })
    }

    /// Headless buffer, used by tests that exercise pattern rendering.
    pub fn headless(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            buffer: vec![Cell::default(); width as usize * height as usize],
            raw_mode: false,
        }
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Resize the back buffer, discarding its contents
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = vec![Cell::default(); width as usize * height as usize];
    }

    /// Clear the back buffer
    pub fn clear(&mut self) {
        for cell in &mut self.buffer {
            *cell = Cell::default();
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    /// Set a character at position with optional color. Out-of-range writes
    /// are silently dropped.
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width as usize + x as usize] = Cell {
                ch: Some(ch),
                fg,
            };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg);
        }
    }

    /// Read back a cell, for occlusion checks and tests
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(&self.buffer[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Flush the back buffer to the screen
    pub fn present(&self) -> io::Result<()> {
        let mut out = stdout();
        let mut last_fg: Option<Color> = None;

        for y in 0..self.height {
            execute!(out, MoveTo(0, y))?;
            for x in 0..self.width {
                let cell = &self.buffer[y as usize * self.width as usize + x as usize];
                match cell.ch {
                    Some(ch) => {
                        if cell.fg != last_fg {
                            match cell.fg {
                                Some(color) => execute!(out, SetForegroundColor(color))?,
                                None => execute!(out, ResetColor)?,
                            }
                            last_fg = cell.fg;
                        }
                        execute!(out, Print(ch))?;
                    }
                    None => execute!(out, Print(' '))?,
                }
            }
        }
        execute!(out, ResetColor)?;
        out.flush()?;
        Ok(())
    }

    /// Check for keypress (non-blocking)
    pub fn check_key(&self) -> io::Result<Option<KeyCode>> {
        if poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some(key_event.code));
            }
        }
        Ok(None)
    }

    /// Sleep for specified duration
    pub fn sleep(&self, seconds: f32) {
        std::thread::sleep(Duration::from_secs_f32(seconds));
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.raw_mode {
            let _ = execute!(stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

/// Helper to create RGB colors
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clips_out_of_range() {
        let mut term = Terminal::headless(10, 5);
        term.set(-1, 0, 'x', None);
        term.set(10, 0, 'x', None);
        term.set(0, 5, 'x', None);
        term.set(3, 2, 'x', None);
        assert_eq!(term.get(3, 2).unwrap().ch, Some('x'));
        assert!(term.get(0, 0).unwrap().ch.is_none());
    }

    #[test]
    fn resize_discards_buffer() {
        let mut term = Terminal::headless(10, 5);
        term.set(9, 4, '#', None);
        term.resize(20, 8);
        assert_eq!(term.size(), (20, 8));
        assert!(term.get(9, 4).unwrap().ch.is_none());
    }
}
