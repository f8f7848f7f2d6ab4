use std::io::{self, Write};

use crossterm::{cursor::MoveTo, execute};
use log::info;

use crate::types::Rect;

/// One frame of screen cells. Everything is drawn into the grid first and
/// flushed to the output target in a single pass per frame.
pub struct GameGrid {
    pub grid: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, c: char) {
        if y < self.height && x < self.width {
            self.grid[y as usize][x as usize] = c;
        }
    }

    /// Fill every cell covered by `rect` with `c`. Cells outside the screen
    /// are dropped silently.
    pub fn fill_rect(&mut self, rect: &Rect, c: char) {
        let x0 = rect.left.round().max(0.0) as u16;
        let y0 = rect.top.round().max(0.0) as u16;
        let x1 = (rect.right().round().max(0.0) as u16).min(self.width);
        let y1 = (rect.bottom().round().max(0.0) as u16).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.grid[y as usize][x as usize] = c;
            }
        }
    }

    pub fn draw_text(&mut self, x: u16, y: u16, text: &str) {
        for (i, c) in text.chars().enumerate() {
            self.set_char(x + i as u16, y, c);
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.grid {
            row.fill(' ');
        }
    }

    pub fn render(&self, out: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            out.execute_move_to(MoveTo(0, y))?;
            write!(out, "{}", self.grid[y as usize].iter().collect::<String>())?;
        }
        Ok(())
    }
}

// --- ScreenBuffer for headless rendering ---
//
// Stands in for the terminal in --debug mode: frames land in memory and are
// dumped to the log instead of stdout, so a scripted run can be inspected
// after the fact.
pub struct ScreenBuffer {
    buffer: Vec<Vec<char>>,
    width: u16,
    height: u16,
    cursor_x: u16,
    cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            if self.cursor_y < self.height && self.cursor_x < self.width {
                self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
            }
            self.cursor_x += 1;
        }
    }

    pub fn print_to_log(&self) {
        info!("--- Frame ---");
        for row in &self.buffer {
            info!("{}", row.iter().collect::<String>());
        }
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            }
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            // Terminal mode changes have no meaning for the in-memory buffer.
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => {
                let s = String::from_utf8_lossy(buf);
                sb.write_str(&s);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }
}
