//! Cell buffer for terminal output
//!
//! Holds one character plus straight (already composited) colors per cell and
//! serialises to ANSI with crossterm.

use crossterm::style::{Color as TermColor, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::Command;

use crate::style::Color;

/// Placeholder for the right half of a double-width glyph
pub const WIDE_TAIL: char = '\0';

/// Columns `ch` occupies in a terminal
pub fn char_width(ch: char) -> u16 {
    let mut utf8 = [0u8; 4];
    unicode_display_width::width(ch.encode_utf8(&mut utf8)).min(2) as u16
}

/// A single cell in the buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg: None,
        }
    }
}

/// Composite `top` over `bottom`, returning an opaque color
pub fn blend(bottom: Color, top: Color) -> Color {
    let a = top.a.clamp(0.0, 1.0);
    Color::rgba(
        bottom.r + (top.r - bottom.r) * a,
        bottom.g + (top.g - bottom.g) * a,
        bottom.b + (top.b - bottom.b) * a,
        1.0,
    )
}

fn to_term(color: Color) -> TermColor {
    let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    TermColor::Rgb {
        r: byte(color.r),
        g: byte(color.g),
        b: byte(color.b),
    }
}

/// A 2D buffer of cells
#[derive(Debug, Clone)]
pub struct CellBuffer {
    width: u16,
    height: u16,
    /// Color assumed behind cells with no background
    backdrop: Color,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(width: u16, height: u16, backdrop: Color) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            backdrop,
            cells: vec![Cell::default(); size],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Get a cell (returns None if out of bounds)
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Background currently showing through a cell
    pub fn background_at(&self, x: u16, y: u16) -> Color {
        self.get(x, y)
            .and_then(|c| c.bg)
            .unwrap_or(self.backdrop)
    }

    /// Composite a translucent fill onto the cell background
    pub fn fill(&mut self, x: u16, y: u16, color: Color) {
        let under = self.background_at(x, y);
        if let Some(i) = self.index(x, y) {
            self.cells[i].bg = Some(blend(under, color));
        }
    }

    /// Put a glyph; its color is composited over the cell background
    pub fn put(&mut self, x: u16, y: u16, ch: char, color: Color) {
        let under = self.background_at(x, y);
        if let Some(i) = self.index(x, y) {
            self.cells[i].ch = ch;
            self.cells[i].fg = Some(blend(under, color));
        }
    }

    /// Print text left to right by display width, clipped at `max_x`.
    ///
    /// A wide glyph that would straddle the clip edge is dropped.
    pub fn print(&mut self, x: u16, y: u16, max_x: u16, text: &str, color: Color) {
        let limit = max_x.min(self.width);
        let mut cx = x;
        for ch in text.chars() {
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if cx.saturating_add(w) > limit {
                break;
            }
            self.put(cx, y, ch, color);
            for tail in 1..w {
                self.put(cx + tail, y, WIDE_TAIL, color);
            }
            cx += w;
        }
    }

    /// Characters of one row, for inspection
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y).map(|c| c.ch))
            .filter(|&ch| ch != WIDE_TAIL)
            .collect()
    }

    /// Render buffer to ANSI string
    pub fn to_ansi(&self) -> String {
        let mut output = String::new();

        for y in 0..self.height {
            if y > 0 {
                output.push_str("\r\n");
            }

            let mut last_fg: Option<Color> = None;
            let mut last_bg: Option<Color> = None;

            for x in 0..self.width {
                let cell = &self.cells[(y as usize) * (self.width as usize) + (x as usize)];
                if cell.ch == WIDE_TAIL {
                    continue;
                }

                if cell.bg != last_bg {
                    match cell.bg {
                        Some(color) => {
                            let _ = SetBackgroundColor(to_term(color)).write_ansi(&mut output);
                        }
                        None => {
                            let _ = ResetColor.write_ansi(&mut output);
                            last_fg = None;
                        }
                    }
                    last_bg = cell.bg;
                }

                if cell.fg != last_fg {
                    if let Some(color) = cell.fg {
                        let _ = SetForegroundColor(to_term(color)).write_ansi(&mut output);
                    }
                    last_fg = cell.fg;
                }

                output.push(cell.ch);
            }

            // Reset at end of line
            let _ = ResetColor.write_ansi(&mut output);
        }

        output
    }
}
