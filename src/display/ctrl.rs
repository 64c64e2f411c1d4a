//! Terminal control sequences for the preview
//!
//! ANSI escape sequences as strings, so a whole frame can be assembled and
//! written in one go.

use crossterm::cursor;
use crossterm::terminal::{Clear, ClearType};
use crossterm::Command;

fn ansi(command: impl Command) -> String {
    let mut buf = String::new();
    let _ = command.write_ansi(&mut buf);
    buf
}

/// Move cursor to the top-left cell
pub fn home() -> String {
    ansi(cursor::MoveTo(0, 0))
}

/// Clear screen
pub fn clear_screen() -> String {
    ansi(Clear(ClearType::All))
}

pub fn hide_cursor() -> String {
    ansi(cursor::Hide)
}

pub fn show_cursor() -> String {
    ansi(cursor::Show)
}
