//! The cell grid the engine draws on.
//!
//! [`Screen`] is everything the engine needs from a terminal: put a styled
//! cell somewhere, clear, flush, block for the next input event, and give the
//! terminal back when done.  [`TerminalScreen`] drives a real terminal;
//! [`MemoryScreen`] keeps the grid in memory and replays scripted events.

pub mod memory;
pub mod terminal;

use std::io;

use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, style::Style};

pub use memory::MemoryScreen;
pub use terminal::TerminalScreen;

/// Input delivered by [`Screen::poll_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Cell-addressed terminal capability.
pub trait Screen {
    /// Write `ch` (plus any combining marks) at `(x, y)`.  Positions outside
    /// the grid are ignored.
    fn set_content(&mut self, x: u16, y: u16, ch: char, combining: &[char], style: Style);

    /// Blank every cell of the pending frame.
    fn clear(&mut self);

    /// Repaint the whole terminal, not just the cells that changed.
    fn sync(&mut self) -> io::Result<()>;

    /// Push the pending frame to the terminal.
    fn show(&mut self) -> io::Result<()>;

    /// Grid size as `(width, height)`.
    fn size(&self) -> (u16, u16);

    /// Block until the next key press or resize.  `None` means the input
    /// source is gone.
    fn poll_event(&mut self) -> Option<ScreenEvent>;

    /// Release the terminal.  Calling it again is a no-op.
    fn finalize(&mut self);
}

/// Write one glyph into a ratatui buffer.  Wide glyphs blank the cells they
/// cover so the diff skips them.
pub(crate) fn put_cell(buf: &mut Buffer, x: u16, y: u16, ch: char, combining: &[char], style: Style) {
    let mut symbol = String::with_capacity(1 + combining.len());
    symbol.push(ch);
    symbol.extend(combining);

    let Some(cell) = buf.cell_mut((x, y)) else {
        return;
    };
    cell.reset();
    cell.set_symbol(&symbol).set_style(style);

    let width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(1) as u16;
    for dx in 1..width {
        if let Some(covered) = buf.cell_mut((x.saturating_add(dx), y)) {
            covered.reset();
        }
    }
}
