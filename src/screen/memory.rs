//! Offscreen grid with a scripted input queue.

use std::collections::VecDeque;
use std::io;

use ratatui::{buffer::Buffer, layout::Rect, style::Style};

use super::{put_cell, Screen, ScreenEvent};

/// A [`Screen`] that keeps its cells in memory.
///
/// Events queued with [`MemoryScreen::push_event`] are handed out in order;
/// once the queue is empty [`Screen::poll_event`] reports the input source as
/// closed.  `show` copies the pending buffer into the visible one, so tests
/// can tell a drawn-but-unflushed frame from a flushed one.
#[derive(Debug, Clone)]
pub struct MemoryScreen {
    pending: Buffer,
    visible: Buffer,
    events: VecDeque<ScreenEvent>,
    shows: usize,
    syncs: usize,
    polls: usize,
    finalized: usize,
}

impl MemoryScreen {
    pub fn new(width: u16, height: u16) -> Self {
        let area = Rect::new(0, 0, width, height);
        Self {
            pending: Buffer::empty(area),
            visible: Buffer::empty(area),
            events: VecDeque::new(),
            shows: 0,
            syncs: 0,
            polls: 0,
            finalized: 0,
        }
    }

    /// Builder-style [`MemoryScreen::push_event`].
    pub fn with_events(mut self, events: impl IntoIterator<Item = ScreenEvent>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn push_event(&mut self, event: ScreenEvent) {
        self.events.push_back(event);
    }

    /// The frame being drawn (not yet shown).
    pub fn buffer(&self) -> &Buffer {
        &self.pending
    }

    /// The last frame pushed out with `show` or `sync`.
    pub fn visible(&self) -> &Buffer {
        &self.visible
    }

    /// Row `y` of the visible frame as text, trailing blanks trimmed.
    pub fn line(&self, y: u16) -> String {
        row_text(&self.visible, y)
    }

    /// Row `y` of the pending frame as text, trailing blanks trimmed.
    pub fn pending_line(&self, y: u16) -> String {
        row_text(&self.pending, y)
    }

    pub fn show_count(&self) -> usize {
        self.shows
    }

    pub fn sync_count(&self) -> usize {
        self.syncs
    }

    pub fn poll_count(&self) -> usize {
        self.polls
    }

    /// How many times `finalize` was called.
    pub fn finalize_count(&self) -> usize {
        self.finalized
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized > 0
    }
}

fn row_text(buf: &Buffer, y: u16) -> String {
    let mut line = String::new();
    for x in buf.area.left()..buf.area.right() {
        if let Some(cell) = buf.cell((x, y)) {
            line.push_str(cell.symbol());
        }
    }
    line.trim_end().to_string()
}

impl Screen for MemoryScreen {
    fn set_content(&mut self, x: u16, y: u16, ch: char, combining: &[char], style: Style) {
        if self.finalized > 0 {
            return;
        }
        put_cell(&mut self.pending, x, y, ch, combining, style);
    }

    fn clear(&mut self) {
        self.pending.reset();
    }

    fn sync(&mut self) -> io::Result<()> {
        self.syncs += 1;
        self.visible = self.pending.clone();
        Ok(())
    }

    fn show(&mut self) -> io::Result<()> {
        self.shows += 1;
        self.visible = self.pending.clone();
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        (self.pending.area.width, self.pending.area.height)
    }

    fn poll_event(&mut self) -> Option<ScreenEvent> {
        self.polls += 1;
        let event = self.events.pop_front()?;
        if let ScreenEvent::Resize(width, height) = event {
            let area = Rect::new(0, 0, width, height);
            self.pending.resize(area);
            self.visible.resize(area);
        }
        Some(event)
    }

    fn finalize(&mut self) {
        self.finalized += 1;
    }
}
