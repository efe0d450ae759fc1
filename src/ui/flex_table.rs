//! Table with proportional columns, a keyboard-driven selection and a row
//! window that follows it.

use crossterm::event::KeyEvent;

use super::{markup::label, theme::Theme};
use crate::config::{Action, EngineConfig};
use crate::error::TableError;
use crate::screen::Screen;

// ───────────────────────────────────────── state ─────────────

/// Caller-owned selection and scroll offset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlexTableState {
    /// Index into the row list, header included.
    pub selected: usize,
    /// Data rows skipped above the window.
    pub offset: usize,
}

impl FlexTableState {
    pub fn select_next(&mut self) {
        self.selected = self.selected.saturating_add(1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Pull the selection into `[first, rows - 1]`.
    pub fn clamp_selection(&mut self, first: usize, rows: usize) {
        if self.selected < first {
            self.selected = first;
        } else if self.selected >= rows {
            self.selected = rows.saturating_sub(1);
        }
    }

    /// Move the window so the selection keeps a two-row margin, for a table
    /// drawn from line `y` down to (not including) line `max_y`.
    pub fn follow_selection(&mut self, first: usize, rows: usize, y: u16, max_y: u16) {
        if rows > 2 {
            let sel = self.selected as i64;
            let window = i64::from(max_y) - i64::from(y);
            let mut scroll = self.offset as i64;

            if sel - scroll > window - 2 && sel < rows as i64 - 1 {
                scroll = sel - window + 2;
            }
            if sel - scroll < 2 && sel != 1 {
                scroll = sel - 2;
            }
            self.offset = scroll.max(0) as usize;
        }

        // Keep the selection inside the window, below or above.
        if self.selected < first {
            return;
        }
        let row = self.selected - first;
        let visible = usize::from(max_y.saturating_sub(y)).saturating_sub(first);
        if visible > 0 && row >= self.offset + visible {
            self.offset = row + 1 - visible;
        }
        if row < self.offset {
            self.offset = row;
        }
    }
}

// ───────────────────────────────────────── widget ────────────

/// A table description, built fresh each frame.
///
/// `rows` is any slice of rows whose cells are string-like; every row must
/// have one cell per entry in `weights`.  A weight of zero counts as one.
#[derive(Debug, Clone, Copy)]
pub struct FlexTable<'a, R> {
    rows: &'a [R],
    weights: &'a [u16],
    header: bool,
    y: u16,
    max_y: u16,
    max_x: u16,
}

impl<'a, R> FlexTable<'a, R> {
    pub fn new(rows: &'a [R], weights: &'a [u16]) -> Self {
        Self {
            rows,
            weights,
            header: false,
            y: 0,
            max_y: 0,
            max_x: 0,
        }
    }

    /// Treat the first row as a header: always drawn, never selected or
    /// scrolled.
    pub fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// First terminal line of the table.
    pub fn y(mut self, y: u16) -> Self {
        self.y = y;
        self
    }

    /// Line the table must stop before.  0 means the terminal height.
    pub fn max_y(mut self, max_y: u16) -> Self {
        self.max_y = max_y;
        self
    }

    /// Width shared by the columns.  0 means the terminal width.
    pub fn max_x(mut self, max_x: u16) -> Self {
        self.max_x = max_x;
        self
    }
}

impl<R> FlexTable<'_, R> {
    fn validate<C>(&self) -> Result<(), TableError>
    where
        R: AsRef<[C]>,
    {
        if self.weights.is_empty() {
            return Err(TableError::NoColumns);
        }
        for (row, cells) in self.rows.iter().enumerate() {
            let cells: &[C] = cells.as_ref();
            if cells.len() != self.weights.len() {
                return Err(TableError::ColumnMismatch {
                    row,
                    columns: cells.len(),
                    weights: self.weights.len(),
                });
            }
        }
        Ok(())
    }

    /// Apply `key`, update `state`, draw the table.  Returns the number of
    /// lines drawn, header included.
    pub fn render<C>(
        &self,
        screen: &mut dyn Screen,
        config: &EngineConfig,
        key: Option<KeyEvent>,
        state: &mut FlexTableState,
    ) -> Result<u16, TableError>
    where
        R: AsRef<[C]>,
        C: AsRef<str>,
    {
        if self.rows.is_empty() {
            return Ok(0);
        }
        self.validate::<C>()?;

        let first = usize::from(self.header);
        let rows = self.rows.len();

        if let Some(key) = key {
            if config.matches(Action::SelectUp, key) {
                state.select_prev();
            } else if config.matches(Action::SelectDown, key) {
                state.select_next();
            }
        }
        state.clamp_selection(first, rows);

        let (width, height) = screen.size();
        let max_y = if self.max_y == 0 { height } else { self.max_y };
        let max_x = if self.max_x == 0 { width } else { self.max_x };

        let weights: Vec<u16> = self.weights.iter().map(|&w| w.max(1)).collect();
        let weight_sum: u32 = weights.iter().map(|&w| u32::from(w)).sum();
        let per_unit = u32::from(max_x) / weight_sum;

        let mut line = self.y;
        if self.header {
            self.draw_row::<C>(screen, line, 0, &weights, per_unit, state.selected);
            line += 1;
        }

        state.follow_selection(first, rows, self.y, max_y);

        let mut index = first + state.offset;
        while index < rows && line < max_y {
            self.draw_row::<C>(screen, line, index, &weights, per_unit, state.selected);
            line += 1;
            index += 1;
        }

        Ok(line - self.y)
    }

    fn draw_row<C>(
        &self,
        screen: &mut dyn Screen,
        y: u16,
        index: usize,
        weights: &[u16],
        per_unit: u32,
        selected: usize,
    ) where
        R: AsRef<[C]>,
        C: AsRef<str>,
    {
        if index == selected {
            label(screen, 0, y, 0, ">", Theme::marker_style());
        }

        let cells: &[C] = self.rows[index].as_ref();
        let mut x: u16 = 1;
        for (column, cell) in cells.iter().enumerate() {
            let span = u32::from(weights[column]) * per_unit;
            let right = u16::try_from(u32::from(x) + span).unwrap_or(u16::MAX);
            let content: &str = cell.as_ref();
            if column == 0 {
                label(screen, x, y, right, content, Theme::cell_style());
            } else {
                label(screen, x, y, right, &format!(" {content}"), Theme::cell_style());
            }
            x = right;
        }
    }
}
