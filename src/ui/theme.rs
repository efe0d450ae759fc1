//! The few fixed styles the built-in widgets use.

use ratatui::style::{Color, Style};

/// Fixed widget styles.
pub struct Theme;

impl Theme {
    // ── flex table ─────────────────────────────────────────────
    /// The `>` in front of the selected row.
    pub fn marker_style() -> Style {
        Style::default()
    }

    /// Every table cell, header included.
    pub fn cell_style() -> Style {
        Style::default()
    }

    // ── markup ─────────────────────────────────────────────────
    /// Foreground for `[:name:]` tokens naming no known color (dark red).
    pub fn unknown_color() -> Color {
        Color::Rgb(0x8b, 0x00, 0x00)
    }
}
