//! Single-line text input whose value lives in the caller's `String`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use unicode_width::UnicodeWidthStr;

use super::text::emit;
use crate::config::{Action, EngineConfig};
use crate::screen::Screen;

/// Accepts ASCII digits and `.`.
///
/// Several dots are let through; parse the result if it has to be a number.
pub fn filter_decimal(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Accepts everything.
pub fn accept_all(_: char) -> bool {
    true
}

/// A key that types a character: `Char` without Ctrl or Alt held.
pub fn typed_char(key: KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Some(c)
        }
        _ => None,
    }
}

/// Apply the pending key to `text`.  Returns `true` if the text changed.
pub fn apply_key(
    text: &mut String,
    key: Option<KeyEvent>,
    config: &EngineConfig,
    filter: impl Fn(char) -> bool,
) -> bool {
    let Some(key) = key else {
        return false;
    };

    if config.matches(Action::Erase, key) {
        return text.pop().is_some();
    }

    match typed_char(key) {
        Some(c) if filter(c) => {
            text.push(c);
            true
        }
        _ => false,
    }
}

/// `text` right-aligned in a field at least `width` columns wide.
pub fn padded(text: &str, width: u16) -> String {
    let used = text.width();
    let width = usize::from(width.max(1));
    if used >= width {
        return text.to_string();
    }
    format!("{}{text}", " ".repeat(width - used))
}

/// Update `text` from `key`, then draw it.  Returns the columns used.
#[allow(clippy::too_many_arguments)]
pub fn edit(
    screen: &mut dyn Screen,
    config: &EngineConfig,
    key: Option<KeyEvent>,
    x: u16,
    y: u16,
    width: u16,
    text: &mut String,
    filter: impl Fn(char) -> bool,
    style: Style,
) -> u16 {
    apply_key(text, key, config, filter);
    emit(screen, x, y, &padded(text, width), style, 0)
}
