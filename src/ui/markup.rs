//! Inline color markup for labels.
//!
//! A label may contain `[:name:]` tokens (`name` is one or more ASCII letters,
//! digits or underscores).  Each token switches the foreground color of the
//! text that follows; `[:default:]` goes back to the label's own foreground.
//! Tokens are never drawn.

use ratatui::style::{Color, Style};

use super::{text::emit, theme::Theme};
use crate::screen::Screen;

/// One piece of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Color(&'a str),
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split `text` into literal runs and color tokens, in order.
pub fn parse(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut run_start = 0;
    let mut search = 0;

    while let Some(found) = text[search..].find("[:") {
        let open = search + found;
        let name_start = open + 2;
        let name_len = text[name_start..]
            .find(|c: char| !is_word(c))
            .unwrap_or(text.len() - name_start);
        let name_end = name_start + name_len;

        if name_len == 0 || !text[name_end..].starts_with(":]") {
            search = open + 1;
            continue;
        }

        if open > run_start {
            segments.push(Segment::Text(&text[run_start..open]));
        }
        segments.push(Segment::Color(&text[name_start..name_end]));
        run_start = name_end + 2;
        search = run_start;
    }

    if run_start < text.len() {
        segments.push(Segment::Text(&text[run_start..]));
    }
    segments
}

/// Named colors beyond the sixteen ANSI names ratatui already knows.
const NAMED_COLORS: &[(&str, Color)] = &[
    ("maroon", Color::Rgb(0x80, 0x00, 0x00)),
    ("darkred", Color::Rgb(0x8b, 0x00, 0x00)),
    ("darkgreen", Color::Rgb(0x00, 0x64, 0x00)),
    ("darkblue", Color::Rgb(0x00, 0x00, 0x8b)),
    ("darkcyan", Color::Rgb(0x00, 0x8b, 0x8b)),
    ("darkmagenta", Color::Rgb(0x8b, 0x00, 0x8b)),
    ("darkorange", Color::Rgb(0xff, 0x8c, 0x00)),
    ("darkviolet", Color::Rgb(0x94, 0x00, 0xd3)),
    ("orange", Color::Rgb(0xff, 0xa5, 0x00)),
    ("navy", Color::Rgb(0x00, 0x00, 0x80)),
    ("olive", Color::Rgb(0x80, 0x80, 0x00)),
    ("purple", Color::Rgb(0x80, 0x00, 0x80)),
    ("teal", Color::Rgb(0x00, 0x80, 0x80)),
    ("silver", Color::Rgb(0xc0, 0xc0, 0xc0)),
    ("lime", Color::Rgb(0x00, 0xff, 0x00)),
    ("fuchsia", Color::Rgb(0xff, 0x00, 0xff)),
    ("aqua", Color::Rgb(0x00, 0xff, 0xff)),
    ("gold", Color::Rgb(0xff, 0xd7, 0x00)),
    ("pink", Color::Rgb(0xff, 0xc0, 0xcb)),
    ("brown", Color::Rgb(0xa5, 0x2a, 0x2a)),
    ("crimson", Color::Rgb(0xdc, 0x14, 0x3c)),
    ("coral", Color::Rgb(0xff, 0x7f, 0x50)),
    ("salmon", Color::Rgb(0xfa, 0x80, 0x72)),
    ("tomato", Color::Rgb(0xff, 0x63, 0x47)),
    ("khaki", Color::Rgb(0xf0, 0xe6, 0x8c)),
    ("orchid", Color::Rgb(0xda, 0x70, 0xd6)),
    ("violet", Color::Rgb(0xee, 0x82, 0xee)),
    ("indigo", Color::Rgb(0x4b, 0x00, 0x82)),
    ("skyblue", Color::Rgb(0x87, 0xce, 0xeb)),
];

/// Resolve a token name: the table above first, then ratatui's own names
/// (`red`, `lightblue`, `darkgray`, `42`, …).
pub fn color_by_name(name: &str) -> Option<Color> {
    NAMED_COLORS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|&(_, color)| color)
        .or_else(|| name.parse::<Color>().ok())
}

/// Running style after the token `name`.  `base` is the label's own style.
fn apply_token(current: Style, base: Style, name: &str) -> Style {
    let fg = if name == "default" {
        base.fg
    } else {
        Some(color_by_name(name).unwrap_or_else(Theme::unknown_color))
    };
    let mut next = current;
    next.fg = fg;
    next
}

/// Draw a label with markup, clipped at `clip_x` (0 = unclipped).  Returns
/// the number of columns used.
pub fn label(screen: &mut dyn Screen, x: u16, y: u16, clip_x: u16, text: &str, style: Style) -> u16 {
    let mut cursor = x;
    let mut running = style;

    for segment in parse(text) {
        match segment {
            Segment::Text(run) => {
                cursor = cursor.saturating_add(emit(screen, cursor, y, run, running, clip_x));
            }
            Segment::Color(name) => running = apply_token(running, style, name),
        }
    }

    cursor - x
}
