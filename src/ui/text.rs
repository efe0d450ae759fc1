//! Plain text emission: one cell per glyph, wide glyphs take two.

use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;

use crate::screen::Screen;

/// Display width of `ch` as the emitter lays it out.  Control characters
/// count as one column because they are drawn as a blank.
pub fn char_width(ch: char) -> u16 {
    if ch.is_control() {
        return 1;
    }
    ch.width().unwrap_or(0) as u16
}

/// Write `text` starting at `(x, y)` and return the number of columns used.
///
/// Zero-width characters ride on the cell written just before them; with no
/// such cell they are drawn on a blank of width 1.  When `clip_x` is non-zero
/// no glyph is written that would reach past column `clip_x - 1`.
pub fn emit(screen: &mut dyn Screen, x: u16, y: u16, text: &str, style: Style, clip_x: u16) -> u16 {
    if text.is_empty() || (clip_x != 0 && x >= clip_x) {
        return 0;
    }

    let mut cursor = x;
    // Column, base glyph and marks of the last cell written.
    let mut last: Option<(u16, char, Vec<char>)> = None;

    for ch in text.chars() {
        let width = char_width(ch);

        if width == 0 {
            if let Some((col, base, marks)) = last.as_mut() {
                marks.push(ch);
                screen.set_content(*col, y, *base, marks, style);
                continue;
            }
        }

        let (glyph, marks, width) = match width {
            0 => (' ', vec![ch], 1),
            _ if ch.is_control() => (' ', Vec::new(), 1),
            w => (ch, Vec::new(), w),
        };

        if clip_x != 0 && cursor.saturating_add(width) > clip_x {
            break;
        }

        screen.set_content(cursor, y, glyph, &marks, style);
        last = Some((cursor, glyph, marks));
        cursor = cursor.saturating_add(width);
    }

    cursor - x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::MemoryScreen;

    fn symbol(screen: &MemoryScreen, x: u16, y: u16) -> String {
        screen.buffer().cell((x, y)).unwrap().symbol().to_string()
    }

    #[test]
    fn ascii_takes_one_column_each() {
        let mut screen = MemoryScreen::new(20, 1);
        let w = emit(&mut screen, 2, 0, "hello", Style::default(), 0);
        assert_eq!(w, 5);
        assert_eq!(screen.pending_line(0), "  hello");
    }

    #[test]
    fn wide_glyphs_take_two_columns() {
        let mut screen = MemoryScreen::new(20, 1);
        let w = emit(&mut screen, 0, 0, "日本a", Style::default(), 0);
        assert_eq!(w, 5);
        assert_eq!(symbol(&screen, 0, 0), "日");
        assert_eq!(symbol(&screen, 2, 0), "本");
        assert_eq!(symbol(&screen, 4, 0), "a");
    }

    #[test]
    fn combining_marks_attach_to_previous_cell() {
        let mut screen = MemoryScreen::new(20, 1);
        let w = emit(&mut screen, 0, 0, "e\u{301}x", Style::default(), 0);
        assert_eq!(w, 2);
        assert_eq!(symbol(&screen, 0, 0), "e\u{301}");
        assert_eq!(symbol(&screen, 1, 0), "x");
    }

    #[test]
    fn leading_combining_mark_gets_a_blank() {
        let mut screen = MemoryScreen::new(20, 1);
        let w = emit(&mut screen, 0, 0, "\u{301}a", Style::default(), 0);
        assert_eq!(w, 2);
        assert_eq!(symbol(&screen, 0, 0), " \u{301}");
        assert_eq!(symbol(&screen, 1, 0), "a");
    }

    #[test]
    fn width_is_sum_of_glyph_widths() {
        for text in ["abc", "a\u{301}b\u{308}c", "日本", "x日\u{301}y"] {
            let mut screen = MemoryScreen::new(40, 1);
            let expected: u16 = text
                .chars()
                .enumerate()
                .map(|(i, c)| if i == 0 { char_width(c).max(1) } else { char_width(c) })
                .sum();
            assert_eq!(emit(&mut screen, 0, 0, text, Style::default(), 0), expected, "{text:?}");
        }
    }

    #[test]
    fn clip_stops_before_the_clip_column() {
        let mut screen = MemoryScreen::new(20, 1);
        let w = emit(&mut screen, 1, 0, "abcdef", Style::default(), 4);
        assert_eq!(w, 3);
        assert_eq!(screen.pending_line(0), " abc");
    }

    #[test]
    fn wide_glyph_that_would_straddle_the_clip_is_dropped() {
        let mut screen = MemoryScreen::new(20, 1);
        let w = emit(&mut screen, 0, 0, "a日", Style::default(), 2);
        assert_eq!(w, 1);
        assert_eq!(screen.pending_line(0), "a");
    }

    #[test]
    fn starting_at_or_past_the_clip_writes_nothing() {
        let mut screen = MemoryScreen::new(20, 1);
        assert_eq!(emit(&mut screen, 5, 0, "abc", Style::default(), 5), 0);
        assert_eq!(emit(&mut screen, 7, 0, "abc", Style::default(), 5), 0);
        assert_eq!(screen.pending_line(0), "");
    }

    #[test]
    fn control_characters_render_blank() {
        let mut screen = MemoryScreen::new(20, 1);
        let w = emit(&mut screen, 0, 0, "a\tb", Style::default(), 0);
        assert_eq!(w, 3);
        assert_eq!(screen.pending_line(0), "a b");
    }
}
