// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{borrow::Cow, io::Write};

use crossterm::{cursor::MoveToPreviousLine,
                style::{Attribute, Print, SetAttribute},
                terminal::{Clear, ClearType}};
use unicode_width::UnicodeWidthChar as _;

use crate::{Entry, SelectionState, SetAccentForeground, Size, execute_commands,
            queue_commands};

/// How a single row is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Plain,
    /// The highlighted row.
    Inverse,
    /// The currently active entry.
    Accent,
    InverseAccent,
}

impl RowStyle {
    #[must_use]
    pub fn new(is_selected: bool, is_current: bool) -> Self {
        match (is_selected, is_current) {
            (true, true) => RowStyle::InverseAccent,
            (true, false) => RowStyle::Inverse,
            (false, true) => RowStyle::Accent,
            (false, false) => RowStyle::Plain,
        }
    }
}

/// Draws the header and the visible rows in place, below wherever the cursor was when
/// the first frame was drawn.
///
/// Each frame starts by moving the cursor back up over the previous frame, so only this
/// region of the screen is ever touched. Every line is erased to its end after it is
/// written, which takes care of leftovers from a longer line in the previous frame.
#[derive(Debug)]
pub struct Renderer {
    header: String,
    lines_previously_drawn: u16,
}

impl Renderer {
    pub fn new(header: impl Into<String>) -> Self {
        Renderer {
            header: header.into(),
            lines_previously_drawn: 0,
        }
    }

    /// Lines the next frame will move up over before drawing.
    #[must_use]
    pub fn lines_previously_drawn(&self) -> u16 { self.lines_previously_drawn }

    /// Draw one frame and flush `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `output` fails.
    pub fn draw<W: Write>(
        &mut self,
        output: &mut W,
        entries: &[Entry],
        state: &SelectionState,
        size: Size,
    ) -> miette::Result<()> {
        let max_width = size.max_text_width();
        let visible_range = state.visible_range(size.visible_rows());

        if self.lines_previously_drawn > 0 {
            queue_commands!(output, MoveToPreviousLine(self.lines_previously_drawn));
        }

        queue_commands!(
            output,
            Print(clip_to_width(&self.header, max_width)),
            Clear(ClearType::UntilNewLine),
            Print("\n"),
        );
        let mut lines_drawn: u16 = 1;

        for index in visible_range {
            let Some(entry) = entries.get(index) else {
                break;
            };
            let row_style = RowStyle::new(index == state.selected_index, entry.is_current);
            match row_style {
                RowStyle::Plain => {}
                RowStyle::Inverse => queue_commands!(output, SetAttribute(Attribute::Reverse)),
                RowStyle::Accent => queue_commands!(output, SetAccentForeground),
                RowStyle::InverseAccent => queue_commands!(
                    output,
                    SetAttribute(Attribute::Reverse),
                    SetAccentForeground
                ),
            }
            queue_commands!(
                output,
                Print(clip_to_width(&entry.display_line, max_width)),
                SetAttribute(Attribute::Reset),
                Clear(ClearType::UntilNewLine),
                Print("\n"),
            );
            lines_drawn = lines_drawn.saturating_add(1);
        }

        execute_commands!(output);

        tracing::trace!(
            message = "frame drawn",
            moved_up = self.lines_previously_drawn,
            lines_drawn,
            selected_index = state.selected_index,
            scroll_offset = state.scroll_offset,
            ?size
        );
        self.lines_previously_drawn = lines_drawn;

        Ok(())
    }
}

/// Tab stops are every this many columns.
pub const TAB_WIDTH: usize = 8;

/// Clip `text` to at most `max_width` display columns. Text that already fits is
/// returned as is. A wide character that would straddle the limit is dropped whole.
///
/// Control characters would otherwise move the cursor on their own, so a tab is
/// expanded with spaces up to the next tab stop and any other control character is
/// shown as one space.
#[must_use]
pub fn clip_to_width(text: &str, max_width: usize) -> Cow<'_, str> {
    let mut width = 0;
    for (byte_index, ch) in text.char_indices() {
        if ch.is_control() {
            return Cow::Owned(clip_replacing_controls(text, max_width));
        }
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            return Cow::Borrowed(&text[..byte_index]);
        }
        width += ch_width;
    }
    Cow::Borrowed(text)
}

fn clip_replacing_controls(text: &str, max_width: usize) -> String {
    let mut acc = String::with_capacity(text.len());
    let mut width = 0;
    for ch in text.chars() {
        if ch.is_control() {
            let spaces = if ch == '\t' {
                TAB_WIDTH - width % TAB_WIDTH
            } else {
                1
            };
            let spaces = spaces.min(max_width - width);
            acc.extend(std::iter::repeat_n(' ', spaces));
            width += spaces;
            continue;
        }
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        acc.push(ch);
        width += ch_width;
    }
    acc
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;
    use unicode_width::UnicodeWidthStr as _;

    use super::*;
    use crate::{SGR_FG_ACCENT, SGR_INVERSE, SGR_RESET, SEQ_ERASE_TO_EOL,
                seq_cursor_previous_line};

    const HEADER: &str = "Pick one";

    fn two_entries() -> Vec<Entry> {
        vec![
            Entry::new("main", "* main abc Initial", true),
            Entry::new("dev", "  dev def Work", false),
        ]
    }

    fn draw_to_string(
        renderer: &mut Renderer,
        entries: &[Entry],
        state: &SelectionState,
        size: Size,
    ) -> String {
        let mut output = Vec::new();
        renderer.draw(&mut output, entries, state, size).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_first_frame() {
        let entries = two_entries();
        let state = SelectionState::from_entries(&entries, 22);
        let mut renderer = Renderer::new(HEADER);

        let output = draw_to_string(&mut renderer, &entries, &state, Size::new(24, 80));

        let expected = format!(
            "{HEADER}{SEQ_ERASE_TO_EOL}\n\
             {SGR_INVERSE}{SGR_FG_ACCENT}* main abc Initial{SGR_RESET}{SEQ_ERASE_TO_EOL}\n\
             \u{20} dev def Work{SGR_RESET}{SEQ_ERASE_TO_EOL}\n"
        );
        assert_eq!(output, expected);
        assert_eq!(renderer.lines_previously_drawn(), 3);
    }

    #[test]
    fn test_second_frame_moves_up_over_the_first() {
        let entries = two_entries();
        let mut state = SelectionState::from_entries(&entries, 22);
        let mut renderer = Renderer::new(HEADER);
        draw_to_string(&mut renderer, &entries, &state, Size::new(24, 80));

        state.move_by(1, 22);
        let output = draw_to_string(&mut renderer, &entries, &state, Size::new(24, 80));

        let expected = format!(
            "{}{HEADER}{SEQ_ERASE_TO_EOL}\n\
             {SGR_FG_ACCENT}* main abc Initial{SGR_RESET}{SEQ_ERASE_TO_EOL}\n\
             {SGR_INVERSE}  dev def Work{SGR_RESET}{SEQ_ERASE_TO_EOL}\n",
            seq_cursor_previous_line(3)
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn test_only_the_scroll_window_is_drawn() {
        let entries: Vec<Entry> = (0..50)
            .map(|index| Entry::new(format!("b{index}"), format!("row {index}"), false))
            .collect();
        let state = SelectionState {
            selected_index: 12,
            scroll_offset: 3,
            entry_count: 50,
        };
        let size = Size::new(12, 80);
        let mut renderer = Renderer::new(HEADER);

        let output = draw_to_string(&mut renderer, &entries, &state, size);

        assert_eq!(renderer.lines_previously_drawn(), size.rows - 1);
        assert_eq!(output.matches('\n').count(), 11);
        assert!(!output.contains("row 2\x1b"));
        assert!(output.contains("row 3\x1b"));
        assert!(output.contains("row 12\x1b"));
        assert!(!output.contains("row 13\x1b"));
    }

    #[test]
    fn test_rows_are_clipped_to_viewport_width() {
        let entries = vec![
            Entry::new("long", "x".repeat(100), false),
            Entry::new("short", "short", false),
        ];
        let state = SelectionState::from_entries(&entries, 10);
        let mut renderer = Renderer::new(HEADER);

        let output = draw_to_string(&mut renderer, &entries, &state, Size::new(12, 20));

        assert!(output.contains(&format!("{}{SGR_RESET}", "x".repeat(19))));
        assert!(!output.contains(&"x".repeat(20)));
        assert!(output.contains(&format!("short{SGR_RESET}")));
    }

    #[test_case(true, true, RowStyle::InverseAccent)]
    #[test_case(true, false, RowStyle::Inverse)]
    #[test_case(false, true, RowStyle::Accent)]
    #[test_case(false, false, RowStyle::Plain)]
    fn test_row_style(is_selected: bool, is_current: bool, expected: RowStyle) {
        assert_eq!(RowStyle::new(is_selected, is_current), expected);
    }

    #[test_case("hello world", 5, "hello" ; "longer is clipped")]
    #[test_case("hello", 5, "hello" ; "exact fit")]
    #[test_case("hi", 5, "hi" ; "shorter is untouched")]
    #[test_case("", 5, "" ; "empty")]
    #[test_case("hello", 0, "" ; "zero width")]
    #[test_case("日本語", 5, "日本" ; "wide char straddling the edge is dropped")]
    #[test_case("naïve café", 6, "naïve " ; "multi byte narrow chars")]
    fn test_clip_to_width(text: &str, max_width: usize, expected: &str) {
        assert_eq!(clip_to_width(text, max_width), expected);
    }

    #[test_case("a\tb", 20, "a       b" ; "tab reaches the next stop")]
    #[test_case("12345678\tb", 20, "12345678        b" ; "tab at a stop is a full stop")]
    #[test_case("abc\tdef", 5, "abc  " ; "tab clipped at the edge")]
    #[test_case("x\x07y\x1b[31mz", 20, "x y [31mz" ; "other control chars become spaces")]
    fn test_clip_replaces_control_chars(text: &str, max_width: usize, expected: &str) {
        assert_eq!(clip_to_width(text, max_width), expected);
    }

    #[test]
    fn test_row_with_tabs_never_exceeds_the_limit() {
        let subject = "* main\t1b2c3d4\tfix:\tsomething\twith\ttabs\t\t\t";
        for max_width in 0..60 {
            assert!(clip_to_width(subject, max_width).width() <= max_width);
        }
    }

    #[test]
    fn test_clipped_width_is_exactly_the_limit() {
        for cols in [2_u16, 10, 40, 80] {
            let max_width = Size::new(24, cols).max_text_width();
            let long_line = "abcdefghij".repeat(10);
            assert_eq!(clip_to_width(&long_line, max_width).width(), max_width);
        }
    }
}
