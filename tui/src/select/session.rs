// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::Write;

use crossterm::cursor::{Hide, Show};

use crate::{Entry, ItemSource, KeyPressReader, Renderer, SelectAction, SelectError,
            SelectionState, SessionOutcome, TerminalModeController, TerminalModeGuard,
            ViewportInspector, execute_commands};

/// List the entries, run an interactive session over them in raw mode, and commit the
/// confirmed entry once the terminal is back to normal.
///
/// The order of side effects is fixed:
/// 1. [`ItemSource::list_items`]. An empty list returns [`SelectError::NoItems`] before
///    anything is written to `output`.
/// 2. [`TerminalModeController::acquire`].
/// 3. [`run_session`], which hides the cursor and shows it again on its way out.
/// 4. The terminal mode guard is released, even if the session failed.
/// 5. [`ItemSource::commit`], only for [`SessionOutcome::Committed`].
///
/// # Errors
///
/// Returns the first error from any of those steps. When the session and the release
/// both fail, the session's error wins.
pub fn select_and_commit<S, T, W, K, V>(
    source: &mut S,
    terminal: &mut T,
    output: &mut W,
    reader: &mut K,
    viewport: &V,
    header: &str,
) -> miette::Result<SessionOutcome>
where
    S: ItemSource + ?Sized,
    T: TerminalModeController + ?Sized,
    W: Write,
    K: KeyPressReader + ?Sized,
    V: ViewportInspector + ?Sized,
{
    let entries = source.list_items()?;
    if entries.is_empty() {
        return Err(SelectError::NoItems.into());
    }
    tracing::debug!(message = "entries loaded", count = entries.len());

    let guard = terminal.acquire()?;
    let session_result = run_session(&entries, header, output, reader, viewport);
    let release_result = guard.release();

    let outcome = session_result?;
    release_result?;

    // % is Display, ? is Debug.
    tracing::debug!(message = "session ended", outcome = ?outcome);

    if let SessionOutcome::Committed { label } = &outcome {
        source.commit(label)?;
    }

    Ok(outcome)
}

/// Run the input loop until the user confirms or quits.
///
/// The cursor is hidden once on entry and shown exactly once on the way out, whether
/// the loop ends normally, with an error, or by a panic unwinding through it.
///
/// # Errors
///
/// Returns an error if writing to `output` or reading a key press fails.
pub fn run_session<W, K, V>(
    entries: &[Entry],
    header: &str,
    output: &mut W,
    reader: &mut K,
    viewport: &V,
) -> miette::Result<SessionOutcome>
where
    W: Write,
    K: KeyPressReader + ?Sized,
    V: ViewportInspector + ?Sized,
{
    let mut hidden_cursor = HiddenCursor::hide(output)?;

    let loop_result = event_loop(entries, header, &mut *hidden_cursor.output, reader, viewport);
    let show_result = hidden_cursor.show();

    let outcome = loop_result?;
    show_result?;
    Ok(outcome)
}

/// Keeps the cursor hidden while alive. [`HiddenCursor::show`] reports a failed write;
/// [`Drop`] shows the cursor on any other way out and ignores failures.
struct HiddenCursor<'a, W: Write> {
    output: &'a mut W,
    shown: bool,
}

impl<'a, W: Write> HiddenCursor<'a, W> {
    fn hide(output: &'a mut W) -> miette::Result<Self> {
        execute_commands!(output, Hide);
        Ok(HiddenCursor {
            output,
            shown: false,
        })
    }

    fn show(mut self) -> miette::Result<()> {
        self.shown = true;
        execute_commands!(self.output, Show);
        Ok(())
    }
}

impl<W: Write> Drop for HiddenCursor<'_, W> {
    fn drop(&mut self) {
        if self.shown {
            return;
        }
        self.shown = true;
        let result = crossterm::QueueableCommand::queue(&mut *self.output, Show)
            .and_then(|output| output.flush());
        if let Err(error) = result {
            // % is Display, ? is Debug.
            tracing::error!(message = "failed to show the cursor", error = %error);
        }
    }
}

fn event_loop<W, K, V>(
    entries: &[Entry],
    header: &str,
    output: &mut W,
    reader: &mut K,
    viewport: &V,
) -> miette::Result<SessionOutcome>
where
    W: Write,
    K: KeyPressReader + ?Sized,
    V: ViewportInspector + ?Sized,
{
    let mut renderer = Renderer::new(header);

    let size = viewport.dimensions();
    let mut state = SelectionState::from_entries(entries, size.visible_rows());
    renderer.draw(output, entries, &state, size)?;

    loop {
        let Some(key_press) = reader.read_key_press()? else {
            tracing::warn!(message = "input stream ended, quitting");
            return Ok(state.quit());
        };

        let action = SelectAction::from(key_press);
        tracing::debug!(message = "key press", ?key_press, ?action);

        match action {
            SelectAction::MoveUp => state.move_by(-1, viewport.dimensions().visible_rows()),
            SelectAction::MoveDown => state.move_by(1, viewport.dimensions().visible_rows()),
            SelectAction::Confirm => return Ok(state.confirm(entries)),
            SelectAction::Quit => return Ok(state.quit()),
            SelectAction::Ignore => {}
        }

        let size = viewport.dimensions();
        state.fit_to_viewport(size.visible_rows());
        renderer.draw(output, entries, &state, size)?;
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, io::Cursor};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{DecodingKeyReader, FixedViewport, KeyPress, SEQ_HIDE_CURSOR,
                SEQ_SHOW_CURSOR, Size, seq_cursor_previous_line,
                test_fixtures::{MockItemSource, MockTerminal}};

    const HEADER: &str = "Select git branch";

    fn scenario_a_entries() -> Vec<Entry> {
        vec![
            Entry::new("main", "* main abc Initial", true),
            Entry::new("dev", "  dev def Work", false),
        ]
    }

    fn numbered_entries(count: usize) -> Vec<Entry> {
        (0..count)
            .map(|index| Entry::new(format!("b{index}"), format!("row {index}"), false))
            .collect()
    }

    struct Run {
        result: miette::Result<SessionOutcome>,
        output: String,
        source: MockItemSource,
        terminal: MockTerminal,
    }

    fn run(entries: Vec<Entry>, input: &[u8], size: Size) -> Run {
        let mut source = MockItemSource::new(entries);
        let mut terminal = MockTerminal::default();
        let mut output = Vec::new();
        let mut reader = DecodingKeyReader::new(Cursor::new(input.to_vec()));
        let viewport = FixedViewport::new(size);

        let result = select_and_commit(
            &mut source,
            &mut terminal,
            &mut output,
            &mut reader,
            &viewport,
            HEADER,
        );

        Run {
            result,
            output: String::from_utf8(output).unwrap(),
            source,
            terminal,
        }
    }

    fn assert_cursor_hidden_then_shown_once(output: &str) {
        assert_eq!(output.matches(SEQ_HIDE_CURSOR).count(), 1);
        assert_eq!(output.matches(SEQ_SHOW_CURSOR).count(), 1);
        assert!(output.starts_with(SEQ_HIDE_CURSOR));
        assert!(output.ends_with(SEQ_SHOW_CURSOR));
    }

    /// The text of the last frame, from the last cursor move up to the end.
    fn last_frame(output: &str, lines: u16) -> &str {
        let marker = seq_cursor_previous_line(lines);
        let start = output.rfind(&marker).unwrap();
        &output[start..]
    }

    #[test]
    fn test_down_then_enter_commits_the_next_entry() {
        let it = run(scenario_a_entries(), b"\x1b[B\r", Size::new(24, 80));

        assert_eq!(
            it.result.unwrap(),
            SessionOutcome::Committed {
                label: "dev".into()
            }
        );
        assert_eq!(it.source.committed_labels, vec!["dev".to_string()]);
        assert_eq!(it.source.list_calls, 1);
        assert_cursor_hidden_then_shown_once(&it.output);
        assert_eq!(it.terminal.acquire_count.get(), 1);
        assert_eq!(it.terminal.release_count.get(), 1);
    }

    #[test]
    fn test_vi_keys_and_line_feed() {
        let it = run(scenario_a_entries(), b"jjkj\n", Size::new(24, 80));
        assert_eq!(
            it.result.unwrap(),
            SessionOutcome::Committed {
                label: "dev".into()
            }
        );
    }

    #[test]
    fn test_empty_list_never_touches_the_terminal() {
        let it = run(vec![], b"\r", Size::new(24, 80));

        let report = it.result.unwrap_err();
        assert!(SelectError::is_no_items(&report));
        assert_eq!(it.output, "");
        assert_eq!(it.terminal.acquire_count.get(), 0);
        assert!(it.source.committed_labels.is_empty());
    }

    #[test]
    fn test_scroll_follows_selection_over_a_long_list() {
        let mut input = b"\x1b[B".repeat(12);
        input.push(b'q');
        let it = run(numbered_entries(50), &input, Size::new(12, 80));

        assert_eq!(it.result.unwrap(), SessionOutcome::Quit);
        let frame = last_frame(&it.output, 11);
        assert!(!frame.contains("row 2\x1b"));
        assert!(frame.contains("row 3\x1b"));
        assert!(frame.contains("\x1b[7mrow 12\x1b"));
        assert!(!frame.contains("row 13\x1b"));
    }

    #[test]
    fn test_quit_does_not_commit() {
        for input in [&b"q"[..], b"jq", b"\x03", b""] {
            let it = run(scenario_a_entries(), input, Size::new(24, 80));
            assert_eq!(it.result.unwrap(), SessionOutcome::Quit);
            assert!(it.source.committed_labels.is_empty());
            assert_cursor_hidden_then_shown_once(&it.output);
            assert_eq!(it.terminal.release_count.get(), 1);
        }
    }

    #[test]
    fn test_unrecognized_keys_redraw_without_moving() {
        let it = run(scenario_a_entries(), b"x\x1b[C\x1bq", Size::new(24, 80));
        assert_eq!(it.result.unwrap(), SessionOutcome::Quit);
        // First frame plus one redraw for each of the three ignored keys.
        assert_eq!(it.output.matches(HEADER).count(), 4);
        assert_eq!(it.output.matches("\x1b[7m\x1b[32m* main").count(), 4);
    }

    #[test]
    fn test_frames_never_exceed_the_viewport() {
        let size = Size::new(5, 80);
        let mut input = b"j".repeat(20);
        input.extend_from_slice(&b"k".repeat(20));
        input.push(b'q');
        let it = run(numbered_entries(8), &input, size);

        assert!(it.result.is_ok());
        let frames = it.output.split(&seq_cursor_previous_line(4)).count();
        assert_eq!(frames, 41);
        for frame in it.output.split(&seq_cursor_previous_line(4)) {
            assert!(frame.matches('\n').count() <= usize::from(size.rows - 1));
        }
    }

    #[test]
    fn test_acquire_failure_leaves_the_cursor_alone() {
        let mut source = MockItemSource::new(scenario_a_entries());
        let mut terminal = MockTerminal {
            fail_on_acquire: true,
            ..MockTerminal::default()
        };
        let mut output = Vec::new();
        let mut reader = DecodingKeyReader::new(Cursor::new(b"\r".to_vec()));

        let result = select_and_commit(
            &mut source,
            &mut terminal,
            &mut output,
            &mut reader,
            &FixedViewport::new(Size::new(24, 80)),
            HEADER,
        );

        assert!(result.is_err());
        assert!(output.is_empty());
        assert!(source.committed_labels.is_empty());
    }

    #[test]
    fn test_commit_error_surfaces_after_terminal_is_restored() {
        let mut source = MockItemSource {
            fail_on_commit: true,
            ..MockItemSource::new(scenario_a_entries())
        };
        let mut terminal = MockTerminal::default();
        let mut output = Vec::new();
        let mut reader = DecodingKeyReader::new(Cursor::new(b"\r".to_vec()));

        let result = select_and_commit(
            &mut source,
            &mut terminal,
            &mut output,
            &mut reader,
            &FixedViewport::new(Size::new(24, 80)),
            HEADER,
        );

        assert!(result.is_err());
        assert_eq!(terminal.release_count.get(), 1);
        assert_cursor_hidden_then_shown_once(&String::from_utf8(output).unwrap());
    }

    struct FailingReader;

    impl KeyPressReader for FailingReader {
        fn read_key_press(&mut self) -> miette::Result<Option<KeyPress>> {
            Err(miette::miette!("read failed"))
        }
    }

    #[test]
    fn test_read_error_restores_cursor_and_terminal() {
        let mut source = MockItemSource::new(scenario_a_entries());
        let mut terminal = MockTerminal::default();
        let mut output = Vec::new();

        let result = select_and_commit(
            &mut source,
            &mut terminal,
            &mut output,
            &mut FailingReader,
            &FixedViewport::new(Size::new(24, 80)),
            HEADER,
        );

        assert!(result.is_err());
        let output = String::from_utf8(output).unwrap();
        assert_cursor_hidden_then_shown_once(&output);
        assert_eq!(terminal.release_count.get(), 1);
        assert!(source.committed_labels.is_empty());
    }

    struct PanickingReader;

    impl KeyPressReader for PanickingReader {
        fn read_key_press(&mut self) -> miette::Result<Option<KeyPress>> {
            panic!("reader blew up");
        }
    }

    #[test]
    fn test_panic_in_the_loop_still_shows_the_cursor() {
        let entries = scenario_a_entries();
        let viewport = FixedViewport::new(Size::new(24, 80));
        let mut output = Vec::new();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            run_session(&entries, HEADER, &mut output, &mut PanickingReader, &viewport)
        }));

        assert!(result.is_err());
        assert_cursor_hidden_then_shown_once(&String::from_utf8(output).unwrap());
    }

    /// Resizes the viewport before handing out each key press.
    struct ResizingReader<'a> {
        viewport: &'a FixedViewport,
        steps: VecDeque<(Size, KeyPress)>,
    }

    impl KeyPressReader for ResizingReader<'_> {
        fn read_key_press(&mut self) -> miette::Result<Option<KeyPress>> {
            Ok(self.steps.pop_front().map(|(size, key_press)| {
                self.viewport.resize(size);
                key_press
            }))
        }
    }

    #[test]
    fn test_resize_is_picked_up_on_the_next_frame() {
        let entries = numbered_entries(20);
        let viewport = FixedViewport::new(Size::new(12, 80));
        let mut reader = ResizingReader {
            viewport: &viewport,
            steps: VecDeque::from([
                (Size::new(12, 80), KeyPress::Char('j')),
                (Size::new(4, 5), KeyPress::Char('x')),
                (Size::new(4, 5), KeyPress::Enter),
            ]),
        };
        let mut output = Vec::new();

        let outcome = run_session(&entries, HEADER, &mut output, &mut reader, &viewport).unwrap();

        assert_eq!(
            outcome,
            SessionOutcome::Committed {
                label: "b1".into()
            }
        );
        let output = String::from_utf8(output).unwrap();
        // Two rows at four columns each, under a clipped header.
        let frame = last_frame(&output, 11);
        assert!(frame.contains("Sele\x1b[K\n"));
        assert!(frame.contains("row \x1b[0m"));
        assert_eq!(frame.matches('\n').count(), 3);
    }
}
