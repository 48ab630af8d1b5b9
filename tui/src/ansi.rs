// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The complete set of escape sequences this crate writes to the display, and macros to
//! queue [`crossterm`] commands onto any [`std::io::Write`] with [`miette`] error
//! conversion.
//!
//! Most sequences come straight from [`crossterm`] commands. The accent color is the one
//! exception: [`crossterm::style::Color::DarkGreen`] is encoded as `ESC[38;5;2m`, while
//! the contract with existing terminals is the 8-color `ESC[32m`, so
//! [`SetAccentForeground`] writes that directly.

use std::fmt;

/// Hide the cursor.
pub const SEQ_HIDE_CURSOR: &str = "\x1b[?25l";

/// Show the cursor.
pub const SEQ_SHOW_CURSOR: &str = "\x1b[?25h";

/// Erase from the cursor to the end of the current line.
pub const SEQ_ERASE_TO_EOL: &str = "\x1b[K";

/// SGR inverse video.
pub const SGR_INVERSE: &str = "\x1b[7m";

/// SGR 8-color green foreground, used to mark the currently active entry.
pub const SGR_FG_ACCENT: &str = "\x1b[32m";

/// SGR reset all attributes.
pub const SGR_RESET: &str = "\x1b[0m";

/// Move the cursor to the start of the line `n` lines up (`CSI n F`).
#[must_use]
pub fn seq_cursor_previous_line(n: u16) -> String { format!("\x1b[{n}F") }

/// Queue commands to a writer without flushing it. Each command is converted to a
/// [`miette::Report`] on failure, and `?` returns early from the enclosing function.
#[macro_export]
macro_rules! queue_commands {
    ($writer:expr $(, $command:expr)* $(,)?) => {{
        use miette::IntoDiagnostic as _;
        $(
            ::crossterm::QueueableCommand::queue(
                &mut *$writer,
                $command
            ).into_diagnostic()?;
        )*
    }}
}

/// This is similar to [`queue_commands!`], but it also flushes the writer after all the
/// commands are queued.
#[macro_export]
macro_rules! execute_commands {
    ($writer:expr $(, $command:expr)* $(,)?) => {{
        use miette::IntoDiagnostic as _;
        $(
            ::crossterm::QueueableCommand::queue(
                &mut *$writer,
                $command
            ).into_diagnostic()?;
        )*
        ::std::io::Write::flush(&mut *$writer).into_diagnostic()?;
    }}
}

/// Sets the foreground to the 8-color accent green (`ESC[32m`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetAccentForeground;

impl crossterm::Command for SetAccentForeground {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result { f.write_str(SGR_FG_ACCENT) }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        crossterm::Command::execute_winapi(&crossterm::style::SetForegroundColor(
            crossterm::style::Color::DarkGreen,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crossterm::{cursor::{Hide, MoveToPreviousLine, Show},
                    style::{Attribute, Print, SetAttribute},
                    terminal::{Clear, ClearType}};
    use pretty_assertions::assert_eq;

    use super::*;

    fn queue_into_string(f: impl FnOnce(&mut Vec<u8>) -> miette::Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_crossterm_commands_match_wire_contract() {
        let output = queue_into_string(|w| {
            queue_commands!(w, Hide);
            Ok(())
        });
        assert_eq!(output, SEQ_HIDE_CURSOR);

        let output = queue_into_string(|w| {
            queue_commands!(w, Show);
            Ok(())
        });
        assert_eq!(output, SEQ_SHOW_CURSOR);

        let output = queue_into_string(|w| {
            queue_commands!(w, Clear(ClearType::UntilNewLine));
            Ok(())
        });
        assert_eq!(output, SEQ_ERASE_TO_EOL);

        let output = queue_into_string(|w| {
            queue_commands!(
                w,
                SetAttribute(Attribute::Reverse),
                SetAccentForeground,
                SetAttribute(Attribute::Reset)
            );
            Ok(())
        });
        assert_eq!(output, format!("{SGR_INVERSE}{SGR_FG_ACCENT}{SGR_RESET}"));

        let output = queue_into_string(|w| {
            queue_commands!(w, MoveToPreviousLine(3));
            Ok(())
        });
        assert_eq!(output, seq_cursor_previous_line(3));
    }

    #[test]
    fn test_execute_commands_flushes() {
        let output = queue_into_string(|w| {
            execute_commands!(w, Print("hello"), Show);
            Ok(())
        });
        assert_eq!(output, format!("hello{SEQ_SHOW_CURSOR}"));
    }
}
