// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

/// Errors that the selector itself can produce. Everything else (I/O on the output
/// writer, failures reported by an [`crate::ItemSource`]) travels as a plain
/// [`miette::Report`].
///
/// Callers that need to pick an exit code can recover this type with
/// [`miette::Report::downcast_ref`].
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SelectError {
    /// The item source returned an empty list. The session is never started.
    #[error("no items found")]
    #[diagnostic(code(git_select_tui::no_items))]
    NoItems,

    #[error("raw mode is already active in this process")]
    #[diagnostic(
        code(git_select_tui::raw_mode_nested),
        help("Release the existing raw mode guard before acquiring a new one.")
    )]
    RawModeAlreadyActive,

    #[error("failed to open the controlling terminal")]
    #[diagnostic(
        code(git_select_tui::no_terminal),
        help("This program needs an interactive terminal. Is stdin or /dev/tty available?")
    )]
    NoTerminal {
        #[source]
        source: io::Error,
    },

    #[error("failed to {action} terminal attributes")]
    #[diagnostic(code(git_select_tui::terminal_attributes))]
    TerminalAttributes {
        action: TerminalAttributesAction,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalAttributesAction {
    Retrieve,
    Set,
    Restore,
}

impl std::fmt::Display for TerminalAttributesAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalAttributesAction::Retrieve => write!(f, "retrieve"),
            TerminalAttributesAction::Set => write!(f, "set"),
            TerminalAttributesAction::Restore => write!(f, "restore"),
        }
    }
}

impl SelectError {
    /// Returns true if `report` wraps [`SelectError::NoItems`].
    #[must_use]
    pub fn is_no_items(report: &miette::Report) -> bool {
        matches!(report.downcast_ref::<SelectError>(), Some(SelectError::NoItems))
    }
}
