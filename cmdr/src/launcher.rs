// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{self, Write},
          process::ExitCode};

use git_select_tui::{DecodingKeyReader, ItemSource, KeyPressReader, RawTerminal,
                     SelectError, SessionOutcome, TerminalModeController,
                     TerminalViewport, ViewportInspector, select_and_commit};
use miette::IntoDiagnostic as _;

use crate::{CLIArg, GitBranchSource, UIStrings};

/// How the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppExit {
    /// Quit, commit (whether or not git was happy with it), or `--version`.
    Success,
    /// No branches, or the environment got in the way.
    Failure,
}

impl AppExit {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            AppExit::Success => 0,
            AppExit::Failure => 1,
        }
    }
}

impl From<AppExit> for ExitCode {
    fn from(app_exit: AppExit) -> Self { ExitCode::from(app_exit.code()) }
}

/// Run the program against the real terminal and git.
pub fn launch(cli_arg: &CLIArg) -> AppExit {
    if cli_arg.version {
        return match print_version(&mut io::stdout()) {
            Ok(()) => AppExit::Success,
            Err(error) => report_result(Err(error), &mut io::stderr()),
        };
    }

    let result = try_run_selector(
        &mut GitBranchSource::default(),
        &mut RawTerminal,
        &mut io::stdout(),
        &mut DecodingKeyReader::from_terminal(),
        &TerminalViewport,
    );

    report_result(result, &mut io::stderr())
}

/// # Errors
///
/// Returns an error if writing to `output` fails.
pub fn print_version(output: &mut impl Write) -> miette::Result<()> {
    let name_and_version = UIStrings::NameAndVersion {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    writeln!(output, "{name_and_version}").into_diagnostic()?;
    writeln!(output, "{}", UIStrings::Description).into_diagnostic()?;
    writeln!(output, "{}", UIStrings::Homepage).into_diagnostic()?;
    Ok(())
}

/// Let the user pick a branch and check it out.
///
/// # Errors
///
/// See [`select_and_commit`].
pub fn try_run_selector<S, T, W, K, V>(
    source: &mut S,
    terminal: &mut T,
    output: &mut W,
    reader: &mut K,
    viewport: &V,
) -> miette::Result<SessionOutcome>
where
    S: ItemSource + ?Sized,
    T: TerminalModeController + ?Sized,
    W: Write,
    K: KeyPressReader + ?Sized,
    V: ViewportInspector + ?Sized,
{
    let header = UIStrings::SelectBranchHeader.to_string();
    select_and_commit(source, terminal, output, reader, viewport, &header)
}

/// Report the result to the user on `stderr`, and pick the exit status.
pub fn report_result(
    result: miette::Result<SessionOutcome>,
    stderr: &mut impl Write,
) -> AppExit {
    match result {
        Ok(outcome) => {
            // % is Display, ? is Debug.
            tracing::debug!(message = "git-select finished", outcome = ?outcome);
            AppExit::Success
        }
        Err(report) if SelectError::is_no_items(&report) => {
            writeln!(stderr, "{}", UIStrings::NoBranchesFound).ok();
            AppExit::Failure
        }
        Err(report) => {
            tracing::error!(
                message = "Could not run git-select due to the following problem",
                error = ?report
            );
            let message = UIStrings::CouldNotRun {
                error: format!("{report:?}"),
            };
            writeln!(stderr, "{message}").ok();
            AppExit::Failure
        }
    }
}
