// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{ffi::OsString,
          process::{Command, Stdio}};

use git_select_tui::{Entry, ItemSource};
use miette::{IntoDiagnostic as _, WrapErr as _};

/// Marks the checked out branch in `git branch` output.
pub const CURRENT_PREFIX: char = '*';

/// Marks a branch that is checked out in another worktree.
pub const WORKTREE_PREFIX: char = '+';

/// Local branches of the repository in the current directory, checked out with
/// `git checkout`.
#[derive(Debug, Clone)]
pub struct GitBranchSource {
    program: OsString,
}

impl Default for GitBranchSource {
    fn default() -> Self { GitBranchSource::with_program("git") }
}

impl GitBranchSource {
    /// Use a `git` binary other than the one on `PATH`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        GitBranchSource {
            program: program.into(),
        }
    }

    fn command(&self) -> Command { Command::new(&self.program) }
}

impl ItemSource for GitBranchSource {
    fn list_items(&mut self) -> miette::Result<Vec<Entry>> {
        let output = self
            .command()
            .args(["branch", "-v", "--no-color"])
            .stdin(Stdio::null())
            .output()
            .into_diagnostic()
            .wrap_err("failed to run `git branch`, is git installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            miette::bail!("`git branch` failed with {}: {}", output.status, stderr.trim());
        }

        let entries = parse_branch_verbose_output(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(message = "git branches listed", count = entries.len());
        Ok(entries)
    }

    /// Git writes its own success or error message to the inherited stdout and stderr.
    /// A non zero exit is only logged.
    fn commit(&mut self, label: &str) -> miette::Result<()> {
        let status = self
            .command()
            .args(["checkout", label])
            .status()
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to run `git checkout {label}`"))?;

        if status.success() {
            tracing::debug!(message = "checked out branch", branch = %label);
        } else {
            // % is Display, ? is Debug.
            tracing::warn!(
                message = "git checkout failed",
                branch = %label,
                status = %status
            );
        }

        Ok(())
    }
}

/// Parses the `stdout` of `git branch -v --no-color` into entries. Each row keeps its
/// original text as the display line.
///
/// Here's output from this command:
/// ```text
/// * main                  1b2c3d4 Initial commit
///   feature/long-name     5e6f7a8 Work in progress
/// + other-worktree        9b0c1d2 [ahead 1] Checked out elsewhere
/// ```
///
/// A detached `HEAD` shows up as `* (HEAD detached at 1b2c3d4) ...`. That row can't be
/// checked out by name, so it is skipped.
#[must_use]
pub fn parse_branch_verbose_output(output: &str) -> Vec<Entry> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim_end();
            let mut chars = line.chars();
            let marker = chars.next()?;
            let rest = chars.as_str().trim_start();

            if rest.starts_with('(') {
                return None;
            }
            let label = rest.split_whitespace().next()?;

            let is_current = marker == CURRENT_PREFIX;
            Some(Entry::new(label, line, is_current))
        })
        .collect()
}
