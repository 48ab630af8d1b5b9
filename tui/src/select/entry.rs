// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// One selectable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Passed to [`ItemSource::commit`] when this row is confirmed.
    pub label: String,
    /// The full row text as shown to the user. May be wider than the terminal.
    pub display_line: String,
    /// At most one entry in a list is current.
    pub is_current: bool,
}

impl Entry {
    pub fn new(
        label: impl Into<String>,
        display_line: impl Into<String>,
        is_current: bool,
    ) -> Self {
        Entry {
            label: label.into(),
            display_line: display_line.into(),
            is_current,
        }
    }
}

/// Where the entries come from, and what happens to the one the user picks.
pub trait ItemSource {
    /// Called once, before the terminal is touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries can't be produced.
    fn list_items(&mut self) -> miette::Result<Vec<Entry>>;

    /// Called at most once, after the cursor and terminal mode are restored.
    ///
    /// # Errors
    ///
    /// Returns an error if the action could not be started at all. An action that runs
    /// but fails on its own terms is not an error here.
    fn commit(&mut self, label: &str) -> miette::Result<()>;
}
