// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::ops::Range;

use crate::Entry;

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The user confirmed this label.
    Committed { label: String },
    /// The user left without choosing.
    Quit,
}

/// Which entry is highlighted, and which slice of the list is on screen.
///
/// After every update `selected_index` is in `[0, entry_count)` and in
/// `[scroll_offset, scroll_offset + visible_rows)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub entry_count: usize,
}

impl SelectionState {
    /// Start on the current entry (or the first one), scrolled into view.
    #[must_use]
    pub fn from_entries(entries: &[Entry], visible_rows: usize) -> Self {
        let mut state = SelectionState {
            selected_index: entries.iter().position(|it| it.is_current).unwrap_or(0),
            scroll_offset: 0,
            entry_count: entries.len(),
        };
        state.fit_to_viewport(visible_rows);
        state
    }

    /// Move the selection by `delta` rows, clamped to the list (no wraparound), then
    /// scroll just enough to keep it visible.
    pub fn move_by(&mut self, delta: isize, visible_rows: usize) {
        if self.entry_count == 0 {
            return;
        }
        let last_index = self.entry_count - 1;
        self.selected_index = self
            .selected_index
            .saturating_add_signed(delta)
            .min(last_index);
        self.scroll_to_selection(visible_rows.max(1));
    }

    /// Keep the selection where it is and adjust the scroll offset for a viewport that
    /// may have changed size. When the window grows, the offset is pulled back so that
    /// the bottom of the window isn't left empty.
    pub fn fit_to_viewport(&mut self, visible_rows: usize) {
        if self.entry_count == 0 {
            *self = SelectionState::default();
            return;
        }
        let visible_rows = visible_rows.max(1);
        self.selected_index = self.selected_index.min(self.entry_count - 1);
        self.scroll_to_selection(visible_rows);
        self.scroll_offset = self
            .scroll_offset
            .min(self.entry_count.saturating_sub(visible_rows));
    }

    fn scroll_to_selection(&mut self, visible_rows: usize) {
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        }
        if self.selected_index >= self.scroll_offset + visible_rows {
            self.scroll_offset = self.selected_index + 1 - visible_rows;
        }
    }

    /// Indices of the entries that are on screen.
    #[must_use]
    pub fn visible_range(&self, visible_rows: usize) -> Range<usize> {
        let start = self.scroll_offset.min(self.entry_count);
        let len = visible_rows.min(self.entry_count - start);
        start..start + len
    }

    #[must_use]
    pub fn confirm(&self, entries: &[Entry]) -> SessionOutcome {
        match entries.get(self.selected_index) {
            Some(entry) => SessionOutcome::Committed {
                label: entry.label.clone(),
            },
            None => SessionOutcome::Quit,
        }
    }

    #[must_use]
    pub fn quit(&self) -> SessionOutcome { SessionOutcome::Quit }
}
