// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Stand-ins for the terminal and the item source, so a whole session can run in a test
//! without a tty or a git repository.

use std::{cell::Cell, rc::Rc};

use crate::{Entry, ItemSource, TerminalModeController, TerminalModeGuard};

/// Serves a fixed list and records every commit.
#[derive(Debug, Default)]
pub struct MockItemSource {
    pub entries: Vec<Entry>,
    pub list_calls: usize,
    pub committed_labels: Vec<String>,
    pub fail_on_commit: bool,
}

impl MockItemSource {
    #[must_use]
    pub fn new(entries: Vec<Entry>) -> Self {
        MockItemSource {
            entries,
            ..Default::default()
        }
    }
}

impl ItemSource for MockItemSource {
    fn list_items(&mut self) -> miette::Result<Vec<Entry>> {
        self.list_calls += 1;
        Ok(self.entries.clone())
    }

    fn commit(&mut self, label: &str) -> miette::Result<()> {
        if self.fail_on_commit {
            miette::bail!("could not commit {label}");
        }
        self.committed_labels.push(label.to_string());
        Ok(())
    }
}

/// Counts acquisitions and releases instead of touching the terminal.
#[derive(Debug, Default, Clone)]
pub struct MockTerminal {
    pub acquire_count: Rc<Cell<usize>>,
    pub release_count: Rc<Cell<usize>>,
    pub fail_on_acquire: bool,
}

#[derive(Debug)]
pub struct MockTerminalGuard {
    release_count: Rc<Cell<usize>>,
    released: bool,
}

impl TerminalModeController for MockTerminal {
    type Guard = MockTerminalGuard;

    fn acquire(&mut self) -> miette::Result<MockTerminalGuard> {
        if self.fail_on_acquire {
            miette::bail!("no terminal");
        }
        self.acquire_count.set(self.acquire_count.get() + 1);
        Ok(MockTerminalGuard {
            release_count: Rc::clone(&self.release_count),
            released: false,
        })
    }
}

impl MockTerminalGuard {
    fn mark_released(&mut self) {
        if !self.released {
            self.released = true;
            self.release_count.set(self.release_count.get() + 1);
        }
    }
}

impl TerminalModeGuard for MockTerminalGuard {
    fn release(mut self) -> miette::Result<()> {
        self.mark_released();
        Ok(())
    }
}

impl Drop for MockTerminalGuard {
    fn drop(&mut self) { self.mark_released(); }
}
