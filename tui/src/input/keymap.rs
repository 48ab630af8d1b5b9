// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::KeyPress;

/// What a key press means to the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAction {
    MoveUp,
    MoveDown,
    Confirm,
    Quit,
    /// No state change, but the list is still redrawn.
    Ignore,
}

impl From<KeyPress> for SelectAction {
    fn from(key_press: KeyPress) -> Self {
        match key_press {
            KeyPress::Up | KeyPress::Char('k') => SelectAction::MoveUp,
            KeyPress::Down | KeyPress::Char('j') => SelectAction::MoveDown,
            KeyPress::Enter => SelectAction::Confirm,
            KeyPress::Char('q') | KeyPress::Interrupt => SelectAction::Quit,
            KeyPress::Escape | KeyPress::Char(_) | KeyPress::Unrecognized => {
                SelectAction::Ignore
            }
        }
    }
}
