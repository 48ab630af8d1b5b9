// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// A single decoded key press. Only the keys the selector reacts to get their own
/// variant; everything else is [`KeyPress::Unrecognized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Up,
    Down,
    /// `CR` or `LF`.
    Enter,
    /// A lone `ESC` that was not the start of a sequence.
    Escape,
    /// `Ctrl+C` (`0x03`), delivered as a byte because signal generation is off in raw
    /// mode.
    Interrupt,
    Char(char),
    /// Unknown escape sequences, invalid UTF-8, stray control bytes.
    Unrecognized,
}
