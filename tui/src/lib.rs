// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words termios tcgetattr tcsetattr ICANON

//! # git_select_tui
//!
//! An inline, single-select list for the terminal. It is not a full TUI and it never
//! switches to the alternate screen. It draws a one line instruction header followed by
//! as many rows as fit in the viewport, right where the cursor is, and redraws that
//! region in place on every key press by moving the cursor back up over what it drew
//! last time.
//!
//! # How the pieces fit together
//!
//! ```text
//!  ItemSource::list_items()          (once, before any terminal change)
//!            │
//!            ▼
//!  TerminalModeController::acquire() (raw mode scope guard)
//!            │
//!            ▼
//!  ┌──────── run_session() ────────────────────────────────┐
//!  │ hide cursor                                           │
//!  │ loop {                                                │
//!  │   KeyPressReader::read_key_press()  (blocking)        │
//!  │   SelectAction::from(key)                             │
//!  │   SelectionState::move_by(..)  (viewport re-queried)  │
//!  │   Renderer::draw(..)                                  │
//!  │ }                                                     │
//!  │ show cursor (exactly once, on every exit path)        │
//!  └───────────────────────────────────────────────────────┘
//!            │
//!            ▼
//!  guard released, then ItemSource::commit(label)
//! ```
//!
//! The whole thing is single threaded and synchronous. The only blocking call is the
//! read of the next chunk of bytes from the terminal.
//!
//! # Wire contract with the display
//!
//! | Sequence     | Meaning                        |
//! | ------------ | ------------------------------ |
//! | `ESC[nF`     | move cursor up `n` lines       |
//! | `ESC[?25l`   | hide cursor                    |
//! | `ESC[?25h`   | show cursor                    |
//! | `ESC[K`      | erase to end of line           |
//! | `ESC[7m`     | inverse video                  |
//! | `ESC[32m`    | accent (green) foreground      |
//! | `ESC[0m`     | reset attributes               |
//!
//! # References
//!
//! ANSI escape codes:
//!
//! - <https://notes.burke.libbey.me/ansi-escape-codes/>
//! - <https://en.wikipedia.org/wiki/ANSI_escape_code>
//! - <https://man7.org/linux/man-pages/man3/termios.3.html>

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide clean public API).
pub mod ansi;
pub mod error;
pub mod input;
pub mod log_support;
pub mod raw_mode;
pub mod select;
pub mod viewport;

// Re-export stable public API using glob imports for ergonomic, flat API surface.
pub use ansi::*;
pub use error::*;
pub use input::*;
pub use log_support::*;
pub use raw_mode::*;
pub use select::*;
pub use viewport::*;
