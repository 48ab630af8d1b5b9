// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # git-select
//!
//! An interactive git branch selector. Run it inside a repository to get a list of
//! local branches (the output of `git branch -v`) right below your prompt. Move with
//! `↑`/`↓` or `j`/`k`, press `Enter` to check out the highlighted branch, or `q` to
//! leave without doing anything.
//!
//! The current branch is shown in green, the highlighted one in inverse video. Rows are
//! clipped to the terminal width, and long lists scroll to fit its height.
//!
//! ```text
//! $ git-select
//! Select git branch (↑/↓ j/k, Enter to checkout, q to quit)
//! * main        1b2c3d4 Initial commit
//!   feature/foo 5e6f7a8 Work in progress
//! ```
//!
//! | Exit code | When                                                 |
//! | --------- | ---------------------------------------------------- |
//! | `0`       | quit, checkout (even if git rejects it), `--version` |
//! | `1`       | no branches, not a repository, no terminal           |
//! | `2`       | bad command line arguments                           |
//!
//! Pass `--enable-logging` (`-l`) to write a debug log to `log.txt` in the current
//! directory.

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach.
pub mod clap_config;
pub mod git;
pub mod launcher;
pub mod ui_strings;

// Re-export.
pub use clap_config::*;
pub use git::*;
pub use launcher::*;
pub use ui_strings::*;
