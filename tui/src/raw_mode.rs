// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words termios tcgetattr tcsetattr ICANON ISIG VMIN VTIME TCSAFLUSH

//! Terminal mode controller.
//!
//! [`RawModeGuard`] captures the terminal's line discipline, then installs a variant
//! with character-at-a-time delivery and no local echo. Dropping the guard (or calling
//! [`TerminalModeGuard::release`]) restores the exact captured configuration, so the
//! user's shell is never left in raw mode, whether the session ends with a quit, a
//! confirm, an error, or a panic unwinding through the scope.
//!
//! Only one guard may be alive per process. Acquiring a second one returns
//! [`SelectError::RawModeAlreadyActive`].
//!
//! Compared to `cfmakeraw()`, this leaves output post-processing alone (so `\n` still
//! moves to column 0) and only turns off `ICANON`, `ECHO`, and `ISIG`. With `ISIG` off,
//! Ctrl+C arrives as the byte `0x03` instead of a `SIGINT` that would kill the process
//! before the guard could run.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::SelectError;

static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Acquires exclusive raw keyboard input for the duration of a session.
pub trait TerminalModeController {
    type Guard: TerminalModeGuard;

    /// # Errors
    ///
    /// Returns an error if the terminal mode can't be queried or changed, or if it is
    /// already acquired.
    fn acquire(&mut self) -> miette::Result<Self::Guard>;
}

/// Restores the captured terminal mode. Implementors must also restore on [`Drop`].
pub trait TerminalModeGuard {
    /// Restore now, and report a failure instead of swallowing it like [`Drop`] does.
    ///
    /// # Errors
    ///
    /// Returns an error if the captured terminal attributes can't be written back.
    fn release(self) -> miette::Result<()>;
}

/// The real terminal, as reached via stdin (or `/dev/tty` when stdin is redirected).
#[derive(Debug, Default, Clone, Copy)]
pub struct RawTerminal;

impl TerminalModeController for RawTerminal {
    type Guard = RawModeGuard;

    fn acquire(&mut self) -> miette::Result<RawModeGuard> { RawModeGuard::new() }
}

/// RAII guard that holds raw mode and restores the captured mode when dropped.
pub struct RawModeGuard {
    saved: platform::SavedMode,
    restored: bool,
}

impl std::fmt::Debug for RawModeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawModeGuard")
            .field("restored", &self.restored)
            .finish_non_exhaustive()
    }
}

impl RawModeGuard {
    /// Capture the current mode and install raw mode.
    ///
    /// # Errors
    ///
    /// - [`SelectError::RawModeAlreadyActive`] if another guard is alive.
    /// - [`SelectError::NoTerminal`] or [`SelectError::TerminalAttributes`] if the
    ///   terminal can't be reached or configured. Nothing is left changed in that case.
    pub fn new() -> miette::Result<Self> {
        if RAW_MODE_ACTIVE.swap(true, Ordering::SeqCst) {
            return Err(SelectError::RawModeAlreadyActive.into());
        }

        match platform::SavedMode::capture_and_install() {
            Ok(saved) => {
                tracing::debug!(message = "raw mode acquired");
                Ok(RawModeGuard {
                    saved,
                    restored: false,
                })
            }
            Err(report) => {
                RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
                Err(report)
            }
        }
    }

    fn restore(&mut self) -> miette::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
        let result = self.saved.restore();
        tracing::debug!(message = "raw mode released", ok = result.is_ok());
        result
    }
}

impl TerminalModeGuard for RawModeGuard {
    fn release(mut self) -> miette::Result<()> { self.restore() }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(report) = self.restore() {
            // % is Display, ? is Debug.
            tracing::error!(message = "failed to restore terminal mode", error = ?report);
        }
    }
}

#[cfg(unix)]
mod platform {
    use std::{fs::File, io};

    use rustix::{fd::{AsFd, BorrowedFd},
                 termios::{self, LocalModes, OptionalActions, SpecialCodeIndex,
                           Termios}};

    use crate::{SelectError, TerminalAttributesAction};

    /// Either stdin (when it is a tty) or `/dev/tty` (when stdin is redirected).
    enum TerminalFd {
        Stdin(io::Stdin),
        DevTty(File),
    }

    impl AsFd for TerminalFd {
        fn as_fd(&self) -> BorrowedFd<'_> {
            match self {
                TerminalFd::Stdin(stdin) => stdin.as_fd(),
                TerminalFd::DevTty(file) => file.as_fd(),
            }
        }
    }

    fn get_terminal_fd() -> io::Result<TerminalFd> {
        let stdin = io::stdin();
        if termios::isatty(&stdin) {
            Ok(TerminalFd::Stdin(stdin))
        } else {
            let file = File::options().read(true).write(true).open("/dev/tty")?;
            Ok(TerminalFd::DevTty(file))
        }
    }

    pub struct SavedMode {
        fd: TerminalFd,
        original: Termios,
    }

    impl SavedMode {
        pub fn capture_and_install() -> miette::Result<Self> {
            let fd = get_terminal_fd().map_err(|source| SelectError::NoTerminal { source })?;

            let original =
                termios::tcgetattr(&fd).map_err(|errno| SelectError::TerminalAttributes {
                    action: TerminalAttributesAction::Retrieve,
                    source: errno.into(),
                })?;

            let mut raw = original.clone();
            raw.local_modes = super::char_at_a_time_local_modes(raw.local_modes);
            raw.special_codes[SpecialCodeIndex::VMIN] = 1;
            raw.special_codes[SpecialCodeIndex::VTIME] = 0;

            termios::tcsetattr(&fd, OptionalActions::Flush, &raw).map_err(|errno| {
                SelectError::TerminalAttributes {
                    action: TerminalAttributesAction::Set,
                    source: errno.into(),
                }
            })?;

            Ok(SavedMode { fd, original })
        }

        pub fn restore(&self) -> miette::Result<()> {
            termios::tcsetattr(&self.fd, OptionalActions::Flush, &self.original).map_err(
                |errno| SelectError::TerminalAttributes {
                    action: TerminalAttributesAction::Restore,
                    source: errno.into(),
                },
            )?;
            Ok(())
        }
    }

    /// Mirrors the bit flags this module clears, so the unit test below can check them
    /// without a tty.
    pub const CLEARED_LOCAL_MODES: LocalModes = LocalModes::ICANON
        .union(LocalModes::ECHO)
        .union(LocalModes::ISIG);
}

#[cfg(not(unix))]
mod platform {
    use miette::IntoDiagnostic as _;

    pub struct SavedMode;

    impl SavedMode {
        pub fn capture_and_install() -> miette::Result<Self> {
            crossterm::terminal::enable_raw_mode().into_diagnostic()?;
            Ok(SavedMode)
        }

        pub fn restore(&self) -> miette::Result<()> {
            crossterm::terminal::disable_raw_mode().into_diagnostic()
        }
    }
}

/// Turn off line buffering, echo, and signal generation. Every other flag is kept.
#[cfg(unix)]
#[must_use]
pub fn char_at_a_time_local_modes(
    modes: rustix::termios::LocalModes,
) -> rustix::termios::LocalModes {
    modes.difference(platform::CLEARED_LOCAL_MODES)
}

#[cfg(all(test, unix))]
mod tests {
    use rustix::termios::LocalModes;

    use super::*;

    #[test]
    fn test_char_at_a_time_clears_only_line_discipline_flags() {
        let cooked = LocalModes::ICANON
            | LocalModes::ECHO
            | LocalModes::ECHOE
            | LocalModes::ISIG
            | LocalModes::IEXTEN;

        let raw = char_at_a_time_local_modes(cooked);

        assert!(!raw.contains(LocalModes::ICANON));
        assert!(!raw.contains(LocalModes::ECHO));
        assert!(!raw.contains(LocalModes::ISIG));
        assert!(raw.contains(LocalModes::ECHOE));
        assert!(raw.contains(LocalModes::IEXTEN));
    }

    #[test]
    fn test_char_at_a_time_is_idempotent() {
        let once = char_at_a_time_local_modes(LocalModes::ICANON | LocalModes::ECHOK);
        let twice = char_at_a_time_local_modes(once);
        assert_eq!(once, twice);
    }
}
