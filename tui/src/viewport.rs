// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::cell::Cell;

/// Lines in each frame that are not list rows: the instruction header, and the line the
/// cursor is left on after the last row.
pub const RESERVED_ROWS: u16 = 2;

/// Terminal dimensions, in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub rows: u16,
    pub cols: u16,
}

impl Size {
    /// Used when the terminal can't be queried. Large enough that nothing gets clipped
    /// and the whole list is shown.
    pub const UNBOUNDED: Size = Size {
        rows: u16::MAX,
        cols: u16::MAX,
    };

    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Self { Size { rows, cols } }

    /// How many list rows fit under the header. Never less than 1.
    #[must_use]
    pub fn visible_rows(&self) -> usize {
        usize::from(self.rows.saturating_sub(RESERVED_ROWS)).max(1)
    }

    /// The widest a row may be, in display columns. One column is left free so that
    /// writing the last cell never triggers an auto-wrap.
    #[must_use]
    pub fn max_text_width(&self) -> usize { usize::from(self.cols.saturating_sub(1)) }
}

/// Queries the current viewport. Implementations must not cache: the terminal can be
/// resized between any two calls.
pub trait ViewportInspector {
    fn dimensions(&self) -> Size;
}

/// The controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalViewport;

impl ViewportInspector for TerminalViewport {
    fn dimensions(&self) -> Size {
        match crossterm::terminal::size() {
            Ok((cols, rows)) if cols > 0 && rows > 0 => Size { rows, cols },
            Ok((cols, rows)) => {
                tracing::warn!(
                    message = "terminal reported an empty size, not clipping",
                    rows,
                    cols
                );
                Size::UNBOUNDED
            }
            Err(error) => {
                // % is Display, ? is Debug.
                tracing::warn!(
                    message = "could not query terminal size, not clipping",
                    error = %error
                );
                Size::UNBOUNDED
            }
        }
    }
}

/// A viewport with a size that only changes when [`FixedViewport::resize`] is called.
/// Useful to drive a session without a real terminal.
#[derive(Debug, Clone)]
pub struct FixedViewport {
    size: Cell<Size>,
}

impl FixedViewport {
    #[must_use]
    pub fn new(size: Size) -> Self {
        FixedViewport {
            size: Cell::new(size),
        }
    }

    pub fn resize(&self, size: Size) { self.size.set(size); }
}

impl ViewportInspector for FixedViewport {
    fn dimensions(&self) -> Size { self.size.get() }
}

impl<T: ViewportInspector + ?Sized> ViewportInspector for &T {
    fn dimensions(&self) -> Size { (**self).dimensions() }
}
