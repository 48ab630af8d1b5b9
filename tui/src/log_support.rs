// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Opt-in file logging. Nothing is ever logged to the terminal: stdout carries the
//! interactive list, so log output there would corrupt the display.

use std::path::{Path, PathBuf};

use miette::IntoDiagnostic as _;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer as _, layer::SubscriberExt as _,
                         util::SubscriberInitExt as _};

/// Default log file, created in the current working directory.
pub const LOG_FILE_NAME: &str = "log.txt";

/// Create an appender that writes to `path`, which is never rotated.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no parent directory
/// - The path has no file name
/// - The file can't be created, e.g. because its folder is not a directory
pub fn try_create_file_appender(
    path: impl AsRef<Path>,
) -> miette::Result<RollingFileAppender> {
    let path = path.as_ref();

    let parent = path.parent().ok_or_else(|| {
        miette::miette!(
            "Can't access folder of {}. It might not exist, or don't have required permissions.",
            path.display()
        )
    })?;

    // A bare file name has an empty parent.
    let parent = if parent.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        parent.to_path_buf()
    };

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!(
            "Can't access file name {}. It might not exist, or don't have required permissions.",
            path.display()
        )
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(parent)
        .into_diagnostic()
}

/// Install a global subscriber that writes plain text (no ANSI colors) to `path` at
/// `level_filter` and above. [`LevelFilter::OFF`] installs nothing.
///
/// # Errors
///
/// Returns an error if the appender can't be created, or if a global subscriber is
/// already installed.
pub fn try_initialize_logging_global(
    level_filter: LevelFilter,
    path: impl AsRef<Path>,
) -> miette::Result<()> {
    if level_filter == LevelFilter::OFF {
        return Ok(());
    }

    let file_appender = try_create_file_appender(path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(file_appender)
        .with_filter(level_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .into_diagnostic()?;

    tracing::debug!(message = "logging initialized", level = %level_filter);

    Ok(())
}
