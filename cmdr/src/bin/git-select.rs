// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::process::ExitCode;

use clap::Parser;
use git_select::{CLIArg, launch};
use git_select_tui::{LOG_FILE_NAME, try_initialize_logging_global};

fn main() -> ExitCode {
    // Argument errors print usage and exit with status 2.
    let cli_arg = CLIArg::parse();

    let enable_logging = cli_arg.global_options.enable_logging;
    enable_logging.then(|| {
        try_initialize_logging_global(tracing_core::LevelFilter::DEBUG, LOG_FILE_NAME).ok();
        // % is Display, ? is Debug.
        tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);
    });

    let app_exit = launch(&cli_arg);

    enable_logging.then(|| {
        tracing::debug!(message = "Stop logging...", app_exit = ?app_exit);
    });

    app_exit.into()
}
