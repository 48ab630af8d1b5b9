// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clap::{Args, Parser};

#[derive(Debug, Parser)]
#[command(bin_name = "git-select")]
#[command(about = "An interactive git branch selector")]
#[command(disable_version_flag = true)]
#[command(next_line_help = true)]
/// More info: <https://docs.rs/clap/latest/clap/struct.Command.html#method.help_template>
#[command(
    help_template = "{about}\n\nUSAGE:\n  git-select [\x1b[34mOptions\x1b[0m]\n\n  Run inside a git repository. Use ↑/↓ or j/k to move, Enter to check out the\n  highlighted branch, q to quit.\n\n{all-args}\n"
)]
/// More info:
/// - <https://docs.rs/clap/latest/clap/_derive/#overview>
pub struct CLIArg {
    #[arg(long, help = "Print the name, version, and homepage, then exit")]
    pub version: bool,

    #[command(flatten)]
    pub global_options: GlobalOption,
}

#[derive(Debug, Args)]
pub struct GlobalOption {
    #[arg(
        global = true,
        long,
        short = 'l',
        help = "Log app output to a file named `log.txt` for debugging"
    )]
    pub enable_logging: bool,
}
