// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use strum_macros::Display;

#[derive(Display)]
pub enum UIStrings {
    #[strum(serialize = "Select git branch (↑/↓ j/k, Enter to checkout, q to quit)")]
    SelectBranchHeader,

    #[strum(serialize = "No branches found.")]
    NoBranchesFound,

    #[strum(serialize = "{name} v{version}")]
    NameAndVersion { name: String, version: String },

    #[strum(serialize = "An interactive git branch selector.")]
    Description,

    #[strum(serialize = "https://github.com/da0x/git-select")]
    Homepage,

    #[strum(serialize = "Could not run git-select due to the following problem.\n{error}")]
    CouldNotRun { error: String },
}
