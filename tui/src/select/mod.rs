// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach.
pub mod entry;
pub mod render;
pub mod session;
pub mod state;
pub mod test_fixtures;

// Re-export.
pub use entry::*;
pub use render::*;
pub use session::*;
pub use state::*;
