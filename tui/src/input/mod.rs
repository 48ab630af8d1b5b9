// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

//! Keyboard input: raw bytes from the terminal are decoded into [`KeyPress`] values by
//! [`StatefulKeyDecoder`], read one at a time through [`KeyPressReader`], and mapped to
//! [`SelectAction`]s.

// Attach.
pub mod decoder;
pub mod key;
pub mod keymap;
pub mod reader;

// Re-export.
pub use decoder::*;
pub use key::*;
pub use keymap::*;
pub use reader::*;
