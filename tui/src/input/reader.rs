// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fs::File,
          io::{self, IsTerminal as _, Read}};

use miette::IntoDiagnostic as _;

use crate::{KeyPress, StatefulKeyDecoder};

/// Size of each read from the terminal. A read that fills it means more bytes are
/// probably waiting.
pub const READ_BUFFER_SIZE: usize = 64;

/// Blocking source of key presses.
pub trait KeyPressReader {
    /// Block until the next key press. `Ok(None)` means the input stream has ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn read_key_press(&mut self) -> miette::Result<Option<KeyPress>>;
}

/// Reads raw bytes from any [`Read`] and decodes them with [`StatefulKeyDecoder`].
#[derive(Debug)]
pub struct DecodingKeyReader<R> {
    source: R,
    decoder: StatefulKeyDecoder,
    buffer: [u8; READ_BUFFER_SIZE],
}

impl<R: Read> DecodingKeyReader<R> {
    pub fn new(source: R) -> Self {
        DecodingKeyReader {
            source,
            decoder: StatefulKeyDecoder::default(),
            buffer: [0; READ_BUFFER_SIZE],
        }
    }
}

impl DecodingKeyReader<Box<dyn Read>> {
    /// Read from stdin, or from `/dev/tty` when stdin is not a terminal. If `/dev/tty`
    /// can't be opened either, stdin is used anyway and the failure is left for the
    /// raw mode guard to report.
    #[must_use]
    pub fn from_terminal() -> Self {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            return DecodingKeyReader::new(Box::new(stdin));
        }
        match File::open("/dev/tty") {
            Ok(tty) => DecodingKeyReader::new(Box::new(tty)),
            Err(error) => {
                // % is Display, ? is Debug.
                tracing::warn!(
                    message = "stdin is not a terminal and /dev/tty is unavailable",
                    error = %error
                );
                DecodingKeyReader::new(Box::new(stdin))
            }
        }
    }
}

impl<R: Read> KeyPressReader for DecodingKeyReader<R> {
    fn read_key_press(&mut self) -> miette::Result<Option<KeyPress>> {
        loop {
            if let Some(key_press) = self.decoder.next() {
                return Ok(Some(key_press));
            }

            let read_count = match self.source.read(&mut self.buffer) {
                Ok(count) => count,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error).into_diagnostic(),
            };

            if read_count == 0 {
                // End of stream. Resolve whatever is still pending, e.g. a lone ESC.
                self.decoder.advance(&[], false);
                return Ok(self.decoder.next());
            }

            let more = read_count == self.buffer.len();
            self.decoder.advance(&self.buffer[..read_count], more);
        }
    }
}

impl<T: KeyPressReader + ?Sized> KeyPressReader for &mut T {
    fn read_key_press(&mut self) -> miette::Result<Option<KeyPress>> {
        (**self).read_key_press()
    }
}
