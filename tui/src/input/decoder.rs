// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Byte-at-a-time decoder for terminal input. See [`StatefulKeyDecoder`] docs.

use std::collections::VecDeque;

use crate::KeyPress;

/// Escape byte.
pub const ANSI_ESC: u8 = 0x1B;

/// Control Sequence Introducer, second byte: `ESC [`.
pub const ANSI_CSI_BRACKET: u8 = b'[';

/// Single Shift 3, second byte: `ESC O`. Sent for arrows in application cursor mode.
pub const ANSI_SS3_O: u8 = b'O';

/// Final byte of the up arrow sequence.
pub const ARROW_UP_FINAL: u8 = b'A';

/// Final byte of the down arrow sequence.
pub const ARROW_DOWN_FINAL: u8 = b'B';

/// `Ctrl+C`.
pub const ASCII_ETX: u8 = 0x03;

/// CSI sequences longer than this are dropped as unrecognized.
const MAX_CSI_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DecoderState {
    #[default]
    Ground,
    /// Saw `ESC`, waiting for the next byte to decide.
    Escape,
    /// Inside `ESC [`, counting parameter and intermediate bytes.
    Csi { len: usize },
    /// Saw `ESC O`.
    Ss3,
    /// Collecting a multi-byte UTF-8 character.
    Utf8 {
        bytes: [u8; 4],
        len: usize,
        expected: usize,
    },
}

/// Decodes raw terminal bytes into [`KeyPress`] values.
///
/// Bytes are fed in chunks via [`StatefulKeyDecoder::advance`], and decoded key presses
/// are drained through [`Iterator`]. A sequence may be split across chunks. The `more`
/// flag tells the decoder what to do with a sequence that is still incomplete at the
/// end of a chunk:
///
/// - `more = true`: more bytes are likely waiting, keep the pending state.
/// - `more = false`: input is drained. A pending lone `ESC` is the `ESC` key, and any
///   other partial sequence is [`KeyPress::Unrecognized`].
///
/// The caller sets `more` when [`read()`] filled its entire buffer.
///
/// [`read()`]: std::io::Read::read
#[derive(Debug, Default)]
pub struct StatefulKeyDecoder {
    state: DecoderState,
    decoded: VecDeque<KeyPress>,
}

impl StatefulKeyDecoder {
    /// Process incoming bytes.
    /// - `buffer`: raw bytes read from the terminal.
    /// - `more`: whether more data is likely available.
    pub fn advance(&mut self, buffer: &[u8], more: bool) {
        for &byte in buffer {
            self.advance_byte(byte);
        }
        if !more {
            self.flush_pending();
        }
    }

    /// True if a partial sequence is waiting for more bytes.
    #[must_use]
    pub fn has_pending(&self) -> bool { self.state != DecoderState::Ground }

    fn emit(&mut self, key_press: KeyPress) { self.decoded.push_back(key_press); }

    fn advance_byte(&mut self, byte: u8) {
        match self.state {
            DecoderState::Ground => self.advance_ground(byte),

            DecoderState::Escape => match byte {
                ANSI_CSI_BRACKET => self.state = DecoderState::Csi { len: 0 },
                ANSI_SS3_O => self.state = DecoderState::Ss3,
                // Double escape: the first one is dropped, the second starts over.
                ANSI_ESC => self.emit(KeyPress::Unrecognized),
                // Alt+key and friends.
                _ => {
                    self.state = DecoderState::Ground;
                    self.emit(KeyPress::Unrecognized);
                }
            },

            DecoderState::Csi { len } => match byte {
                // Final byte. Modifier parameters such as `1;2` are ignored.
                0x40..=0x7E => {
                    self.state = DecoderState::Ground;
                    self.emit(match byte {
                        ARROW_UP_FINAL => KeyPress::Up,
                        ARROW_DOWN_FINAL => KeyPress::Down,
                        _ => KeyPress::Unrecognized,
                    });
                }
                // Parameter and intermediate bytes.
                0x20..=0x3F if len < MAX_CSI_LEN => {
                    self.state = DecoderState::Csi { len: len + 1 };
                }
                _ => {
                    self.state = DecoderState::Ground;
                    self.emit(KeyPress::Unrecognized);
                }
            },

            DecoderState::Ss3 => {
                self.state = DecoderState::Ground;
                self.emit(match byte {
                    ARROW_UP_FINAL => KeyPress::Up,
                    ARROW_DOWN_FINAL => KeyPress::Down,
                    _ => KeyPress::Unrecognized,
                });
            }

            DecoderState::Utf8 {
                mut bytes,
                len,
                expected,
            } => {
                if byte & 0b1100_0000 != 0b1000_0000 {
                    // Not a continuation byte. Drop the partial character and decode
                    // this byte from scratch.
                    self.state = DecoderState::Ground;
                    self.emit(KeyPress::Unrecognized);
                    self.advance_ground(byte);
                    return;
                }
                bytes[len] = byte;
                let len = len + 1;
                if len < expected {
                    self.state = DecoderState::Utf8 {
                        bytes,
                        len,
                        expected,
                    };
                    return;
                }
                self.state = DecoderState::Ground;
                let key_press = std::str::from_utf8(&bytes[..len])
                    .ok()
                    .and_then(|it| it.chars().next())
                    .map_or(KeyPress::Unrecognized, KeyPress::Char);
                self.emit(key_press);
            }
        }
    }

    fn advance_ground(&mut self, byte: u8) {
        match byte {
            ANSI_ESC => self.state = DecoderState::Escape,
            b'\r' | b'\n' => self.emit(KeyPress::Enter),
            ASCII_ETX => self.emit(KeyPress::Interrupt),
            0x20..=0x7E => self.emit(KeyPress::Char(char::from(byte))),
            0xC2..=0xF4 => {
                let expected = match byte {
                    0xC2..=0xDF => 2,
                    0xE0..=0xEF => 3,
                    _ => 4,
                };
                let mut bytes = [0; 4];
                bytes[0] = byte;
                self.state = DecoderState::Utf8 {
                    bytes,
                    len: 1,
                    expected,
                };
            }
            _ => self.emit(KeyPress::Unrecognized),
        }
    }

    fn flush_pending(&mut self) {
        match std::mem::take(&mut self.state) {
            DecoderState::Ground => {}
            DecoderState::Escape => self.emit(KeyPress::Escape),
            DecoderState::Csi { .. } | DecoderState::Ss3 | DecoderState::Utf8 { .. } => {
                self.emit(KeyPress::Unrecognized);
            }
        }
    }
}

impl Iterator for StatefulKeyDecoder {
    type Item = KeyPress;

    fn next(&mut self) -> Option<Self::Item> { self.decoded.pop_front() }
}
