//! KISS transport framing
//!
//! KISS wraps each AX.25 frame between a TNC and its host in `FEND` bytes,
//! with a command byte in front of the payload.
//!
//! # Frame Format
//! ```text
//! C0 [port << 4 | command] [escaped payload...] C0
//! ```
//!
//! Inside the payload, `C0` is sent as `DB DC` and `DB` as `DB DD`.

use tracing::warn;

use crate::error::CodecError;

/// Frame end delimiter
pub const FEND: u8 = 0xC0;
/// Frame escape
pub const FESC: u8 = 0xDB;
/// Transposed frame end (follows `FESC`)
pub const TFEND: u8 = 0xDC;
/// Transposed frame escape (follows `FESC`)
pub const TFESC: u8 = 0xDD;

/// Command nibble for a data frame
pub const CMD_DATA: u8 = 0x00;

/// Largest escaped frame we expect to see (every AX.25 byte escaped)
const MAX_FRAME_LEN: usize = 2 * crate::frame::MAX_FRAME_LEN + 2;

/// Strip the KISS wrapper from a single, already delimited buffer.
///
/// Removes the leading `FEND` and command byte and the trailing `FEND`.
/// No unescaping is done; use [`KissCodec`] for raw stream data.
pub fn unwrap(data: &[u8]) -> Result<&[u8], CodecError> {
    if data.len() < 4 {
        return Err(CodecError::format(format!(
            "KISS frame needs at least 4 bytes, got {}",
            data.len()
        )));
    }
    let last = data[data.len() - 1];
    if data[0] != FEND || last != FEND {
        return Err(CodecError::format(format!(
            "KISS frame must start and end with 0x{:02X}, got 0x{:02X} and 0x{:02X}",
            FEND, data[0], last
        )));
    }
    Ok(&data[2..data.len() - 1])
}

/// Wrap an AX.25 frame as a KISS data frame on port 0
pub fn wrap(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 4);
    out.push(FEND);
    out.push(CMD_DATA);
    for &b in payload {
        match b {
            FEND => out.extend_from_slice(&[FESC, TFEND]),
            FESC => out.extend_from_slice(&[FESC, TFESC]),
            _ => out.push(b),
        }
    }
    out.push(FEND);
    out
}

/// One frame pulled out of a KISS stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KissFrame {
    /// TNC port (high nibble of the command byte)
    pub port: u8,
    /// KISS command (low nibble of the command byte)
    pub command: u8,
    /// Unescaped payload
    pub data: Vec<u8>,
}

impl KissFrame {
    /// Whether this frame carries AX.25 data rather than a TNC parameter
    pub fn is_data(&self) -> bool {
        self.command == CMD_DATA
    }
}

/// Streaming KISS decoder
///
/// Bytes may arrive in arbitrary chunks; complete frames are returned in order.
pub struct KissCodec {
    buffer: Vec<u8>,
}

impl KissCodec {
    /// Create a new KISS decoder
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(MAX_FRAME_LEN),
        }
    }

    /// Push raw bytes into the decoder's buffer
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);

        if self.buffer.len() > MAX_FRAME_LEN * 4 {
            let start = self.buffer.len() - MAX_FRAME_LEN;
            self.buffer.drain(..start);
        }
    }

    /// Try to extract the next complete frame from the buffer
    pub fn next_frame(&mut self) -> Option<KissFrame> {
        loop {
            let start = self.buffer.iter().position(|&b| b == FEND)?;
            if start > 0 {
                self.buffer.drain(..start);
            }

            let end = self.buffer[1..].iter().position(|&b| b == FEND)? + 1;

            // Leave the closing FEND in place; it may open the next frame.
            let raw: Vec<u8> = self.buffer.drain(..end).skip(1).collect();
            if raw.is_empty() {
                continue;
            }

            match unescape(&raw) {
                Ok(bytes) => {
                    let Some((&cmd, data)) = bytes.split_first() else {
                        continue;
                    };
                    return Some(KissFrame {
                        port: cmd >> 4,
                        command: cmd & 0x0F,
                        data: data.to_vec(),
                    });
                }
                Err(e) => {
                    warn!("Failed to parse KISS frame: {}", e);
                }
            }
        }
    }
}

impl Default for KissCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn unescape(raw: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter();
    while let Some(&b) = bytes.next() {
        if b != FESC {
            out.push(b);
            continue;
        }
        match bytes.next() {
            Some(&TFEND) => out.push(FEND),
            Some(&TFESC) => out.push(FESC),
            Some(&other) => {
                return Err(CodecError::format(format!(
                    "invalid KISS escape 0x{:02X}",
                    other
                )))
            }
            None => return Err(CodecError::format("KISS frame ends inside escape")),
        }
    }
    Ok(out)
}
