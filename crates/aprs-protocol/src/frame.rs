//! AX.25 UI frame encoding and decoding
//!
//! # Frame Format
//! ```text
//! [dest (7)] [source (7)] [digipeater (7)]*0..8 [control 03] [pid F0] [info...]
//! ```
//!
//! The address extension bit is set on the last address of the header. No
//! FCS is carried; the TNC has already checked it.

use std::fmt;

use crate::address::{Callsign, ADDRESS_LEN};
use crate::error::CodecError;

/// Control field of a UI frame
pub const CONTROL_FIELD: u8 = 0x03;
/// Protocol id: no layer 3
pub const PROTOCOL_ID: u8 = 0xF0;

/// Shortest frame accepted by the decoder
pub const MIN_FRAME_LEN: usize = 19;
/// Longest frame accepted by the decoder
pub const MAX_FRAME_LEN: usize = 330;
/// Most digipeaters a header can carry
pub const MAX_DIGIPEATERS: usize = 8;

/// A decoded AX.25 UI frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ax25Frame {
    /// Destination address
    pub destination: Callsign,
    /// Source address
    pub source: Callsign,
    /// Digipeater path in transmission order
    pub digipeaters: Vec<Callsign>,
    /// Information field
    pub info: Vec<u8>,
}

impl Ax25Frame {
    /// Decode a frame with the KISS wrapper already removed
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() < MIN_FRAME_LEN || data.len() > MAX_FRAME_LEN {
            return Err(CodecError::format(format!(
                "frame must be {}-{} bytes, got {}",
                MIN_FRAME_LEN,
                MAX_FRAME_LEN,
                data.len()
            )));
        }

        let (destination, rest) = take_address(data)?;
        let (source, mut rest) = take_address(rest)?;

        let mut digipeaters = Vec::new();
        while rest.len() >= ADDRESS_LEN && rest[0] != CONTROL_FIELD {
            let (digi, tail) = take_address(rest)?;
            digipeaters.push(digi);
            rest = tail;
        }

        match rest {
            [CONTROL_FIELD, PROTOCOL_ID, info @ ..] => Ok(Self {
                destination,
                source,
                digipeaters,
                info: info.to_vec(),
            }),
            _ => Err(CodecError::format(
                "frame missing control field and protocol id",
            )),
        }
    }

    /// Encode the frame for transmission
    ///
    /// A command frame sets the C bit on the destination, a response frame
    /// sets it on the source. Digipeaters carry their own repeated flag.
    pub fn encode(&self, is_response: bool) -> Result<Vec<u8>, CodecError> {
        if self.digipeaters.len() > MAX_DIGIPEATERS {
            return Err(CodecError::format(format!(
                "at most {} digipeaters allowed, got {}",
                MAX_DIGIPEATERS,
                self.digipeaters.len()
            )));
        }

        let len = ADDRESS_LEN * (2 + self.digipeaters.len()) + 2 + self.info.len();
        if !(MIN_FRAME_LEN..=MAX_FRAME_LEN).contains(&len) {
            return Err(CodecError::format(format!(
                "encoded frame would be {} bytes, must be {}-{}",
                len, MIN_FRAME_LEN, MAX_FRAME_LEN
            )));
        }

        let mut out = Vec::with_capacity(len);
        out.extend_from_slice(&self.destination.encode(!is_response, false)?);
        out.extend_from_slice(
            &self
                .source
                .encode(is_response, self.digipeaters.is_empty())?,
        );

        let last = self.digipeaters.len().saturating_sub(1);
        for (i, digi) in self.digipeaters.iter().enumerate() {
            out.extend_from_slice(&digi.encode(digi.command_or_repeated, i == last)?);
        }

        out.push(CONTROL_FIELD);
        out.push(PROTOCOL_ID);
        out.extend_from_slice(&self.info);
        Ok(out)
    }

    /// Info field as text, replacing invalid UTF-8
    pub fn info_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.info)
    }

    /// Multi-line labelled dump of the frame
    pub fn details(&self) -> String {
        let path: Vec<String> = self.digipeaters.iter().map(|d| d.to_string()).collect();
        format!(
            "      Dest: {}\n    Source: {}\n  DigiPath: [{}]\nInfo Field: {}\n",
            self.destination,
            self.source,
            path.join(" "),
            self.info_text()
        )
    }
}

/// Split one address off the front of `data`
fn take_address(data: &[u8]) -> Result<(Callsign, &[u8]), CodecError> {
    if data.len() < ADDRESS_LEN {
        return Err(CodecError::format(format!(
            "truncated address: {} bytes left",
            data.len()
        )));
    }
    let (field, rest) = data.split_at(ADDRESS_LEN);
    Ok((crate::address::decode_address(field)?, rest))
}

impl fmt::Display for Ax25Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::tnc2::render(self))
    }
}
