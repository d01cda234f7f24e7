//! AX.25 address field encoding
//!
//! Each address is 7 bytes: six callsign characters (space padded), each
//! shifted left one bit, then an SSID byte:
//!
//! ```text
//! bit:   7     6 5    4 3 2 1   0
//!       C/H   R R     S S S S   E
//! ```
//!
//! - `C/H`: command/response bit (destination, source) or has-been-repeated
//!   bit (digipeaters)
//! - `R`: reserved, sent as 1
//! - `S`: SSID
//! - `E`: address extension, set on the last address of the header

use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;

/// Length of one encoded address
pub const ADDRESS_LEN: usize = 7;
/// Maximum callsign length
pub const MAX_CALL_LEN: usize = 6;
/// Largest SSID value
pub const MAX_SSID: u8 = 15;

/// SSID bits of the (already shifted) SSID byte
pub const SSID_MASK: u8 = 0x0F;
/// Command/response or has-been-repeated bit of the raw SSID byte
pub const CMD_OR_RPT_MASK: u8 = 0b1000_0000;
/// Reserved bits, always set when encoding
pub const RESERVED_BITS: u8 = 0b0110_0000;
/// Address extension bit (last address in the header)
pub const EXTENSION_MASK: u8 = 0b0000_0001;

/// A station address: callsign, SSID and the C/H flag from its SSID byte
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Callsign {
    /// Callsign without padding
    pub call: String,
    /// Secondary station identifier (0-15)
    pub ssid: u8,
    /// Command bit for destination/source, has-been-repeated for digipeaters
    pub command_or_repeated: bool,
}

impl Callsign {
    /// Create a callsign with the C/H flag cleared
    pub fn new(call: impl Into<String>, ssid: u8) -> Self {
        Self {
            call: call.into(),
            ssid,
            command_or_repeated: false,
        }
    }

    /// Same callsign with the C/H flag set (a digipeater that has repeated)
    pub fn repeated(mut self) -> Self {
        self.command_or_repeated = true;
        self
    }

    /// Decode one 7-byte address field
    pub fn decode(bytes: &[u8; ADDRESS_LEN]) -> Self {
        let call: String = bytes[..MAX_CALL_LEN]
            .iter()
            .map(|&b| char::from(b >> 1))
            .collect();

        Self {
            call: call.trim_end_matches(' ').to_string(),
            ssid: (bytes[6] >> 1) & SSID_MASK,
            command_or_repeated: bytes[6] & CMD_OR_RPT_MASK != 0,
        }
    }

    /// Encode to a 7-byte address field
    ///
    /// `command_bit` is written to bit 7 of the SSID byte and `last` sets the
    /// address extension bit.
    pub fn encode(&self, command_bit: bool, last: bool) -> Result<[u8; ADDRESS_LEN], CodecError> {
        self.validate()?;

        let mut out = [b' ' << 1; ADDRESS_LEN];
        for (slot, c) in out.iter_mut().zip(self.call.bytes()) {
            *slot = c << 1;
        }
        out[6] = ssid_byte(self.ssid, command_bit, last);
        Ok(out)
    }

    /// Check the callsign can be put on the wire
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.call.len() > MAX_CALL_LEN {
            return Err(CodecError::format(format!(
                "callsign {:?} longer than {} characters",
                self.call, MAX_CALL_LEN
            )));
        }
        if !self
            .call
            .bytes()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(CodecError::format(format!(
                "callsign {:?} must be uppercase letters and digits",
                self.call
            )));
        }
        if self.ssid > MAX_SSID {
            return Err(CodecError::format(format!(
                "SSID {} out of range 0-{}",
                self.ssid, MAX_SSID
            )));
        }
        Ok(())
    }
}

/// Build the SSID byte from its parts
fn ssid_byte(ssid: u8, command_bit: bool, last: bool) -> u8 {
    let mut byte = ((ssid & SSID_MASK) << 1) | RESERVED_BITS;
    if command_bit {
        byte |= CMD_OR_RPT_MASK;
    }
    if last {
        byte |= EXTENSION_MASK;
    }
    byte
}

/// Decode an address from a slice that must be exactly 7 bytes
pub fn decode_address(bytes: &[u8]) -> Result<Callsign, CodecError> {
    let field: &[u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
        CodecError::format(format!(
            "address must be {} bytes, got {}",
            ADDRESS_LEN,
            bytes.len()
        ))
    })?;
    Ok(Callsign::decode(field))
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ssid == 0 {
            write!(f, "{}", self.call)
        } else {
            write!(f, "{}-{}", self.call, self.ssid)
        }
    }
}

impl FromStr for Callsign {
    type Err = CodecError;

    /// Parse `CALL` or `CALL-SSID`; a trailing `*` marks a repeated digipeater
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (s, repeated) = match s.strip_suffix('*') {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        let (call, ssid) = match s.split_once('-') {
            Some((call, ssid)) => {
                let ssid = crate::error::parse_digits(ssid.as_bytes())?;
                let ssid = u8::try_from(ssid)
                    .map_err(|_| CodecError::format(format!("SSID {} out of range", ssid)))?;
                (call, ssid)
            }
            None => (s, 0),
        };

        let callsign = Callsign {
            call: call.to_string(),
            ssid,
            command_or_repeated: repeated,
        };
        callsign.validate()?;
        Ok(callsign)
    }
}
