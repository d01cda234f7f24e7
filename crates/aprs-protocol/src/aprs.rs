//! APRS information field
//!
//! The first byte of the info field is the data type identifier:
//!
//! | Identifier | Meaning                                    |
//! |------------|--------------------------------------------|
//! | `!`        | Position without timestamp, no messaging   |
//! | `=`        | Position without timestamp, messaging      |
//! | `>`        | Status (laid out like a position report)   |
//! | `:`        | Message (kept as opaque text)              |
//!
//! # Position Layout
//! ```text
//! DDMM.hhN T DDDMM.hhW S [CCC/SSS] [/A=AAAAAA] comment
//! ```
//!
//! `T` is the symbol table id, `S` the symbol id. The course/speed and
//! altitude extensions are optional and appear in that order.

use std::fmt::{self, Write};

use crate::address::Callsign;
use crate::coordinates::{from_aprs_text, to_aprs_text, LATITUDE_LEN, LONGITUDE_LEN};
use crate::error::{parse_digits, parse_signed, CodecError};
use crate::frame::Ax25Frame;

/// Bytes before the optional extensions: lat, table, lon, symbol
const POSITION_LEN: usize = LATITUDE_LEN + 1 + LONGITUDE_LEN + 1;
/// `CCC/SSS`
const COURSE_SPEED_LEN: usize = 7;
/// `/A=` followed by six digits
const ALTITUDE_LEN: usize = 9;
const ALTITUDE_PREFIX: &[u8] = b"/A=";

/// Largest course in degrees
pub const MAX_COURSE: u16 = 360;
/// Largest speed that fits the three-digit field
pub const MAX_SPEED: u16 = 999;

/// APRS data type identifiers handled by this codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// `!` position without timestamp, station cannot receive messages
    Position,
    /// `=` position without timestamp, station can receive messages
    PositionWithMessaging,
    /// `>` status report
    Status,
    /// `:` message
    Message,
}

impl DataType {
    /// The identifier byte for this data type
    pub fn identifier(self) -> u8 {
        match self {
            Self::Position => b'!',
            Self::PositionWithMessaging => b'=',
            Self::Status => b'>',
            Self::Message => b':',
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Position => "Position",
            Self::PositionWithMessaging => "Position (messaging)",
            Self::Status => "Status",
            Self::Message => "Message",
        };
        f.write_str(name)
    }
}

impl TryFrom<u8> for DataType {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            b'!' => Ok(Self::Position),
            b'=' => Ok(Self::PositionWithMessaging),
            b'>' => Ok(Self::Status),
            b':' => Ok(Self::Message),
            _ => Err(CodecError::UnsupportedType(char::from(value))),
        }
    }
}

/// An uncompressed position report
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionReport {
    /// Decimal degrees, north positive
    pub latitude: f64,
    /// Decimal degrees, east positive
    pub longitude: f64,
    /// Symbol table id (`/` primary, `\` alternate, or an overlay)
    pub symbol_table: char,
    /// Symbol id within the table
    pub symbol: char,
    /// Course over ground in degrees
    pub course: Option<u16>,
    /// Speed in knots
    pub speed: Option<u16>,
    /// Altitude in feet
    pub altitude: Option<i32>,
    /// Free text after the extensions
    pub comment: String,
}

impl PositionReport {
    /// Parse the position body (everything after the identifier byte)
    pub fn decode(body: &[u8]) -> Result<Self, CodecError> {
        if body.len() < POSITION_LEN - 1 {
            return Err(CodecError::format(format!(
                "position report too short: {} bytes",
                body.len()
            )));
        }
        if body.len() < POSITION_LEN {
            return Err(CodecError::format("position report missing symbol id"));
        }

        let raw_lat = &body[..LATITUDE_LEN];
        let symbol_table = char::from(body[LATITUDE_LEN]);
        let raw_lon = &body[LATITUDE_LEN + 1..POSITION_LEN - 1];
        let symbol = char::from(body[POSITION_LEN - 1]);
        let (latitude, longitude) = from_aprs_text(raw_lat, raw_lon)?;

        let mut report = Self {
            latitude,
            longitude,
            symbol_table,
            symbol,
            ..Default::default()
        };

        let mut rest = &body[POSITION_LEN..];

        if rest.len() >= COURSE_SPEED_LEN && rest[3] == b'/' {
            let course = parse_digits(&rest[..3])?;
            if course > u32::from(MAX_COURSE) {
                return Err(CodecError::format(format!("course {} out of range", course)));
            }
            report.course = Some(course as u16);
            report.speed = Some(parse_digits(&rest[4..7])? as u16);
            rest = &rest[COURSE_SPEED_LEN..];
        }

        if rest.starts_with(ALTITUDE_PREFIX) && rest.len() >= ALTITUDE_LEN {
            report.altitude = Some(parse_signed(&rest[3..ALTITUDE_LEN])?);
            rest = &rest[ALTITUDE_LEN..];
        }

        report.comment = String::from_utf8_lossy(rest).trim_matches(' ').to_string();
        Ok(report)
    }

    /// Encode the position body (without identifier byte)
    pub fn encode(&self) -> Result<String, CodecError> {
        let mut out = to_aprs_text(
            self.latitude,
            self.longitude,
            self.symbol_table,
            self.symbol,
        )?;

        match (self.course, self.speed) {
            (Some(course), Some(speed)) => {
                if course > MAX_COURSE || speed > MAX_SPEED {
                    return Err(CodecError::format(format!(
                        "course/speed {}/{} out of range",
                        course, speed
                    )));
                }
                out.push_str(&format!("{:03}/{:03}", course, speed));
            }
            (None, None) => {}
            _ => {
                return Err(CodecError::format(
                    "course and speed must be given together",
                ))
            }
        }

        if let Some(altitude) = self.altitude.filter(|&a| a != 0) {
            out.push_str(&encode_altitude(altitude)?);
        }

        out.push_str(&self.comment);
        Ok(out)
    }
}

/// `/A=` plus the altitude zero padded to six characters
pub fn encode_altitude(feet: i32) -> Result<String, CodecError> {
    let text = format!("/A={:06}", feet);
    if text.len() != ALTITUDE_LEN {
        return Err(CodecError::format(format!(
            "altitude {} does not fit six characters",
            feet
        )));
    }
    Ok(text)
}

/// Decoded APRS information field
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum AprsData {
    /// Position report without timestamp
    Position {
        report: PositionReport,
        /// Station can receive APRS messages (`=` rather than `!`)
        messaging: bool,
    },
    /// Status report
    Status { report: PositionReport },
    /// Message, payload after the identifier
    Message { text: String },
}

impl AprsData {
    /// Decode an info field
    pub fn decode(info: &[u8]) -> Result<Self, CodecError> {
        let (&identifier, body) = info
            .split_first()
            .ok_or_else(|| CodecError::format("empty info field"))?;

        match DataType::try_from(identifier)? {
            DataType::Position => Ok(Self::Position {
                report: PositionReport::decode(body)?,
                messaging: false,
            }),
            DataType::PositionWithMessaging => Ok(Self::Position {
                report: PositionReport::decode(body)?,
                messaging: true,
            }),
            DataType::Status => Ok(Self::Status {
                report: PositionReport::decode(body)?,
            }),
            DataType::Message => Ok(Self::Message {
                text: String::from_utf8_lossy(body).into_owned(),
            }),
        }
    }

    /// Encode to an info field
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = vec![self.data_type().identifier()];
        match self {
            Self::Position { report, .. } | Self::Status { report } => {
                out.extend_from_slice(report.encode()?.as_bytes());
            }
            Self::Message { text } => out.extend_from_slice(text.as_bytes()),
        }
        Ok(out)
    }

    /// Data type identifier this value is sent with
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Position {
                messaging: false, ..
            } => DataType::Position,
            Self::Position {
                messaging: true, ..
            } => DataType::PositionWithMessaging,
            Self::Status { .. } => DataType::Status,
            Self::Message { .. } => DataType::Message,
        }
    }

    /// The position carried by this payload, if any
    pub fn position(&self) -> Option<&PositionReport> {
        match self {
            Self::Position { report, .. } | Self::Status { report } => Some(report),
            Self::Message { .. } => None,
        }
    }

    /// Multi-line labelled dump, aligned with [`Ax25Frame::details`]
    pub fn details(&self) -> String {
        let mut out = String::new();
        let mut line = |label: &str, value: &dyn fmt::Display| {
            let _ = writeln!(out, "{:>10}: {}", label, value);
        };

        line("Type", &self.data_type());
        match self {
            Self::Position { report, .. } | Self::Status { report } => {
                line("Latitude", &format_args!("{:.5}", report.latitude));
                line("Longitude", &format_args!("{:.5}", report.longitude));
                line(
                    "Symbol",
                    &format_args!("{}{}", report.symbol_table, report.symbol),
                );
                if let Some(course) = report.course {
                    line("Course", &course);
                }
                if let Some(speed) = report.speed {
                    line("Speed", &format_args!("{} kn", speed));
                }
                if let Some(altitude) = report.altitude {
                    line("Altitude", &format_args!("{} ft", altitude));
                }
                line("Comment", &report.comment);
            }
            Self::Message { text } => line("Message", text),
        }
        out
    }
}

/// An APRS packet: the frame's addressing plus its decoded payload
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AprsPacket {
    /// Sending station
    pub source: Callsign,
    /// Destination (APRS software/device id)
    pub destination: Callsign,
    /// Digipeater path
    pub path: Vec<Callsign>,
    /// Decoded payload
    pub data: AprsData,
    /// Info field as received
    pub raw: String,
}

impl AprsPacket {
    /// Decode the APRS payload of a frame
    pub fn from_frame(frame: &Ax25Frame) -> Result<Self, CodecError> {
        Ok(Self {
            source: frame.source.clone(),
            destination: frame.destination.clone(),
            path: frame.digipeaters.clone(),
            data: AprsData::decode(&frame.info)?,
            raw: frame.info_text().into_owned(),
        })
    }

    /// Build a command frame carrying this packet's payload
    pub fn to_frame(&self) -> Result<Ax25Frame, CodecError> {
        Ok(Ax25Frame {
            destination: Callsign {
                command_or_repeated: true,
                ..self.destination.clone()
            },
            source: Callsign {
                command_or_repeated: false,
                ..self.source.clone()
            },
            digipeaters: self.path.clone(),
            info: self.data.encode()?,
        })
    }
}
