//! AX.25 / APRS Protocol Library
//!
//! This crate decodes and encodes the frames exchanged with an amateur radio
//! TNC over KISS:
//!
//! - **KISS**: `FEND`-delimited transport framing, one-shot and streaming
//! - **AX.25**: UI frames with 7-byte shifted-ASCII addresses and a
//!   digipeater path
//! - **TNC2**: the `SRC>DST,PATH:INFO` monitor text format
//! - **APRS**: position, status and message payloads in the info field
//!
//! # Architecture
//!
//! ```text
//! bytes -> kiss -> frame (-> address) -> tnc2
//!                                     -> aprs (-> coordinates)
//! ```
//!
//! Everything except [`kiss::KissCodec`] is a pure function of its input.
//! No FCS is computed or checked.
//!
//! # Example
//!
//! ```rust
//! use aprs_protocol::{kiss, AprsData, Ax25Frame, Callsign};
//!
//! let frame = Ax25Frame {
//!     destination: Callsign::new("APRS", 0),
//!     source: Callsign::new("N0CALL", 9),
//!     digipeaters: vec![Callsign::new("WIDE1", 1)],
//!     info: b"!4903.50N/07201.75W-Test".to_vec(),
//! };
//!
//! let wire = kiss::wrap(&frame.encode(false).unwrap());
//! let decoded = Ax25Frame::decode(kiss::unwrap(&wire).unwrap()).unwrap();
//! assert_eq!(decoded.to_string(), "N0CALL-9>APRS,WIDE1-1:!4903.50N/07201.75W-Test");
//!
//! let data = AprsData::decode(&decoded.info).unwrap();
//! assert_eq!(data.position().unwrap().comment, "Test");
//! ```

pub mod address;
pub mod aprs;
pub mod coordinates;
pub mod error;
pub mod frame;
pub mod kiss;
pub mod tnc2;

pub use address::Callsign;
pub use aprs::{AprsData, AprsPacket, DataType, PositionReport};
pub use error::CodecError;
pub use frame::Ax25Frame;
