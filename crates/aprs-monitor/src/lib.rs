//! APRS Monitor
//!
//! Listen-only client for a KISS-over-TCP TNC (Direwolf, soundmodem, ...).
//! Frames are decoded with `aprs-protocol` and printed as TNC2 lines, JSON
//! records or a labelled dump.
//!
//! # Architecture
//!
//! ```text
//! TcpStream -> KissReader -> mpsc<MonitorEvent> -> render_frame -> stdout
//! ```
//!
//! The connection task reconnects with backoff; decode failures are reported
//! as events and never stop the stream.

pub mod config;
pub mod connection;
pub mod error;
pub mod output;

pub use config::{MonitorConfig, OutputFormat};
pub use connection::{run_monitor, KissReader, MonitorEvent};
pub use error::MonitorError;
pub use output::render_frame;
