//! KISS-over-TCP connection handling
//!
//! [`KissReader`] turns any async byte stream into decoded AX.25 frames.
//! [`run_monitor`] owns the TCP connection to the KISS server and reconnects
//! with capped exponential backoff until shutdown is requested.

use std::time::Duration;

use aprs_protocol::kiss::KissCodec;
use aprs_protocol::{Ax25Frame, CodecError};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::MonitorError;

/// Events emitted by the connection task
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// Connected to the KISS server
    Connected { server: String },
    /// A frame decoded successfully
    Frame(Ax25Frame),
    /// A KISS data frame that is not a valid AX.25 frame
    DecodeError { error: CodecError, raw: Vec<u8> },
    /// Connection ended
    Disconnected { reason: String },
}

/// Reads a KISS byte stream and emits decoded frames
///
/// Generic over the I/O type so tests can drive it with in-memory streams.
pub struct KissReader<T> {
    io: T,
    codec: KissCodec,
    buffer: Vec<u8>,
    event_tx: mpsc::Sender<MonitorEvent>,
}

impl<T> KissReader<T>
where
    T: AsyncRead + Unpin + Send,
{
    /// Create a new reader
    pub fn new(io: T, buffer_size: usize, event_tx: mpsc::Sender<MonitorEvent>) -> Self {
        Self {
            io,
            codec: KissCodec::new(),
            buffer: vec![0u8; buffer_size.max(1)],
            event_tx,
        }
    }

    /// Read until EOF, an I/O error, or the event receiver is dropped
    pub async fn run(mut self) -> Result<(), MonitorError> {
        loop {
            let n = self.io.read(&mut self.buffer).await?;
            if n == 0 {
                debug!("KISS stream reached EOF");
                return Ok(());
            }
            debug!("Read {} bytes: {:02X?}", n, &self.buffer[..n]);
            self.codec.push_bytes(&self.buffer[..n]);

            while let Some(kiss_frame) = self.codec.next_frame() {
                if !kiss_frame.is_data() {
                    debug!(
                        "Ignoring KISS command 0x{:02X} on port {}",
                        kiss_frame.command, kiss_frame.port
                    );
                    continue;
                }

                let event = match Ax25Frame::decode(&kiss_frame.data) {
                    Ok(frame) => MonitorEvent::Frame(frame),
                    Err(error) => {
                        warn!("Failed to decode AX.25 frame: {}", error);
                        MonitorEvent::DecodeError {
                            error,
                            raw: kiss_frame.data,
                        }
                    }
                };

                if self.event_tx.send(event).await.is_err() {
                    debug!("Event receiver closed, stopping reader");
                    return Ok(());
                }
            }
        }
    }
}

/// Next reconnect delay: doubled, capped at `max`
fn next_backoff(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}

/// Connect to the configured KISS server and forward frames until shutdown
///
/// Connection failures and disconnects are reported as events and retried.
pub async fn run_monitor(
    config: MonitorConfig,
    event_tx: mpsc::Sender<MonitorEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let initial = Duration::from_millis(config.reconnect_delay_ms);
    let max = Duration::from_millis(config.max_reconnect_delay_ms);
    let mut backoff = initial;

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let connected = tokio::select! {
            _ = shutdown_rx.changed() => break,
            result = TcpStream::connect(config.server.as_str()) => result,
        };

        let reason = match connected {
            Ok(stream) => {
                info!("Connected to KISS server at {}", config.server);
                backoff = initial;
                let connected = MonitorEvent::Connected {
                    server: config.server.clone(),
                };
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    sent = event_tx.send(connected) => if sent.is_err() { break },
                }

                let reader = KissReader::new(stream, config.read_buffer_size, event_tx.clone());
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    result = reader.run() => match result {
                        Ok(()) => "connection closed".to_string(),
                        Err(e) => e.to_string(),
                    },
                }
            }
            Err(e) => format!("connect to {} failed: {}", config.server, e),
        };

        if event_tx.is_closed() {
            break;
        }
        warn!("{}; retrying in {:?}", reason, backoff);
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            _ = event_tx.send(MonitorEvent::Disconnected { reason }) => {}
        }

        tokio::select! {
            _ = shutdown_rx.changed() => break,
            _ = tokio::time::sleep(backoff) => {}
        }
        backoff = next_backoff(backoff, max);
    }

    info!("Monitor stopped");
}
