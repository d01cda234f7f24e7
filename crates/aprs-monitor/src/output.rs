//! Rendering decoded frames for stdout

use aprs_protocol::{AprsPacket, Ax25Frame};
use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::MonitorError;

/// One frame as written in JSON output
#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    tnc2: String,
    frame: &'a Ax25Frame,
    #[serde(skip_serializing_if = "Option::is_none")]
    aprs: Option<AprsPacket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Render a frame in the requested format
///
/// Returns `None` when the APRS payload does not decode and such frames
/// are not wanted.
pub fn render_frame(
    frame: &Ax25Frame,
    format: OutputFormat,
    show_undecodable: bool,
) -> Result<Option<String>, MonitorError> {
    let aprs = AprsPacket::from_frame(frame);
    if aprs.is_err() && !show_undecodable {
        return Ok(None);
    }

    let text = match format {
        OutputFormat::Tnc2 => frame.to_string(),
        OutputFormat::Detailed => {
            let mut text = frame.details();
            match &aprs {
                Ok(packet) => text.push_str(&packet.data.details()),
                Err(e) => text.push_str(&format!("     Error: {}\n", e)),
            }
            text
        }
        OutputFormat::Json => {
            let (aprs, error) = match aprs {
                Ok(packet) => (Some(packet), None),
                Err(e) => (None, Some(e.to_string())),
            };
            serde_json::to_string(&JsonRecord {
                tnc2: frame.to_string(),
                frame,
                aprs,
                error,
            })?
        }
    };
    Ok(Some(text))
}
