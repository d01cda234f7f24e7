//! TNC2 monitor format
//!
//! ```text
//! SOURCE>DEST[,DIGI...[*]]:INFO
//! ```
//!
//! A single `*` after the path marks that the frame has been digipeated.
//! Unused hops after the last repeating digipeater are not shown.

use crate::address::Callsign;
use crate::frame::Ax25Frame;

/// Where the path walk is relative to the repeated digipeaters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathState {
    NotYetRepeated,
    Repeated,
}

/// Render a frame as a TNC2 monitor line
pub fn render(frame: &Ax25Frame) -> String {
    let mut out = format!("{}>{}", frame.source, frame.destination);
    out.push_str(&render_path(&frame.digipeaters));
    out.push(':');
    out.push_str(&frame.info_text());
    out
}

/// Render the digipeater list, including its leading comma(s) and star
fn render_path(digipeaters: &[Callsign]) -> String {
    let mut out = String::new();
    let mut state = PathState::NotYetRepeated;

    for digi in digipeaters {
        state = match (state, digi.command_or_repeated) {
            (PathState::Repeated, false) => break,
            (_, true) => PathState::Repeated,
            (state, false) => state,
        };
        out.push(',');
        out.push_str(&digi.to_string());
    }

    if state == PathState::Repeated {
        out.push('*');
    }
    out
}
