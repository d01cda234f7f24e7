//! APRS uncompressed coordinates
//!
//! Positions are sent as fixed-width degrees, whole minutes and hundredths of
//! a minute, followed by a hemisphere letter:
//!
//! ```text
//! latitude:  DDMM.hhN   (8 chars)
//! longitude: DDDMM.hhW  (9 chars)
//! ```
//!
//! On the way in, the two digits after the decimal point are weighted as
//! seconds of a degree (`/3600`) rather than hundredths of a minute (`/6000`),
//! so encode and decode are not exact inverses.

use crate::error::{parse_digits, CodecError};

/// Length of an encoded latitude
pub const LATITUDE_LEN: usize = 8;
/// Length of an encoded longitude
pub const LONGITUDE_LEN: usize = 9;

// Absorbs binary representation error before flooring, e.g. 34.15 * 6000.
const ROUNDING_EPSILON: f64 = 1e-6;

/// Encode a position as `DDMM.hhN` + table id + `DDDMM.hhW` + symbol id
pub fn to_aprs_text(
    latitude: f64,
    longitude: f64,
    symbol_table: char,
    symbol: char,
) -> Result<String, CodecError> {
    if !latitude.is_finite() || latitude.abs() > 90.0 {
        return Err(CodecError::format(format!(
            "latitude {} out of range",
            latitude
        )));
    }
    if !longitude.is_finite() || longitude.abs() > 180.0 {
        return Err(CodecError::format(format!(
            "longitude {} out of range",
            longitude
        )));
    }
    for c in [symbol_table, symbol] {
        if !c.is_ascii_graphic() {
            return Err(CodecError::format(format!("invalid symbol {:?}", c)));
        }
    }

    let lat_hemisphere = if latitude >= 0.0 { 'N' } else { 'S' };
    let lon_hemisphere = if longitude >= 0.0 { 'E' } else { 'W' };

    let mut out = String::with_capacity(LATITUDE_LEN + LONGITUDE_LEN + 2);
    out.push_str(&format_angle(latitude.abs(), 2));
    out.push(lat_hemisphere);
    out.push(symbol_table);
    out.push_str(&format_angle(longitude.abs(), 3));
    out.push(lon_hemisphere);
    out.push(symbol);
    Ok(out)
}

/// `DD[D]MM.hh` for a non-negative angle
fn format_angle(magnitude: f64, degree_digits: usize) -> String {
    let hundredths = (magnitude * 6000.0 + ROUNDING_EPSILON).floor() as u32;
    let degrees = hundredths / 6000;
    let minutes = (hundredths % 6000) / 100;
    let fraction = hundredths % 100;
    format!(
        "{:0width$}{:02}.{:02}",
        degrees,
        minutes,
        fraction,
        width = degree_digits
    )
}

/// Decode an 8-char latitude and 9-char longitude into signed decimal degrees
pub fn from_aprs_text(raw_lat: &[u8], raw_lon: &[u8]) -> Result<(f64, f64), CodecError> {
    if raw_lat.len() != LATITUDE_LEN {
        return Err(CodecError::format(format!(
            "latitude must be {} characters, got {}",
            LATITUDE_LEN,
            raw_lat.len()
        )));
    }
    if raw_lon.len() != LONGITUDE_LEN {
        return Err(CodecError::format(format!(
            "longitude must be {} characters, got {}",
            LONGITUDE_LEN,
            raw_lon.len()
        )));
    }

    let latitude = parse_angle(raw_lat, 2, b'N', b'S')?;
    let longitude = parse_angle(raw_lon, 3, b'E', b'W')?;
    Ok((latitude, longitude))
}

fn parse_angle(
    raw: &[u8],
    degree_digits: usize,
    positive: u8,
    negative: u8,
) -> Result<f64, CodecError> {
    let (degrees, rest) = raw.split_at(degree_digits);
    let (minutes, rest) = rest.split_at(2);
    let (point, rest) = rest.split_at(1);
    let (seconds, hemisphere) = rest.split_at(2);

    if point != b"." {
        return Err(CodecError::format(format!(
            "missing decimal point in {:?}",
            String::from_utf8_lossy(raw)
        )));
    }

    let value = f64::from(parse_digits(degrees)?)
        + f64::from(parse_digits(minutes)?) / 60.0
        + f64::from(parse_digits(seconds)?) / 3600.0;

    match hemisphere {
        [h] if *h == positive => Ok(value),
        [h] if *h == negative => Ok(-value),
        _ => Err(CodecError::format(format!(
            "invalid hemisphere in {:?}",
            String::from_utf8_lossy(raw)
        ))),
    }
}
