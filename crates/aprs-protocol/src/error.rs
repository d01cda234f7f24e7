//! Error types for AX.25 and APRS encoding/decoding

use thiserror::Error;

/// Errors that can occur while encoding or decoding frames and payloads
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Malformed length, missing delimiters or control bytes, invalid address
    #[error("invalid format: {0}")]
    Format(String),

    /// APRS data type identifier that this codec does not handle
    #[error("unsupported APRS data type: {0:?}")]
    UnsupportedType(char),

    /// Non-digit where a digit run was expected
    #[error("invalid number: {0}")]
    NumericParse(String),
}

impl CodecError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}

/// Parse an ASCII field as an unsigned decimal number.
///
/// Every byte must be a digit; signs and whitespace are rejected.
pub(crate) fn parse_digits(field: &[u8]) -> Result<u32, CodecError> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return Err(CodecError::NumericParse(format!(
            "expected digits, got {:?}",
            String::from_utf8_lossy(field)
        )));
    }
    field.iter().try_fold(0u32, |acc, &b| {
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(b - b'0')))
            .ok_or_else(|| {
                CodecError::NumericParse(format!(
                    "{:?} does not fit in 32 bits",
                    String::from_utf8_lossy(field)
                ))
            })
    })
}

/// Like [`parse_digits`], but accepts one leading `-`.
pub(crate) fn parse_signed(field: &[u8]) -> Result<i32, CodecError> {
    match field.split_first() {
        Some((b'-', digits)) => to_i32(parse_digits(digits)?, field).map(|v| -v),
        _ => to_i32(parse_digits(field)?, field),
    }
}

fn to_i32(value: u32, field: &[u8]) -> Result<i32, CodecError> {
    i32::try_from(value).map_err(|_| {
        CodecError::NumericParse(format!(
            "{:?} out of range",
            String::from_utf8_lossy(field)
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits(b"002735").unwrap(), 2735);
        assert_eq!(parse_digits(b"0").unwrap(), 0);
        assert!(matches!(
            parse_digits(b"12a"),
            Err(CodecError::NumericParse(_))
        ));
        assert!(matches!(parse_digits(b""), Err(CodecError::NumericParse(_))));
        assert!(matches!(
            parse_digits(b"-12"),
            Err(CodecError::NumericParse(_))
        ));
    }

    #[test]
    fn test_parse_digits_overflow() {
        assert_eq!(parse_digits(b"4294967295").unwrap(), u32::MAX);
        assert!(matches!(
            parse_digits(b"4294967296"),
            Err(CodecError::NumericParse(_))
        ));
        assert!(matches!(
            parse_digits(b"99999999999"),
            Err(CodecError::NumericParse(_))
        ));
    }

    #[test]
    fn test_parse_signed() {
        assert_eq!(parse_signed(b"-00012").unwrap(), -12);
        assert_eq!(parse_signed(b"000120").unwrap(), 120);
        assert!(parse_signed(b"-").is_err());
        assert!(parse_signed(b"2147483648").is_err());
    }

    #[test]
    fn test_unsupported_type_message() {
        let err = CodecError::UnsupportedType('#');
        assert_eq!(err.to_string(), "unsupported APRS data type: '#'");
    }
}
