//! Integration tests for the AX.25 / APRS codec
//!
//! These tests run whole pipelines:
//! - KISS stream -> AX.25 frame -> TNC2 line / APRS payload
//! - APRS packet -> frame -> KISS bytes and back
//! - Property-based round trips for addresses and frames

use aprs_protocol::kiss::{self, KissCodec};
use aprs_protocol::{AprsData, AprsPacket, Ax25Frame, Callsign, CodecError, PositionReport};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    /// The KISS capture of `KK7EWJ-7>APDR16,WIDE1-1,WIDE2-1:=3707.62N/11337.37W[/A=002735 hiking`
    pub fn hiking_capture() -> Vec<u8> {
        let mut bytes = vec![
            0xC0, 0x00, // FEND, data frame
            0x82, 0xA0, 0x88, 0xA4, 0x62, 0x6C, 0xE0, // APDR16
            0x96, 0x96, 0x6E, 0x8A, 0xAE, 0x94, 0x6E, // KK7EWJ-7
            0xAE, 0x92, 0x88, 0x8A, 0x62, 0x40, 0x62, // WIDE1-1
            0xAE, 0x92, 0x88, 0x8A, 0x64, 0x40, 0x63, // WIDE2-1 (last)
            0x03, 0xF0,
        ];
        bytes.extend_from_slice(b"=3707.62N/11337.37W[/A=002735 hiking");
        bytes.push(0xC0);
        bytes
    }

    pub fn decode_capture(bytes: &[u8]) -> Result<Ax25Frame, CodecError> {
        Ax25Frame::decode(kiss::unwrap(bytes)?)
    }
}

// ============================================================================
// Pipeline Tests
// ============================================================================

#[test]
fn test_capture_to_tnc2() {
    let frame = helpers::decode_capture(&helpers::hiking_capture()).unwrap();
    assert_eq!(
        frame.to_string(),
        "KK7EWJ-7>APDR16,WIDE1-1,WIDE2-1:=3707.62N/11337.37W[/A=002735 hiking"
    );
}

#[test]
fn test_capture_to_aprs_packet() {
    let frame = helpers::decode_capture(&helpers::hiking_capture()).unwrap();
    let packet = AprsPacket::from_frame(&frame).unwrap();

    assert_eq!(packet.source.to_string(), "KK7EWJ-7");
    assert_eq!(packet.destination.call, "APDR16");
    let report = packet.data.position().unwrap();
    assert_eq!(report.altitude, Some(2735));
    assert_eq!(report.symbol, '[');
    assert_eq!(report.comment, "hiking");
}

#[test]
fn test_reencode_matches_capture() {
    let capture = helpers::hiking_capture();
    let frame = helpers::decode_capture(&capture).unwrap();
    let wire = kiss::wrap(&frame.encode(false).unwrap());
    assert_eq!(wire, capture);
}

#[test]
fn test_stream_split_across_reads() {
    let capture = helpers::hiking_capture();
    let mut codec = KissCodec::new();
    let (first, second) = capture.split_at(11);

    codec.push_bytes(first);
    assert!(codec.next_frame().is_none());
    codec.push_bytes(second);

    let kiss_frame = codec.next_frame().unwrap();
    assert!(kiss_frame.is_data());
    let frame = Ax25Frame::decode(&kiss_frame.data).unwrap();
    assert_eq!(frame.source, Callsign::new("KK7EWJ", 7));
}

#[test]
fn test_packet_to_wire_and_back() {
    let packet = AprsPacket {
        source: Callsign::new("N0CALL", 9),
        destination: Callsign::new("APRS", 0),
        path: vec![Callsign::new("WIDE1", 1), Callsign::new("WIDE2", 2)],
        data: AprsData::Position {
            report: PositionReport {
                latitude: 34.15,
                longitude: -117.5,
                symbol_table: '/',
                symbol: '>',
                course: Some(270),
                speed: Some(12),
                altitude: Some(1500),
                comment: "on the road".into(),
            },
            messaging: false,
        },
        raw: String::new(),
    };

    let bytes = packet.to_frame().unwrap().encode(false).unwrap();
    let mut codec = KissCodec::new();
    codec.push_bytes(&kiss::wrap(&bytes));
    let frame = Ax25Frame::decode(&codec.next_frame().unwrap().data).unwrap();

    assert_eq!(
        frame.to_string(),
        "N0CALL-9>APRS,WIDE1-1,WIDE2-2:!3409.00N/11730.00W>270/012/A=001500on the road"
    );
    let decoded = AprsPacket::from_frame(&frame).unwrap();
    let report = decoded.data.position().unwrap();
    assert_eq!(report.course, Some(270));
    assert_eq!(report.speed, Some(12));
    assert_eq!(report.altitude, Some(1500));
    assert_eq!(report.comment, "on the road");
}

#[test]
fn test_unsupported_payload_in_valid_frame() {
    let frame = Ax25Frame {
        destination: Callsign::new("APRS", 0),
        source: Callsign::new("N0CALL", 0),
        digipeaters: vec![],
        info: b"#weather".to_vec(),
    };
    let decoded = Ax25Frame::decode(&frame.encode(false).unwrap()).unwrap();
    assert_eq!(
        AprsPacket::from_frame(&decoded),
        Err(CodecError::UnsupportedType('#'))
    );
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn callsign() -> impl Strategy<Value = Callsign> {
        ("[A-Z0-9]{1,6}", 0u8..=15).prop_map(|(call, ssid)| Callsign::new(call, ssid))
    }

    fn digipeater() -> impl Strategy<Value = Callsign> {
        (callsign(), any::<bool>()).prop_map(|(cs, repeated)| Callsign {
            command_or_repeated: repeated,
            ..cs
        })
    }

    fn frame() -> impl Strategy<Value = (Ax25Frame, bool)> {
        (
            callsign(),
            callsign(),
            prop::collection::vec(digipeater(), 0..=8),
            prop::collection::vec(any::<u8>(), 3..=200),
            any::<bool>(),
        )
            .prop_map(|(mut destination, mut source, digipeaters, info, is_response)| {
                destination.command_or_repeated = !is_response;
                source.command_or_repeated = is_response;
                (
                    Ax25Frame {
                        destination,
                        source,
                        digipeaters,
                        info,
                    },
                    is_response,
                )
            })
    }

    proptest! {
        #[test]
        fn address_roundtrip(cs in callsign(), command_bit: bool, last: bool) {
            let bytes = cs.encode(command_bit, last).unwrap();
            let decoded = Callsign::decode(&bytes);
            prop_assert_eq!(decoded, Callsign { command_or_repeated: command_bit, ..cs });
        }

        #[test]
        fn frame_roundtrip((frame, is_response) in frame()) {
            let bytes = frame.encode(is_response).unwrap();
            prop_assert_eq!(Ax25Frame::decode(&bytes).unwrap(), frame);
        }

        #[test]
        fn kiss_stream_roundtrip(payload in prop::collection::vec(any::<u8>(), 1..400)) {
            let mut codec = KissCodec::new();
            codec.push_bytes(&kiss::wrap(&payload));
            let kiss_frame = codec.next_frame().unwrap();
            prop_assert_eq!(kiss_frame.data, payload);
        }

        #[test]
        fn tnc2_star_count(path in prop::collection::vec(digipeater(), 0..=8)) {
            let frame = Ax25Frame {
                destination: Callsign::new("APRS", 0),
                source: Callsign::new("N0CALL", 0),
                digipeaters: path.clone(),
                info: vec![],
            };
            let line = frame.to_string();
            let header = line.split(':').next().unwrap();
            let stars = header.matches('*').count();
            let any_repeated = path.iter().any(|d| d.command_or_repeated);
            prop_assert_eq!(stars, usize::from(any_repeated));
            if any_repeated {
                prop_assert!(header.ends_with('*'));
            }
        }

        #[test]
        fn encoded_position_decodes_to_same_text(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            altitude in 1i32..=99_999,
        ) {
            let report = PositionReport {
                latitude: lat,
                longitude: lon,
                symbol_table: '/',
                symbol: '-',
                altitude: Some(altitude),
                ..Default::default()
            };
            let info = AprsData::Position { report, messaging: true }.encode().unwrap();
            let decoded = AprsData::decode(&info).unwrap();
            let decoded = decoded.position().unwrap();
            prop_assert_eq!(decoded.altitude, Some(altitude));
            prop_assert_eq!(info[8], if lat >= 0.0 { b'N' } else { b'S' });
            prop_assert_eq!(info[18], if lon >= 0.0 { b'E' } else { b'W' });
        }
    }
}
