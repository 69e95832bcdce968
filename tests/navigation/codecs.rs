//! Decoding stored values through the entry codecs.

use burrow::codec::{encode_timestamp, encode_uvarint};
use burrow::CodecError;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use crate::common::*;

fn positioned() -> Navigator {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["values"]);
    nav
}

#[test]
fn varint_42_decodes_to_42() {
    let nav = positioned();
    nav.put("n", encode_uvarint(42)).unwrap();
    assert_eq!(
        nav.get_decoded("n", Codec::Uvarint).unwrap(),
        DecodedValue::Int(42)
    );
}

#[test]
fn non_varint_bytes_fail_deterministically() {
    let nav = positioned();
    nav.put("junk", vec![0x80u8, 0x80, 0x80]).unwrap();
    for _ in 0..3 {
        assert!(matches!(
            nav.get_decoded("junk", Codec::Uvarint),
            Err(Error::Decode(CodecError::Truncated(3)))
        ));
    }
}

#[test]
fn varint_with_trailing_bytes_is_rejected() {
    let nav = positioned();
    nav.put("text", "hello").unwrap();
    assert!(matches!(
        nav.get_decoded("text", Codec::Uvarint),
        Err(Error::Decode(CodecError::TrailingBytes { .. }))
    ));
}

#[test]
fn timestamp_decodes_with_offset() {
    let nav = positioned();
    let zone = FixedOffset::east_opt(2 * 3600).unwrap();
    let when: DateTime<FixedOffset> = zone.with_ymd_and_hms(2023, 6, 15, 12, 30, 0).unwrap();
    nav.put("t", encode_timestamp(&when).unwrap()).unwrap();

    match nav.get_decoded("t", Codec::Timestamp).unwrap() {
        DecodedValue::Time(t) => {
            assert_eq!(t, when);
            assert_eq!(t.offset().local_minus_utc(), 2 * 3600);
        }
        other => panic!("expected a time, got {:?}", other),
    }
}

#[test]
fn utc_timestamp_renders_rfc3339() {
    let nav = positioned();
    let when = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap().fixed_offset();
    nav.put("t", encode_timestamp(&when).unwrap()).unwrap();
    let decoded = nav.get_decoded("t", Codec::Timestamp).unwrap();
    assert_eq!(decoded.to_string(), "2020-01-02T03:04:05+00:00");
}

#[test]
fn malformed_timestamp_is_decode_error() {
    let nav = positioned();
    nav.put("t", vec![1u8, 2, 3]).unwrap();
    assert!(matches!(
        nav.get_decoded("t", Codec::Timestamp),
        Err(Error::Decode(_))
    ));
}

#[test]
fn raw_codec_never_fails() {
    let nav = positioned();
    nav.put("bin", vec![0xffu8, 0x00]).unwrap();
    let decoded = nav.get_decoded("bin", Codec::Raw).unwrap();
    assert_eq!(decoded, DecodedValue::Raw(vec![0xff, 0x00]));
    assert_eq!(decoded.to_string(), "[255 0]");
}

#[test]
fn same_bytes_through_every_codec() {
    let nav = positioned();
    nav.put("n", encode_uvarint(7)).unwrap();
    assert_eq!(
        nav.get_decoded("n", Codec::Raw).unwrap(),
        DecodedValue::Raw(vec![7])
    );
    assert_eq!(
        nav.get_decoded("n", Codec::Uvarint).unwrap(),
        DecodedValue::Int(7)
    );
    assert!(nav.get_decoded("n", Codec::Timestamp).is_err());
}

#[test]
fn put_encoded_round_trips_through_store() {
    let nav = positioned();
    nav.put_encoded("n", "18446744073709551615", Codec::Uvarint)
        .unwrap();
    assert_eq!(
        nav.get_decoded("n", Codec::Uvarint).unwrap(),
        DecodedValue::Int(u64::MAX)
    );

    nav.put_encoded("t", "2021-03-04T05:06:07-05:00", Codec::Timestamp)
        .unwrap();
    assert_eq!(
        nav.get_decoded("t", Codec::Timestamp).unwrap().to_string(),
        "2021-03-04T05:06:07-05:00"
    );
}
