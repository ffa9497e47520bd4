//! End-to-end smoke test — literal wire bytes in, `Payload` out (and back).
//!
//! Proves the encoder and decoder agree on the exact byte sequences named in
//! the wire-format walkthroughs: a Neovim-style RPC request array, a bare
//! nil, the two timestamp examples (32-bit and 96-bit), a three-key map, and
//! the oversized-array32 rejection. No internal plumbing, just bytes.

use mpack::{decode_from_slice, decode_from_slice_with_limits, encode_to_vec, Error, ParseLimits, Payload};

#[test]
fn smoke_nvim_get_api_info_request() {
    let expected: Vec<u8> = vec![
        0x94, 0x00, 0x01, 0xb1, 0x6e, 0x76, 0x69, 0x6d, 0x5f, 0x67, 0x65, 0x74, 0x5f, 0x61, 0x70,
        0x69, 0x5f, 0x69, 0x6e, 0x66, 0x6f, 0x90,
    ];

    let mut request = Payload::array(4);
    request.set_arr_element(0, Payload::uint(0)).unwrap();
    request.set_arr_element(1, Payload::uint(1)).unwrap();
    request
        .set_arr_element(2, Payload::str(b"nvim_get_api_info"))
        .unwrap();
    request.set_arr_element(3, Payload::array(0)).unwrap();

    let encoded = encode_to_vec(&request).expect("encode");
    assert_eq!(encoded, expected, "encoder must match the literal RPC request bytes");

    let decoded = decode_from_slice(&expected).expect("decode");
    assert_eq!(decoded, request, "decoder must reproduce the same tree");
}

#[test]
fn smoke_bare_nil() {
    let encoded = encode_to_vec(&Payload::nil()).unwrap();
    assert_eq!(encoded, vec![0xc0]);
    assert_eq!(decode_from_slice(&[0xc0]).unwrap(), Payload::Nil);
}

#[test]
fn smoke_timestamp32_unix_epoch_plus_change() {
    let expected: Vec<u8> = vec![0xd6, 0xff, 0x49, 0x96, 0x02, 0xd2];
    let ts = Payload::timestamp(1_234_567_890, 0).unwrap();

    assert_eq!(encode_to_vec(&ts).unwrap(), expected);

    match decode_from_slice(&expected).unwrap() {
        Payload::Timestamp(t) => {
            assert_eq!(t.seconds, 1_234_567_890);
            assert_eq!(t.nanoseconds, 0);
        }
        other => panic!("expected a timestamp, got {other:?}"),
    }
}

#[test]
fn smoke_timestamp96_predates_the_epoch() {
    let ts = Payload::timestamp(-1_000_000_000, 123_456_789).unwrap();
    let encoded = encode_to_vec(&ts).unwrap();

    assert_eq!(&encoded[0..3], &[0xc7, 0x0c, 0xff], "ext8(len=12), type -1");

    match decode_from_slice(&encoded).unwrap() {
        Payload::Timestamp(t) => {
            assert_eq!(t.seconds, -1_000_000_000);
            assert_eq!(t.nanoseconds, 123_456_789);
        }
        other => panic!("expected a timestamp, got {other:?}"),
    }
}

#[test]
fn smoke_three_key_map_round_trips() {
    let mut map = Payload::map();
    map.map_put(b"alpha", Payload::uint(1)).unwrap();
    map.map_put(b"beta", Payload::uint(2)).unwrap();
    map.map_put(b"gamma", Payload::uint(3)).unwrap();

    let encoded = encode_to_vec(&map).unwrap();
    let decoded = decode_from_slice(&encoded).unwrap();

    assert_eq!(decoded.map_get(b"alpha").unwrap().unwrap().as_uint().unwrap(), 1);
    assert_eq!(decoded.map_get(b"beta").unwrap().unwrap().as_uint().unwrap(), 2);
    assert_eq!(decoded.map_get(b"gamma").unwrap().unwrap().as_uint().unwrap(), 3);
    assert_eq!(decoded, map);
}

#[test]
fn smoke_generic_ext_round_trips_as_ext_not_timestamp() {
    // Type -1 is reserved for timestamps, but only at the three recognized
    // lengths (4, 8, 12); any other type round-trips as a plain `Ext`.
    let value = Payload::ext(5, b"hello ext payload");
    let encoded = encode_to_vec(&value).unwrap();
    let decoded = decode_from_slice(&encoded).unwrap();
    assert_eq!(decoded, value);
    match decoded {
        Payload::Ext(ext) => {
            assert_eq!(ext.r#type, 5);
            assert_eq!(ext.data, b"hello ext payload");
        }
        other => panic!("expected Ext, got {other:?}"),
    }

    // Type -1 with a length outside {4, 8, 12} is not a recognized timestamp
    // shape either, and must also round-trip as `Ext`.
    let non_timestamp_length = Payload::ext(-1, b"xyz");
    let encoded = encode_to_vec(&non_timestamp_length).unwrap();
    let decoded = decode_from_slice(&encoded).unwrap();
    assert_eq!(decoded, non_timestamp_length);
}

#[test]
fn smoke_oversized_array32_is_rejected_before_allocating() {
    // array32 marker declaring 2,000,000 elements, no element bytes follow —
    // if the decoder allocated before validating, this would hang or OOM
    // rather than failing fast.
    let mut bytes = vec![0xdd];
    bytes.extend_from_slice(&2_000_000u32.to_be_bytes());

    let tight_limits = ParseLimits::uniform(1_000_000, 1_000);
    let result = decode_from_slice_with_limits(&bytes, tight_limits);
    assert_eq!(result, Err(Error::ArrayTooLarge));
}
