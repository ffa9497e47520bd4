//! Conformance checks: marker-byte invariants, encoder minimality, and the
//! integer sign boundary the encoder must never cross by a byte.
//!
//! These don't exercise any one feature so much as the contract the whole
//! wire format rests on — given a value, the encoder always emits the
//! *shortest* valid marker for it, and a marker byte always identifies the
//! same value category regardless of which value produced it.

use mpack::{decode_from_slice, encode_to_vec, Payload};

fn encode(value: &Payload) -> Vec<u8> {
    encode_to_vec(value).expect("encode")
}

#[test]
fn positive_fixint_covers_0_through_127() {
    for v in [0u64, 1, 63, 126, 127] {
        let bytes = encode(&Payload::uint(v));
        assert_eq!(bytes.len(), 1, "value {v} should fit a single fixint byte");
        assert_eq!(bytes[0], v as u8);
    }
}

#[test]
fn uint_width_selection_is_minimal() {
    assert_eq!(encode(&Payload::uint(127)).len(), 1);
    assert_eq!(encode(&Payload::uint(128)).len(), 2);
    assert_eq!(encode(&Payload::uint(255)).len(), 2);
    assert_eq!(encode(&Payload::uint(256)).len(), 3);
    assert_eq!(encode(&Payload::uint(65_535)).len(), 3);
    assert_eq!(encode(&Payload::uint(65_536)).len(), 5);
    assert_eq!(encode(&Payload::uint(0xffff_ffff)).len(), 5);
    assert_eq!(encode(&Payload::uint(0x1_0000_0000)).len(), 9);
}

#[test]
fn negative_fixint_covers_minus_32_through_minus_1() {
    for v in [-1i64, -2, -16, -31, -32] {
        let bytes = encode(&Payload::int(v));
        assert_eq!(bytes.len(), 1, "value {v} should fit a single negative fixint byte");
    }
    // One step past the boundary must need int8.
    let bytes = encode(&Payload::int(-33));
    assert_eq!(bytes[0], 0xd0);
    assert_eq!(bytes.len(), 2);
}

#[test]
fn int_width_selection_is_minimal() {
    assert_eq!(encode(&Payload::int(-128)).len(), 2);
    assert_eq!(encode(&Payload::int(-129)).len(), 3);
    assert_eq!(encode(&Payload::int(-32_768)).len(), 3);
    assert_eq!(encode(&Payload::int(-32_769)).len(), 5);
    assert_eq!(encode(&Payload::int(-2_147_483_648)).len(), 5);
    assert_eq!(encode(&Payload::int(-2_147_483_649)).len(), 9);
}

#[test]
fn string_length_tiers_pick_the_narrowest_marker() {
    let at_fixstr_max = encode(&Payload::str(&vec![b'a'; 31]));
    assert_eq!(at_fixstr_max[0], 0xbf);

    let needs_str8 = encode(&Payload::str(&vec![b'a'; 32]));
    assert_eq!(needs_str8[0], 0xd9);

    let needs_str16 = encode(&Payload::str(&vec![b'a'; 256]));
    assert_eq!(needs_str16[0], 0xda);

    let needs_str32 = encode(&Payload::str(&vec![b'a'; 70_000]));
    assert_eq!(needs_str32[0], 0xdb);
}

#[test]
fn array_and_map_length_tiers_pick_the_narrowest_marker() {
    let mut arr15 = Payload::array(15);
    for i in 0..15 {
        arr15.set_arr_element(i, Payload::nil()).unwrap();
    }
    assert_eq!(encode(&arr15)[0], 0x9f);

    let mut arr16 = Payload::array(16);
    for i in 0..16 {
        arr16.set_arr_element(i, Payload::nil()).unwrap();
    }
    assert_eq!(encode(&arr16)[0], 0xdc);

    let mut map15 = Payload::map();
    for i in 0..15 {
        map15
            .map_put(format!("k{i}").as_bytes(), Payload::nil())
            .unwrap();
    }
    assert_eq!(encode(&map15)[0], 0x8f);

    let mut map16 = Payload::map();
    for i in 0..16 {
        map16
            .map_put(format!("k{i}").as_bytes(), Payload::nil())
            .unwrap();
    }
    assert_eq!(encode(&map16)[0], 0xde);
}

#[test]
fn float_policy_narrows_by_magnitude_not_by_exact_round_trip() {
    // Exactly representable in f32 -> narrows to 5 bytes.
    assert_eq!(encode(&Payload::float(0.0)).len(), 5);
    assert_eq!(encode(&Payload::float(0.5)).len(), 5);
    assert_eq!(encode(&Payload::float(1.0)).len(), 5);
    // Magnitude fits f32's range even though narrowing loses precision
    // (3.14... -> 3.140000104904175 widened back) -> still 5 bytes, per
    // spec.md §4.4's magnitude-based rule rather than a round-trip check.
    assert_eq!(encode(&Payload::float(core::f64::consts::PI)).len(), 5);
    // Magnitude exceeds f32::MAX -> needs full f64 precision -> 9 bytes.
    assert_eq!(
        encode(&Payload::float(1.7976931348623157e+308)).len(),
        9
    );
    // Subnormal magnitude below f32::MIN_POSITIVE -> 9 bytes.
    assert_eq!(encode(&Payload::float(1e-310)).len(), 9);
}

#[test]
fn marker_byte_roundtrips_through_decode_regardless_of_origin() {
    // However a given value arrives, its marker byte identifies the same
    // category on the way back out.
    for v in [0u64, 42, 127] {
        let bytes = encode(&Payload::uint(v));
        assert_eq!(decode_from_slice(&bytes).unwrap(), Payload::Uint(v));
    }
    for v in [-1i64, -32, i64::MIN] {
        let bytes = encode(&Payload::int(v));
        assert_eq!(decode_from_slice(&bytes).unwrap(), Payload::Int(v));
    }
}
