use mpwire_codec::{
    decode, decode_with_config, encode, encode_with_config, CodecConfig, CodecError, Decoder,
    Encoder, Value,
};
use proptest::prelude::*;

fn roundtrip(value: &Value) -> Value {
    let bytes = encode(value).expect("value should encode");
    let (decoded, consumed) = decode(&bytes).expect("encoded bytes should decode");
    assert_eq!(consumed, bytes.len());
    decoded
}

fn first_tag(value: impl Into<Value>) -> u8 {
    encode(&value.into()).expect("value should encode")[0]
}

fn sample_document() -> Value {
    Value::Map(vec![
        ("id".into(), 42.into()),
        ("ratio".into(), 0.75.into()),
        ("name".into(), "mpwire".into()),
        ("raw".into(), Value::Bytes(vec![0x00, 0xff, 0x80])),
        ("flags".into(), Value::Array(vec![true.into(), false.into(), Value::Nil])),
        (
            "limits".into(),
            Value::Array(vec![
                i64::MIN.into(),
                (-2_147_483_649i64).into(),
                (-33).into(),
                u64::MAX.into(),
                4_294_967_296i64.into(),
            ]),
        ),
        (7.into(), "integer key".into()),
    ])
}

#[test]
fn scalars_roundtrip() {
    let cases = [
        Value::Nil,
        Value::Bool(true),
        Value::Bool(false),
        Value::Integer(0),
        Value::Integer(-1),
        Value::Integer(i64::MIN),
        Value::Integer(i64::MAX),
        Value::UnsignedInteger(u64::MAX),
        Value::Float(0.5),
        Value::Float(-1234.5678),
        Value::Float(f64::MAX),
        Value::Float(f64::MIN_POSITIVE),
        Value::Float(f64::INFINITY),
        Value::from(""),
        Value::from("héllo"),
    ];
    for value in cases {
        assert_eq!(roundtrip(&value), value);
    }
}

#[test]
fn unsigned_variant_may_come_back_signed() {
    let decoded = roundtrip(&Value::UnsignedInteger(300));
    assert_eq!(decoded, Value::Integer(300));
    assert_eq!(decoded.as_u64(), Some(300));
}

#[test]
fn integral_float_comes_back_as_integer() {
    let decoded = roundtrip(&Value::Float(-40.0));
    assert_eq!(decoded, Value::Integer(-40));
    assert_eq!(decoded.as_f64(), Some(-40.0));
}

#[test]
fn nan_roundtrips_as_nan() {
    let decoded = roundtrip(&Value::Float(f64::NAN));
    assert!(decoded.as_f64().is_some_and(f64::is_nan));
}

#[test]
fn document_roundtrips() {
    let value = sample_document();
    assert_eq!(roundtrip(&value), value);
}

#[test]
fn nested_shapes_roundtrip() {
    let value = Value::Array(vec![
        Value::Map(vec![
            ("inner".into(), Value::Array(vec![1.into(), "two".into(), 3.5.into()])),
            (Value::Nil, Value::Map(Vec::new())),
        ]),
        Value::Array(Vec::new()),
    ]);
    assert_eq!(roundtrip(&value), value);
}

#[test]
fn integer_boundaries_select_width_class() {
    let cases: [(i64, u8); 18] = [
        (127, 0x7f),
        (128, 0xcc),
        (255, 0xcc),
        (256, 0xcd),
        (65535, 0xcd),
        (65536, 0xce),
        (4_294_967_295, 0xce),
        (4_294_967_296, 0xcf),
        (-1, 0xff),
        (-32, 0xe0),
        (-33, 0xd0),
        (-128, 0xd0),
        (-129, 0xd1),
        (-32768, 0xd1),
        (-32769, 0xd2),
        (-2_147_483_648, 0xd2),
        (-2_147_483_649, 0xd3),
        (i64::MIN, 0xd3),
    ];
    for (n, tag) in cases {
        assert_eq!(first_tag(n), tag, "integer {n}");
        assert_eq!(first_tag(n as f64), tag, "float {n}");
        assert_eq!(roundtrip(&Value::Integer(n)), Value::Integer(n));
    }
}

#[test]
fn length_boundaries_select_tag() {
    assert_eq!(first_tag("a".repeat(31)), 0xbf);
    assert_eq!(first_tag("a".repeat(32)), 0xda);
    assert_eq!(first_tag("a".repeat(65535)), 0xda);
    assert_eq!(first_tag("a".repeat(65536)), 0xdb);

    let array = |n: usize| Value::Array(vec![Value::Nil; n]);
    assert_eq!(first_tag(array(15)), 0x9f);
    assert_eq!(first_tag(array(16)), 0xdc);
    assert_eq!(first_tag(array(65535)), 0xdc);
    assert_eq!(first_tag(array(65536)), 0xdd);

    let map = |n: usize| Value::Map((0..n as i64).map(|i| (i.into(), Value::Nil)).collect());
    assert_eq!(first_tag(map(15)), 0x8f);
    assert_eq!(first_tag(map(16)), 0xde);
    assert_eq!(first_tag(map(65535)), 0xde);
    assert_eq!(first_tag(map(65536)), 0xdf);
}

#[test]
fn large_collections_roundtrip() {
    let array = Value::Array((0..70_000i64).map(Value::Integer).collect());
    let config = CodecConfig::unbounded();
    let bytes = encode_with_config(&array, config).unwrap();
    let (decoded, _) = decode_with_config(&bytes, config).unwrap();
    assert_eq!(decoded, array);
}

#[test]
fn empty_input_decodes_to_nil() {
    assert_eq!(decode(b"").unwrap(), (Value::Nil, 0));
}

#[test]
fn unknown_tag_fails() {
    assert!(matches!(
        decode(&[0xc1]),
        Err(CodecError::UnknownTag { tag: 0xc1, .. })
    ));
}

#[test]
fn truncated_uint16_fails() {
    assert!(matches!(
        decode(&[0xcd, 0x01]),
        Err(CodecError::TruncatedInput { .. })
    ));
}

#[test]
fn every_strict_prefix_of_a_document_fails() {
    let bytes = encode(&sample_document()).unwrap();
    for len in 1..bytes.len() {
        assert!(
            decode(&bytes[..len]).is_err(),
            "prefix of {len} bytes decoded"
        );
    }
}

#[test]
fn capacity_overflow_fails_without_output() {
    let config = CodecConfig {
        max_encoded_size: 64,
        ..CodecConfig::default()
    };
    let mut encoder = Encoder::with_config(config);
    let err = encoder.encode(&Value::from("z".repeat(100))).unwrap_err();
    assert!(matches!(err, CodecError::CapacityExceeded { .. }));
}

#[test]
fn default_capacity_is_one_mebibyte() {
    let just_fits = Value::Bytes(vec![0u8; 1024 * 1024 - 5]);
    assert_eq!(encode(&just_fits).unwrap().len(), 1024 * 1024);

    let too_big = Value::Bytes(vec![0u8; 1024 * 1024 - 4]);
    assert!(matches!(
        encode(&too_big),
        Err(CodecError::CapacityExceeded { .. })
    ));
}

#[test]
fn unsupported_value_is_not_nil() {
    let err = encode(&Value::Opaque("userdata".into())).unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedValueType(_)));
}

#[test]
fn decoder_walks_encoded_sequence() {
    let mut encoder = Encoder::new();
    let values = vec![sample_document(), 1.into(), Value::Nil, "tail".into()];
    let mut wire = Vec::new();
    for value in &values {
        wire.extend_from_slice(&encoder.encode(value).unwrap());
    }

    assert_eq!(Decoder::new().decode_all(&wire).unwrap(), values);
}

#[test]
fn mutated_input_never_panics() {
    let bytes = encode(&sample_document()).unwrap().to_vec();
    for i in 0..bytes.len() {
        for replacement in [0x00, 0x7f, 0xc1, 0xcf, 0xdb, 0xdd, 0xdf, 0xff] {
            let mut mutated = bytes.clone();
            mutated[i] = replacement;
            let _ = decode(&mutated);
        }
    }
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        any::<u64>().prop_map(Value::UnsignedInteger),
        any::<i32>().prop_map(|v| Value::Float(f64::from(v))),
        any::<f64>()
            .prop_filter("NaN never compares equal", |f| !f.is_nan())
            .prop_map(Value::Float),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Bytes),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 96, 20, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..20).prop_map(Value::Array),
            prop::collection::vec((inner.clone(), inner), 0..20).prop_map(Value::Map),
        ]
    })
}

/// The value a decoder hands back for `value`: integers narrow to `Integer`
/// when they fit i64 and integral floats come back as integers.
fn normalize(value: Value) -> Value {
    const U64_END: f64 = 18_446_744_073_709_551_616.0;
    const I64_MIN: f64 = -9_223_372_036_854_775_808.0;

    match value {
        Value::UnsignedInteger(v) => match i64::try_from(v) {
            Ok(v) => Value::Integer(v),
            Err(_) => Value::UnsignedInteger(v),
        },
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 => {
            if f >= 0.0 && f < U64_END {
                normalize(Value::UnsignedInteger(f as u64))
            } else if f < 0.0 && f >= I64_MIN {
                Value::Integer(f as i64)
            } else {
                Value::Float(f)
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Map(pairs) => Value::Map(
            pairs
                .into_iter()
                .map(|(key, val)| (normalize(key), normalize(val)))
                .collect(),
        ),
        other => other,
    }
}

proptest! {
    #[test]
    fn encoded_values_decode_to_their_normal_form(value in arb_value()) {
        let bytes = encode(&value).expect("generated value should encode");
        prop_assert_eq!(decode(&bytes), Ok((normalize(value), bytes.len())));
    }

    #[test]
    fn strict_prefixes_of_encoded_values_fail(
        value in arb_value(),
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = encode(&value).expect("generated value should encode");
        prop_assume!(bytes.len() > 1);
        let end = 1 + cut.index(bytes.len() - 1);
        prop_assert!(
            matches!(decode(&bytes[..end]), Err(CodecError::TruncatedInput { .. })),
            "prefix of {} bytes out of {} decoded",
            end,
            bytes.len()
        );
    }

    #[test]
    fn arbitrary_bytes_never_panic(input in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Ok((_, consumed)) = decode(&input) {
            prop_assert!(consumed <= input.len());
        }
        if let Ok(values) = Decoder::new().decode_all(&input) {
            prop_assert!(values.len() <= input.len().max(1));
        }
    }
}
