use proptest::prelude::*;
use typed_pack::temporal::TzOffset;
use typed_pack::{decode_with_consumed, encode, Date, DateTime, Decimal, Time, Value};

fn arb_time() -> impl Strategy<Value = Time> {
    let offset = prop_oneof![
        Just(None),
        Just(Some(TzOffset::UTC)),
        (-TzOffset::MAX_MINUTES..=TzOffset::MAX_MINUTES)
            .prop_map(|m| Some(TzOffset::from_total_minutes(m).unwrap())),
    ];
    (0u8..24, 0u8..60, 0u8..60, offset).prop_map(|(h, m, s, off)| {
        let time = Time::from_hms(h, m, s).unwrap();
        match off {
            Some(offset) => time.with_offset(offset),
            None => time,
        }
    })
}

fn arb_date() -> impl Strategy<Value = Date> {
    (1u16..=9999, 1u8..=12, 1u8..=28).prop_map(|(y, m, d)| Date::from_ymd(y, m, d).unwrap())
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i8>().prop_map(Value::from),
        any::<u16>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        (-1e6f32..1e6).prop_map(Value::Float32),
        (-1e12f64..1e12).prop_map(Value::Float64),
        ".{0,40}".prop_map(Value::Str),
        proptest::collection::vec(any::<u8>(), 0..300).prop_map(Value::Bytes),
        (any::<i64>(), 0u32..=18).prop_map(|(m, s)| Value::Decimal(Decimal::new(m, s))),
        arb_date().prop_map(Value::Date),
        (arb_date(), proptest::option::of(arb_time())).prop_map(|(d, t)| {
            Value::DateTime(DateTime::new(d, t).unwrap())
        }),
        arb_time().prop_map(Value::Time),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..20).prop_map(Value::Array),
            proptest::collection::vec(("[a-z]{0,6}", inner), 0..20).prop_map(Value::Map),
        ]
    })
}

proptest! {
    #[test]
    fn prop_encode_decode_identity(value in arb_value()) {
        let bytes = encode(&value).unwrap();
        let (parsed, consumed) = decode_with_consumed(&bytes).unwrap();
        prop_assert_eq!(consumed, bytes.len());
        prop_assert_eq!(parsed, value);
    }

    #[test]
    fn prop_encoding_is_deterministic(value in arb_value()) {
        prop_assert_eq!(encode(&value).unwrap(), encode(&value).unwrap());
    }

    #[test]
    fn prop_integer_wire_size_is_minimal(num in any::<i64>()) {
        let bytes = encode(&Value::from(num)).unwrap();
        let expected = match num {
            -32..=127 => 1,
            -128..=255 => 2,
            -32768..=65535 => 3,
            n if n >= i32::MIN as i64 && n <= u32::MAX as i64 => 5,
            _ => 9,
        };
        prop_assert_eq!(bytes.len(), expected);
    }

    #[test]
    fn prop_truncation_never_panics(value in arb_value(), cut in any::<prop::sample::Index>()) {
        let bytes = encode(&value).unwrap();
        let end = cut.index(bytes.len());
        prop_assert!(decode_with_consumed(&bytes[..end]).is_err());
    }
}
