use typed_pack::{
    decode, decode_with_consumed, encode, Date, DateTime, Decimal, Int, MsgPackDecoder, Time,
    Value,
};

fn obj(fields: &[(&str, Value)]) -> Value {
    Value::Map(
        fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect(),
    )
}

fn roundtrip(value: &Value) -> Value {
    let bytes = encode(value).unwrap();
    decode(&bytes).unwrap()
}

#[test]
fn nested_record_roundtrip() {
    let birth_date: Date = "1972-11-30".parse().unwrap();
    let source = obj(&[
        ("name", "Ewout".into()),
        ("active", true.into()),
        ("nested", obj(&[("data", "Wednesday".into())])),
        (
            "identifier",
            Value::Array(vec![Value::Decimal(Decimal::from(104231)), 2i32.into()]),
        ),
        ("birthDate", birth_date.into()),
        ("contact", Value::Array(vec![obj(&[("name", "Marleen".into())])])),
    ]);

    let parsed = roundtrip(&source);
    assert_eq!(parsed["name"].as_str(), Some("Ewout"));
    assert_eq!(parsed["contact"][0]["name"].as_str(), Some("Marleen"));
    assert_eq!(parsed["nested"]["data"].as_str(), Some("Wednesday"));
    assert_eq!(parsed["identifier"][0], Value::Decimal(Decimal::from(104231)));
    assert_eq!(parsed["identifier"][1].as_int(), Some(Int::I32(2)));
    assert_eq!(parsed["birthDate"], Value::Date(birth_date));
    assert_eq!(parsed["active"].as_bool(), Some(true));
    assert_eq!(parsed, source);
}

#[test]
fn map_order_is_preserved() {
    let source = obj(&[("z", 1u8.into()), ("a", 2u8.into()), ("m", 3u8.into())]);
    let parsed = roundtrip(&source);
    let keys: Vec<_> = parsed
        .as_map()
        .unwrap()
        .iter()
        .map(|(k, _)| k.as_str())
        .collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[test]
fn empty_containers_matrix() {
    for value in [
        Value::Array(vec![]),
        Value::Map(vec![]),
        Value::Str(String::new()),
        Value::Bytes(vec![]),
        obj(&[("inner", Value::Array(vec![]))]),
    ] {
        assert_eq!(roundtrip(&value), value);
    }
}

#[test]
fn scalar_roundtrip_matrix() {
    let cases = vec![
        Value::Null,
        Value::Bool(false),
        Value::from(i64::MIN),
        Value::from(u64::MAX),
        Value::Float32(-0.25),
        Value::Float64(std::f64::consts::PI),
        Value::Float64(f64::INFINITY),
        Value::from("héllo wörld"),
        Value::Bytes((0..=255).collect()),
    ];
    for value in cases {
        assert_eq!(roundtrip(&value), value, "{value:?}");
    }
    assert!(matches!(roundtrip(&Value::Float64(f64::NAN)), Value::Float64(f) if f.is_nan()));
}

#[test]
fn extension_roundtrip_matrix() {
    let decimals = ["0", "-0.5", "104231.00", "79228162514264337593543950335", "0.0000000000000000000000000001"];
    for text in decimals {
        let value = Value::Decimal(text.parse().unwrap());
        let parsed = roundtrip(&value);
        assert_eq!(parsed, value, "{text}");
        assert_eq!(parsed.as_decimal().unwrap().to_string(), text);
    }

    for text in ["0001", "1972-11", "2024-02-29"] {
        let value = Value::Date(text.parse().unwrap());
        assert_eq!(roundtrip(&value), value, "{text}");
    }

    for text in [
        "2015",
        "2015-02-07",
        "2015-02-07T13",
        "2015-02-07T13:28:17.239+02:00",
        "2015-02-07T13:28:17Z",
        "2015-02-07T13:28:17+00:00",
        "9999-12-31T23:59:59.999999999-14:00",
        "2015-02-07T13:28:17-00:30",
    ] {
        let value = Value::DateTime(text.parse::<DateTime>().unwrap());
        let parsed = roundtrip(&value);
        assert_eq!(parsed, value, "{text}");
        if let Value::DateTime(dt) = parsed {
            assert_eq!(dt.to_string(), text);
        }
    }

    for text in ["00", "23:59", "12:00:00", "12:00:00.5", "12:00:00.500Z", "10:00-00:30"] {
        let value = Value::Time(text.parse::<Time>().unwrap());
        let parsed = roundtrip(&value);
        assert_eq!(parsed, value, "{text}");
        if let Value::Time(time) = parsed {
            assert_eq!(time.to_string(), text);
        }
    }
}

#[test]
fn offsets_west_of_utc_under_an_hour() {
    let west = chrono::FixedOffset::west_opt(30 * 60).unwrap();
    let instant = chrono::DateTime::parse_from_rfc3339("1972-11-30T08:15:00Z")
        .unwrap()
        .with_timezone(&west);
    let value = Value::DateTime(DateTime::try_from(instant).unwrap());
    let parsed = roundtrip(&value);
    assert_eq!(parsed, value);
    if let Value::DateTime(dt) = parsed {
        assert_eq!(dt.offset().map(|o| o.total_minutes()), Some(-30));
        assert_eq!(dt.to_chrono(), Some(instant));
    }
}

#[test]
fn trailing_bytes_are_ignored() {
    let mut bytes = encode(&Value::from("first")).unwrap();
    let first_len = bytes.len();
    bytes.extend(encode(&Value::from(2u8)).unwrap());
    bytes.push(0xc1);

    assert_eq!(decode(&bytes).unwrap(), Value::from("first"));

    let (value, consumed) = decode_with_consumed(&bytes).unwrap();
    assert_eq!(value, Value::from("first"));
    assert_eq!(consumed, first_len);

    let (value, consumed) = decode_with_consumed(&bytes[first_len..]).unwrap();
    assert_eq!(value, Value::from(2u8));
    assert_eq!(consumed, 1);
}

#[test]
fn concatenated_stream_walk() {
    let values = vec![
        Value::from(1u8),
        obj(&[("k", Value::Decimal(Decimal::new(15, 1)))]),
        Value::Time("10:00".parse().unwrap()),
    ];
    let mut stream = Vec::new();
    for value in &values {
        stream.extend(encode(value).unwrap());
    }

    let decoder = MsgPackDecoder::new();
    let mut offset = 0;
    let mut seen = Vec::new();
    while offset < stream.len() {
        let (value, consumed) = decoder.decode_with_consumed(&stream[offset..]).unwrap();
        seen.push(value);
        offset += consumed;
    }
    assert_eq!(seen, values);
}

#[test]
fn duplicate_keys_are_appended_in_order() {
    let source = Value::Map(vec![
        ("a".into(), 1u8.into()),
        ("a".into(), 2u8.into()),
    ]);
    let parsed = roundtrip(&source);
    assert_eq!(parsed, source);
    assert_eq!(parsed["a"], Value::from(1u8));
}

#[test]
fn deep_nesting_without_limit() {
    let mut value = Value::Null;
    for _ in 0..200 {
        value = Value::Array(vec![value]);
    }
    assert_eq!(roundtrip(&value), value);
}
