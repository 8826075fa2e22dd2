//! Extension type table: the four logical scalars carried as MessagePack ext
//! blocks, and their text payloads.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::msgpack::DecodeError;
use crate::temporal::{Date, DateTime, Time};
use crate::Value;

/// Ext type codes understood by the codec. Any other code fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum ExtType {
    Decimal = 1,
    Date = 2,
    DateTime = 3,
    Time = 4,
}

impl ExtType {
    pub fn code(self) -> i8 {
        self as i8
    }

    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            1 => Some(ExtType::Decimal),
            2 => Some(ExtType::Date),
            3 => Some(ExtType::DateTime),
            4 => Some(ExtType::Time),
            _ => None,
        }
    }
}

impl fmt::Display for ExtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtType::Decimal => "decimal",
            ExtType::Date => "date",
            ExtType::DateTime => "datetime",
            ExtType::Time => "time",
        })
    }
}

/// Canonical text for an extension scalar, or `None` for any other variant.
///
/// Decimal text uses `.` as the separator, no grouping and no exponent, and
/// keeps trailing zeros of the scale (`104231.00`).
pub fn format_ext(value: &Value) -> Option<(ExtType, String)> {
    match value {
        Value::Decimal(d) => Some((ExtType::Decimal, d.to_string())),
        Value::Date(d) => Some((ExtType::Date, d.to_string())),
        Value::DateTime(d) => Some((ExtType::DateTime, d.to_string())),
        Value::Time(t) => Some((ExtType::Time, t.to_string())),
        _ => None,
    }
}

/// Parses an ext payload back into its scalar.
pub fn parse_ext(ext: ExtType, payload: &[u8]) -> Result<Value, DecodeError> {
    let text = std::str::from_utf8(payload).map_err(|e| DecodeError::TextParse {
        ext,
        text: String::from_utf8_lossy(payload).into_owned(),
        reason: e.to_string(),
    })?;
    let fail = |reason: String| DecodeError::TextParse {
        ext,
        text: text.to_owned(),
        reason,
    };
    match ext {
        ExtType::Decimal => parse_decimal(text).map(Value::Decimal).map_err(fail),
        ExtType::Date => Date::from_str(text)
            .map(Value::Date)
            .map_err(|e| fail(e.to_string())),
        ExtType::DateTime => DateTime::from_str(text)
            .map(Value::DateTime)
            .map_err(|e| fail(e.to_string())),
        ExtType::Time => Time::from_str(text)
            .map(Value::Time)
            .map_err(|e| fail(e.to_string())),
    }
}

/// Accepts plain and exponent notation. Values that do not fit exactly are
/// rejected, never rounded.
fn parse_decimal(text: &str) -> Result<Decimal, String> {
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).map_err(|e| e.to_string())
    } else {
        Decimal::from_str_exact(text).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        for (ext, code) in [
            (ExtType::Decimal, 1),
            (ExtType::Date, 2),
            (ExtType::DateTime, 3),
            (ExtType::Time, 4),
        ] {
            assert_eq!(ext.code(), code);
            assert_eq!(ExtType::from_code(code), Some(ext));
        }
        assert_eq!(ExtType::from_code(0), None);
        assert_eq!(ExtType::from_code(-1), None);
        assert_eq!(ExtType::from_code(99), None);
    }

    #[test]
    fn decimal_text_keeps_scale() {
        let d = Decimal::from_str_exact("104231.00").unwrap();
        let (ext, text) = format_ext(&Value::Decimal(d)).unwrap();
        assert_eq!(ext, ExtType::Decimal);
        assert_eq!(text, "104231.00");
        let back = parse_ext(ext, text.as_bytes()).unwrap();
        assert_eq!(back.as_decimal().map(|d| d.scale()), Some(2));
    }

    #[test]
    fn decimal_accepts_exponent_and_sign() {
        assert_eq!(
            parse_ext(ExtType::Decimal, b"1.5e3").unwrap(),
            Value::Decimal(Decimal::from(1500))
        );
        assert_eq!(
            parse_ext(ExtType::Decimal, b"-0.25").unwrap(),
            Value::Decimal(Decimal::new(-25, 2))
        );
    }

    #[test]
    fn bad_text_names_the_type() {
        let err = parse_ext(ExtType::Decimal, b"12,5").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TextParse { ext: ExtType::Decimal, ref text, .. } if text == "12,5"
        ));
        let err = parse_ext(ExtType::Date, b"2015-13-01").unwrap_err();
        assert!(matches!(err, DecodeError::TextParse { ext: ExtType::Date, .. }));
        let err = parse_ext(ExtType::Time, &[0xff]).unwrap_err();
        assert!(matches!(err, DecodeError::TextParse { ext: ExtType::Time, .. }));
    }

    #[test]
    fn non_extension_values_have_no_text() {
        assert_eq!(format_ext(&Value::Null), None);
        assert_eq!(format_ext(&Value::Str("1.0".into())), None);
    }
}
