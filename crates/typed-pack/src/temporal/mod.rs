//! Partial-precision calendar types carried by the `Date`, `DateTime` and
//! `Time` extensions.
//!
//! All three follow the FHIR primitive grammar:
//!
//! ```text
//! date      = YYYY [ "-" MM [ "-" DD ] ]
//! time      = hh [ ":" mm [ ":" ss [ "." fraction ] ] ] [ offset ]
//! date-time = date [ "T" time ]          ; "T" only after a full date
//! offset    = "Z" | ( "+" | "-" ) hh ":" mm
//! ```
//!
//! Parsing and formatting never consult the locale. Formatting reproduces
//! the parsed text exactly, except that a `-00:00` offset is written back as
//! `+00:00`.

mod date;
mod date_time;
mod time;

pub use date::Date;
pub use date_time::DateTime;
pub use time::Time;

use std::fmt;

use chrono::FixedOffset;
use thiserror::Error;

/// Error produced when calendar text does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemporalError {
    #[error("expected {expected} at offset {at}")]
    Syntax { expected: &'static str, at: usize },
    #[error("{field} {value} is out of range")]
    OutOfRange { field: &'static str, value: u32 },
    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[error("unexpected trailing input at offset {at}")]
    TrailingInput { at: usize },
    #[error("a time of day needs a full date")]
    TimeWithoutDay,
    #[error("fractional seconds need a seconds component")]
    FractionWithoutSeconds,
}

/// The finest component present in a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Fraction,
}

/// Fractional seconds with their written digit count.
///
/// `.5` and `.500` compare unequal so each formats back as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    value: u32,
    digits: u8,
}

impl Fraction {
    /// Builds a fraction from `value` written with `digits` digits (1..=9).
    pub fn new(value: u32, digits: u8) -> Result<Self, TemporalError> {
        if !(1..=9).contains(&digits) {
            return Err(TemporalError::OutOfRange {
                field: "fraction digits",
                value: digits as u32,
            });
        }
        if value >= 10u32.pow(digits as u32) {
            return Err(TemporalError::OutOfRange {
                field: "fraction",
                value,
            });
        }
        Ok(Self { value, digits })
    }

    /// Builds the shortest fraction equal to `nanos`, or `None` for zero.
    pub fn from_nanos(nanos: u32) -> Option<Self> {
        if nanos == 0 || nanos >= 1_000_000_000 {
            return None;
        }
        let mut value = nanos;
        let mut digits = 9u8;
        while value % 10 == 0 {
            value /= 10;
            digits -= 1;
        }
        Some(Self { value, digits })
    }

    pub fn digits(&self) -> u8 {
        self.digits
    }

    pub fn nanos(&self) -> u32 {
        self.value * 10u32.pow(9 - self.digits as u32)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.value, width = self.digits as usize)
    }
}

/// Timezone designator of a time or date-time.
///
/// Always within `±14:59`; the constructors enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TzOffset {
    /// Signed minutes east of UTC; `None` is written as `Z`.
    minutes: Option<i16>,
}

impl TzOffset {
    /// Largest accepted offset magnitude, `14:59`.
    pub const MAX_MINUTES: i16 = 14 * 60 + 59;

    pub const UTC: TzOffset = TzOffset { minutes: None };

    /// Builds `+hh:mm`, or `-hh:mm` when `negative` is set.
    pub fn hm(negative: bool, hours: u8, minutes: u8) -> Result<Self, TemporalError> {
        if hours > 14 {
            return Err(TemporalError::OutOfRange {
                field: "offset hour",
                value: hours as u32,
            });
        }
        if minutes > 59 {
            return Err(TemporalError::OutOfRange {
                field: "offset minute",
                value: minutes as u32,
            });
        }
        let total = hours as i16 * 60 + minutes as i16;
        Ok(Self {
            minutes: Some(if negative { -total } else { total }),
        })
    }

    /// Builds a numeric offset from signed minutes east of UTC.
    pub fn from_total_minutes(minutes: i16) -> Result<Self, TemporalError> {
        if minutes.unsigned_abs() > Self::MAX_MINUTES as u16 {
            return Err(TemporalError::OutOfRange {
                field: "offset minutes",
                value: minutes.unsigned_abs() as u32,
            });
        }
        Ok(Self {
            minutes: Some(minutes),
        })
    }

    pub fn is_utc(&self) -> bool {
        self.minutes.is_none()
    }

    pub fn total_minutes(&self) -> i16 {
        self.minutes.unwrap_or(0)
    }

    pub fn to_fixed_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.total_minutes() as i32 * 60)
    }

    /// Maps a chrono offset onto `±hh:mm`, dropping seconds.
    pub fn from_fixed_offset(offset: FixedOffset) -> Result<Self, TemporalError> {
        let minutes = offset.local_minus_utc() / 60;
        if minutes.abs() > Self::MAX_MINUTES as i32 {
            return Err(TemporalError::OutOfRange {
                field: "offset minutes",
                value: minutes.unsigned_abs(),
            });
        }
        Self::from_total_minutes(minutes as i16)
    }
}

impl fmt::Display for TzOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minutes {
            None => f.write_str("Z"),
            Some(m) => {
                let sign = if m < 0 { '-' } else { '+' };
                let abs = m.unsigned_abs();
                write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
            }
        }
    }
}

/// Byte cursor shared by the three grammars.
struct Scanner<'a> {
    bytes: &'a [u8],
    at: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            at: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.at).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.at += 1;
            true
        } else {
            false
        }
    }

    /// Reads exactly `count` ASCII digits.
    fn digits(&mut self, count: usize, expected: &'static str) -> Result<u32, TemporalError> {
        let end = self.at + count;
        let chunk = self
            .bytes
            .get(self.at..end)
            .filter(|chunk| chunk.iter().all(u8::is_ascii_digit))
            .ok_or(TemporalError::Syntax {
                expected,
                at: self.at,
            })?;
        let value = chunk
            .iter()
            .fold(0u32, |acc, b| acc * 10 + (b - b'0') as u32);
        self.at = end;
        Ok(value)
    }

    /// Reads one or more digits, up to nine.
    fn fraction(&mut self) -> Result<Fraction, TemporalError> {
        let start = self.at;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.at += 1;
        }
        let count = self.at - start;
        if count == 0 || count > 9 {
            self.at = start;
            return Err(TemporalError::Syntax {
                expected: "1 to 9 fraction digits",
                at: start,
            });
        }
        self.at = start;
        let value = self.digits(count, "fraction digits")?;
        Fraction::new(value, count as u8)
    }

    fn offset(&mut self) -> Result<Option<TzOffset>, TemporalError> {
        if self.eat(b'Z') {
            return Ok(Some(TzOffset::UTC));
        }
        let negative = match self.peek() {
            Some(b'+') => false,
            Some(b'-') => true,
            _ => return Ok(None),
        };
        self.at += 1;
        let hours = self.digits(2, "offset hour")?;
        if !self.eat(b':') {
            return Err(TemporalError::Syntax {
                expected: "':' in offset",
                at: self.at,
            });
        }
        let minutes = self.digits(2, "offset minute")?;
        // Both values are at most 99.
        TzOffset::hm(negative, hours as u8, minutes as u8).map(Some)
    }

    fn finish(&self) -> Result<(), TemporalError> {
        if self.at == self.bytes.len() {
            Ok(())
        } else {
            Err(TemporalError::TrailingInput { at: self.at })
        }
    }
}
