use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};

use super::{Fraction, Precision, Scanner, TemporalError, TzOffset};

/// Time of day with hour to fractional-second precision and an optional
/// offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Time {
    hour: u8,
    minute: Option<u8>,
    second: Option<u8>,
    fraction: Option<Fraction>,
    offset: Option<TzOffset>,
}

impl Time {
    pub fn from_hour(hour: u8) -> Result<Self, TemporalError> {
        check("hour", hour, 23)?;
        Ok(Self {
            hour,
            minute: None,
            second: None,
            fraction: None,
            offset: None,
        })
    }

    pub fn from_hm(hour: u8, minute: u8) -> Result<Self, TemporalError> {
        check("minute", minute, 59)?;
        Ok(Self {
            minute: Some(minute),
            ..Self::from_hour(hour)?
        })
    }

    pub fn from_hms(hour: u8, minute: u8, second: u8) -> Result<Self, TemporalError> {
        check("second", second, 59)?;
        Ok(Self {
            second: Some(second),
            ..Self::from_hm(hour, minute)?
        })
    }

    /// Adds fractional seconds; the value must already have second precision.
    pub fn with_fraction(self, fraction: Fraction) -> Result<Self, TemporalError> {
        if self.second.is_none() {
            return Err(TemporalError::FractionWithoutSeconds);
        }
        Ok(Self {
            fraction: Some(fraction),
            ..self
        })
    }

    pub fn with_offset(self, offset: TzOffset) -> Self {
        Self {
            offset: Some(offset),
            ..self
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> Option<u8> {
        self.minute
    }

    pub fn second(&self) -> Option<u8> {
        self.second
    }

    pub fn fraction(&self) -> Option<Fraction> {
        self.fraction
    }

    pub fn offset(&self) -> Option<TzOffset> {
        self.offset
    }

    pub fn precision(&self) -> Precision {
        if self.fraction.is_some() {
            Precision::Fraction
        } else if self.second.is_some() {
            Precision::Second
        } else if self.minute.is_some() {
            Precision::Minute
        } else {
            Precision::Hour
        }
    }

    /// The chrono time, when the value has at least second precision.
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        let nanos = self.fraction.map_or(0, |f| f.nanos());
        NaiveTime::from_hms_nano_opt(
            self.hour as u32,
            self.minute? as u32,
            self.second? as u32,
            nanos,
        )
    }

    pub(super) fn scan(scanner: &mut Scanner<'_>) -> Result<Self, TemporalError> {
        let hour = scanner.digits(2, "two-digit hour")? as u8;
        let mut time = Time::from_hour(hour)?;
        if scanner.eat(b':') {
            let minute = scanner.digits(2, "two-digit minute")? as u8;
            time = Time::from_hm(hour, minute)?;
            if scanner.eat(b':') {
                let second = scanner.digits(2, "two-digit second")? as u8;
                time = Time::from_hms(hour, minute, second)?;
                if scanner.eat(b'.') {
                    time.fraction = Some(scanner.fraction()?);
                }
            }
        }
        time.offset = scanner.offset()?;
        Ok(time)
    }
}

fn check(field: &'static str, value: u8, max: u8) -> Result<(), TemporalError> {
    if value <= max {
        Ok(())
    } else {
        Err(TemporalError::OutOfRange {
            field,
            value: value as u32,
        })
    }
}

impl FromStr for Time {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scanner = Scanner::new(s);
        let time = Time::scan(&mut scanner)?;
        scanner.finish()?;
        Ok(time)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.hour)?;
        if let Some(minute) = self.minute {
            write!(f, ":{minute:02}")?;
        }
        if let Some(second) = self.second {
            write!(f, ":{second:02}")?;
        }
        if let Some(fraction) = self.fraction {
            write!(f, ".{fraction}")?;
        }
        if let Some(offset) = self.offset {
            write!(f, "{offset}")?;
        }
        Ok(())
    }
}

impl TryFrom<NaiveTime> for Time {
    type Error = TemporalError;

    /// Leap-second representations (`nanosecond() >= 1e9`) are rejected.
    fn try_from(time: NaiveTime) -> Result<Self, Self::Error> {
        if time.nanosecond() >= 1_000_000_000 {
            return Err(TemporalError::OutOfRange {
                field: "second",
                value: 60,
            });
        }
        let base = Time::from_hms(time.hour() as u8, time.minute() as u8, time.second() as u8)?;
        Ok(Self {
            fraction: Fraction::from_nanos(time.nanosecond()),
            ..base
        })
    }
}
