use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use super::{Precision, Scanner, TemporalError};

/// Calendar date with year, month or day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    year: u16,
    month: Option<u8>,
    day: Option<u8>,
}

impl Date {
    pub fn from_year(year: u16) -> Result<Self, TemporalError> {
        check_year(year)?;
        Ok(Self {
            year,
            month: None,
            day: None,
        })
    }

    pub fn from_year_month(year: u16, month: u8) -> Result<Self, TemporalError> {
        check_year(year)?;
        check_month(month)?;
        Ok(Self {
            year,
            month: Some(month),
            day: None,
        })
    }

    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self, TemporalError> {
        check_year(year)?;
        check_month(month)?;
        if NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32).is_none() {
            return Err(TemporalError::InvalidDay { year, month, day });
        }
        Ok(Self {
            year,
            month: Some(month),
            day: Some(day),
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> Option<u8> {
        self.month
    }

    pub fn day(&self) -> Option<u8> {
        self.day
    }

    pub fn precision(&self) -> Precision {
        match (self.month, self.day) {
            (_, Some(_)) => Precision::Day,
            (Some(_), None) => Precision::Month,
            (None, None) => Precision::Year,
        }
    }

    /// The chrono date, when the value has day precision.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month? as u32, self.day? as u32)
    }

    pub(super) fn scan(scanner: &mut Scanner<'_>) -> Result<Self, TemporalError> {
        let year = scanner.digits(4, "four-digit year")? as u16;
        if !scanner.eat(b'-') {
            return Date::from_year(year);
        }
        let month = scanner.digits(2, "two-digit month")? as u8;
        if !scanner.eat(b'-') {
            return Date::from_year_month(year, month);
        }
        let day = scanner.digits(2, "two-digit day")? as u8;
        Date::from_ymd(year, month, day)
    }
}

fn check_year(year: u16) -> Result<(), TemporalError> {
    if (1..=9999).contains(&year) {
        Ok(())
    } else {
        Err(TemporalError::OutOfRange {
            field: "year",
            value: year as u32,
        })
    }
}

fn check_month(month: u8) -> Result<(), TemporalError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(TemporalError::OutOfRange {
            field: "month",
            value: month as u32,
        })
    }
}

impl FromStr for Date {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scanner = Scanner::new(s);
        let date = Date::scan(&mut scanner)?;
        scanner.finish()?;
        Ok(date)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{month:02}")?;
        }
        if let Some(day) = self.day {
            write!(f, "-{day:02}")?;
        }
        Ok(())
    }
}

impl TryFrom<NaiveDate> for Date {
    type Error = TemporalError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        let year = u16::try_from(date.year()).map_err(|_| TemporalError::OutOfRange {
            field: "year",
            value: date.year().unsigned_abs(),
        })?;
        Date::from_ymd(year, date.month() as u8, date.day() as u8)
    }
}
