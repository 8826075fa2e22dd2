use std::fmt;
use std::str::FromStr;

use chrono::FixedOffset;

use super::{Date, Precision, Scanner, TemporalError, Time, TzOffset};

/// Date with an optional time-of-day part.
///
/// The time part, and therefore any offset, is only allowed after a date
/// with day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTime {
    date: Date,
    time: Option<Time>,
}

impl DateTime {
    pub fn new(date: Date, time: Option<Time>) -> Result<Self, TemporalError> {
        if time.is_some() && date.precision() != Precision::Day {
            return Err(TemporalError::TimeWithoutDay);
        }
        Ok(Self { date, time })
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn time(&self) -> Option<Time> {
        self.time
    }

    pub fn offset(&self) -> Option<TzOffset> {
        self.time.and_then(|t| t.offset())
    }

    pub fn precision(&self) -> Precision {
        self.time.map_or(self.date.precision(), |t| t.precision())
    }

    /// The chrono instant, when both seconds and an offset are present.
    pub fn to_chrono(&self) -> Option<chrono::DateTime<FixedOffset>> {
        let time = self.time?;
        let offset = time.offset()?.to_fixed_offset()?;
        self.date
            .to_naive_date()?
            .and_time(time.to_naive_time()?)
            .and_local_timezone(offset)
            .single()
    }
}

impl FromStr for DateTime {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scanner = Scanner::new(s);
        let date = Date::scan(&mut scanner)?;
        let time = if scanner.eat(b'T') {
            if date.precision() != Precision::Day {
                return Err(TemporalError::TimeWithoutDay);
            }
            Some(Time::scan(&mut scanner)?)
        } else {
            None
        };
        scanner.finish()?;
        DateTime::new(date, time)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date)?;
        if let Some(time) = self.time {
            write!(f, "T{time}")?;
        }
        Ok(())
    }
}

impl From<Date> for DateTime {
    fn from(date: Date) -> Self {
        Self { date, time: None }
    }
}

impl TryFrom<chrono::DateTime<FixedOffset>> for DateTime {
    type Error = TemporalError;

    fn try_from(value: chrono::DateTime<FixedOffset>) -> Result<Self, Self::Error> {
        let date = Date::try_from(value.date_naive())?;
        let offset = TzOffset::from_fixed_offset(*value.offset())?;
        let time = Time::try_from(value.time())?.with_offset(offset);
        DateTime::new(date, Some(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_precision() {
        let cases = [
            ("2015", Precision::Year),
            ("2015-02", Precision::Month),
            ("2015-02-07", Precision::Day),
            ("2015-02-07T13", Precision::Hour),
            ("2015-02-07T13:28", Precision::Minute),
            ("2015-02-07T13:28:17Z", Precision::Second),
            ("2015-02-07T13:28:17.239+02:00", Precision::Fraction),
            ("2015-02-07T13:28:17-05:00", Precision::Second),
        ];
        for (text, precision) in cases {
            let value: DateTime = text.parse().unwrap_or_else(|e| panic!("{text}: {e}"));
            assert_eq!(value.precision(), precision, "{text}");
            assert_eq!(value.to_string(), text);
        }
    }

    #[test]
    fn time_requires_full_date() {
        assert_eq!(
            "2015-02T10:00".parse::<DateTime>(),
            Err(TemporalError::TimeWithoutDay)
        );
        let date = Date::from_year(2015).unwrap();
        let time = Time::from_hour(10).unwrap();
        assert_eq!(
            DateTime::new(date, Some(time)),
            Err(TemporalError::TimeWithoutDay)
        );
    }

    #[test]
    fn rejects_offset_without_time() {
        assert!("2015-02-07Z".parse::<DateTime>().is_err());
        assert!("2015-02-07+01:00".parse::<DateTime>().is_err());
    }

    #[test]
    fn utc_and_zero_offset_stay_distinct() {
        let z: DateTime = "2020-01-01T00:00:00Z".parse().unwrap();
        let plus: DateTime = "2020-01-01T00:00:00+00:00".parse().unwrap();
        assert_ne!(z, plus);
        assert_eq!(z.to_chrono(), plus.to_chrono());
    }

    #[test]
    fn chrono_round_trip() {
        let instant = chrono::DateTime::parse_from_rfc3339("1972-11-30T08:15:00.5+01:00").unwrap();
        let value = DateTime::try_from(instant).unwrap();
        assert_eq!(value.to_string(), "1972-11-30T08:15:00.5+01:00");
        assert_eq!(value.to_chrono(), Some(instant));
        let no_offset: DateTime = "1972-11-30T08:15:00".parse().unwrap();
        assert_eq!(no_offset.to_chrono(), None);
    }
}
