use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::{ClientError, ClientResult};

/// A reporting cycle: one calendar month of one calendar year.
///
/// Field order makes the derived `Ord` chronological, so periods can key a
/// `BTreeMap` directly and iterate oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month == 0 || month > 12 {
            return None;
        }
        Some(Self { year, month })
    }

    pub fn of_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn of_datetime(timestamp: &NaiveDateTime) -> Self {
        Self::of_date(timestamp.date())
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    /// Zero-based calendar month, used for year-agnostic bucketing.
    pub const fn month_index(self) -> usize {
        (self.month - 1) as usize
    }

    pub fn key(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub const fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(self, timestamp: &NaiveDateTime) -> bool {
        timestamp.year() == self.year && timestamp.month() == self.month
    }

    /// Parses a stored `YYYY-MM` key. Returns `None` for anything else.
    pub fn from_key(value: &str) -> Option<Self> {
        if !looks_like_period_key(value) {
            return None;
        }
        let year = value[0..4].parse::<i32>().ok()?;
        let month = value[5..7].parse::<u32>().ok()?;
        Self::new(year, month)
    }

    /// Parses user input, reporting failures against `command` for help hints.
    pub fn parse(value: &str, command: &str) -> ClientResult<Self> {
        Self::from_key(value.trim()).ok_or_else(|| {
            ClientError::invalid_argument_for_command(
                &format!("`period` must use YYYY-MM format with a real month; got `{value}`."),
                Some(command),
            )
        })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

fn looks_like_period_key(value: &str) -> bool {
    if value.len() != 7 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' {
        return false;
    }
    [0usize, 1, 2, 3, 5, 6]
        .iter()
        .all(|index| bytes[*index].is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::Period;

    fn period(year: i32, month: u32) -> Period {
        match Period::new(year, month) {
            Some(value) => value,
            None => panic!("invalid test period {year}-{month}"),
        }
    }

    #[test]
    fn previous_wraps_january_into_prior_december() {
        assert_eq!(period(2024, 1).previous(), period(2023, 12));
        assert_eq!(period(2024, 7).previous(), period(2024, 6));
        assert_eq!(period(2023, 12).next(), period(2024, 1));
    }

    #[test]
    fn ordering_is_chronological_across_years() {
        let mut periods = vec![period(2024, 2), period(2023, 12), period(2024, 1)];
        periods.sort();
        assert_eq!(
            periods,
            vec![period(2023, 12), period(2024, 1), period(2024, 2)]
        );
    }

    #[test]
    fn key_round_trips_and_rejects_invalid_months() {
        assert_eq!(period(2024, 3).key(), "2024-03");
        assert_eq!(Period::from_key("2024-03"), Some(period(2024, 3)));
        assert_eq!(Period::from_key("2024-13"), None);
        assert_eq!(Period::from_key("2024-00"), None);
        assert_eq!(Period::from_key("2024/03"), None);
        assert!(Period::new(2024, 0).is_none());
    }

    #[test]
    fn parse_reports_invalid_argument_with_command_hint() {
        let result = Period::parse("March", "budget");
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_argument");
            assert!(error.message.contains("YYYY-MM"));
        }
    }

    #[test]
    fn contains_matches_only_same_calendar_month() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).and_then(|d| d.and_hms_opt(23, 59, 0));
        assert!(date.is_some());
        if let Some(timestamp) = date {
            assert!(period(2024, 1).contains(&timestamp));
            assert!(!period(2023, 1).contains(&timestamp));
            assert!(!period(2024, 2).contains(&timestamp));
            assert_eq!(Period::of_datetime(&timestamp), period(2024, 1));
        }
    }
}
