use crate::core::errors::TrackerError;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `YYYY-MM` budget period.
///
/// Ordering is chronological. Serialized as its `YYYY-MM` token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, TrackerError> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return Err(TrackerError::InvalidMonth(format!("{:04}-{:02}", year, month)));
        }
        Ok(Month { year, month })
    }

    /// Parses a `YYYY-MM` token. Anything else, including `2024-1` or
    /// `2024-13`, is rejected.
    pub fn parse(value: &str) -> Result<Self, TrackerError> {
        let invalid = || TrackerError::InvalidMonth(value.to_string());
        let (year, month) = value.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Month::new(year, month).map_err(|_| invalid())
    }

    /// The month containing today in the host's local timezone.
    pub fn current() -> Self {
        Month::of(Local::now().date_naive())
    }

    pub fn of(date: NaiveDate) -> Self {
        Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Month {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Month {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Month {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Month {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // year and month are range-checked on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// First day of the following month; month-scoped queries use
    /// `first_day() <= date < end_exclusive()`.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.next().first_day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date < self.end_exclusive()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_exclusive();
        self.first_day().iter_days().take_while(move |day| *day < end)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::parse(s)
    }
}

impl TryFrom<String> for Month {
    type Error = TrackerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Month::parse(&value)
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}
