use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Local, LocalResult, Months, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};

/// Symbolic lookback window for a historical query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
}

/// Absolute query window in epoch seconds, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn span_seconds(&self) -> i64 {
        self.end - self.start
    }
}

enum Lookback {
    Days(u64),
    Months(u32),
    StartOfYear,
}

impl Period {
    pub const ALL: [Period; 10] = [
        Period::OneDay,
        Period::FiveDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
        Period::TenYears,
        Period::YearToDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::YearToDate => "ytd",
        }
    }

    fn lookback(&self) -> Lookback {
        match self {
            Period::OneDay => Lookback::Days(1),
            Period::FiveDays => Lookback::Days(5),
            Period::OneMonth => Lookback::Months(1),
            Period::ThreeMonths => Lookback::Months(3),
            Period::SixMonths => Lookback::Months(6),
            Period::OneYear => Lookback::Months(12),
            Period::TwoYears => Lookback::Months(24),
            Period::FiveYears => Lookback::Months(60),
            Period::TenYears => Lookback::Months(120),
            Period::YearToDate => Lookback::StartOfYear,
        }
    }

    /// Resolve against the current wall clock.
    pub fn resolve(&self) -> Result<TimeRange> {
        self.resolve_at(Local::now())
    }

    /// Resolve against `now`, stepping back in calendar units on the local clock.
    ///
    /// Month and year steps land on the same day of month when it exists and clamp to
    /// the month's last day otherwise (31 March minus one month is 29 February in a
    /// leap year). Year-to-date starts at 1 January 00:00:00 local time.
    pub fn resolve_at(&self, now: DateTime<Local>) -> Result<TimeRange> {
        let naive_now = now.naive_local();
        let shifted = match self.lookback() {
            Lookback::Days(days) => naive_now.checked_sub_days(Days::new(days)),
            Lookback::Months(months) => naive_now.checked_sub_months(Months::new(months)),
            Lookback::StartOfYear => {
                NaiveDate::from_ymd_opt(now.year(), 1, 1).and_then(|date| date.and_hms_opt(0, 0, 0))
            }
        }
        .ok_or_else(|| {
            QuoteError::InvalidInput(format!("period {} reaches outside the calendar", self))
        })?;

        let start = to_local(shifted)?.timestamp();
        let end = now.timestamp();

        Ok(TimeRange {
            start: start.min(end),
            end,
        })
    }
}

fn to_local(naive: NaiveDateTime) -> Result<DateTime<Local>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(first, _) => Ok(first),
        // Wall-clock time skipped by a DST jump; the first instant after the gap.
        LocalResult::None => Local
            .from_local_datetime(&(naive + chrono::Duration::hours(1)))
            .earliest()
            .ok_or_else(|| {
                QuoteError::message(format!("failed to resolve local time for {}", naive))
            }),
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = QuoteError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let token = value.trim();
        Period::ALL
            .iter()
            .copied()
            .find(|period| period.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| QuoteError::InvalidInput(format!("unknown period `{token}`")))
    }
}
