//! Calendar time-bucketing.
//!
//! Buckets are calendar periods (a day, a month, a year), never rolling windows. Totals are
//! keyed by the first day of their period in an ordered map, so the output is always
//! chronological no matter in which order the records arrive. Periods without records are
//! left out.

use crate::errors::{Error, Result};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Time-bucketing resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar day, keyed `YYYY-MM-DD`
    Day,
    /// One bucket per calendar month, keyed `YYYY-MM`
    #[default]
    Month,
    /// One bucket per calendar year, keyed `YYYY`
    Year,
}

impl Granularity {
    /// First day of the period containing `date`.
    #[must_use]
    pub fn period_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Month => date.with_day(1).unwrap_or(date),
            Self::Year => date.with_ordinal(1).unwrap_or(date),
        }
    }

    /// Period key for `date`.
    #[must_use]
    pub fn period_key(self, date: NaiveDate) -> String {
        match self {
            Self::Day => date.format("%Y-%m-%d").to_string(),
            Self::Month => date.format("%Y-%m").to_string(),
            Self::Year => date.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "month" | "monthly" => Ok(Self::Month),
            "year" | "yearly" => Ok(Self::Year),
            _ => Err(Error::InvalidGranularity {
                value: s.to_string(),
            }),
        }
    }
}

/// Inclusive date range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates the range `[start, end]`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRange`] when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `days` days ending on `today`, both inclusive. Zero days is just `today`.
    #[must_use]
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let start = today
            .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// From the first of `today`'s month up to `today`.
    #[must_use]
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: Granularity::Month.period_start(today),
            end: today,
        }
    }

    /// From January 1st of `today`'s year up to `today`.
    #[must_use]
    pub fn year_to_date(today: NaiveDate) -> Self {
        Self {
            start: Granularity::Year.period_start(today),
            end: today,
        }
    }

    /// The `months` calendar months ending with `today`'s month.
    #[must_use]
    pub fn trailing_months(today: NaiveDate, months: u32) -> Self {
        let this_month = Granularity::Month.period_start(today);
        let start = this_month
            .checked_sub_months(Months::new(months.saturating_sub(1)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns `true` if `date` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Total for one period.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotal {
    /// Period key (`YYYY-MM-DD`, `YYYY-MM` or `YYYY`)
    pub period: String,
    /// First day of the period
    pub period_start: NaiveDate,
    /// Sum of the bucketed values
    pub total: f64,
    /// Number of records in the bucket
    pub count: usize,
}

/// Buckets `records` by calendar period.
///
/// `date_of` extracts the date used for bucketing and `value_of` the value summed into the
/// bucket. The result is sorted by period start, ascending.
pub fn bucket<T, D, V>(records: &[T], granularity: Granularity, date_of: D, value_of: V) -> Vec<PeriodTotal>
where
    D: Fn(&T) -> NaiveDate,
    V: Fn(&T) -> f64,
{
    // Sort by the underlying date first so each bucket accumulates in date order
    let mut ordered: Vec<&T> = records.iter().collect();
    ordered.sort_by_key(|r| date_of(*r));

    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for record in ordered {
        let entry = buckets
            .entry(granularity.period_start(date_of(record)))
            .or_insert((0.0, 0));
        entry.0 += value_of(record);
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(period_start, (total, count))| PeriodTotal {
            period: granularity.period_key(period_start),
            period_start,
            total,
            count,
        })
        .collect()
}

/// Sums `value_of` per key, returning `(key, total, count)` sorted by key.
pub fn group_by_key<T, K, KF, V>(records: &[T], key_of: KF, value_of: V) -> Vec<(K, f64, usize)>
where
    K: Ord,
    KF: Fn(&T) -> K,
    V: Fn(&T) -> f64,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(key_of(record)).or_insert((0.0, 0));
        entry.0 += value_of(record);
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(key, (total, count))| (key, total, count))
        .collect()
}
