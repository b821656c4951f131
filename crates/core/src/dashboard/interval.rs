//! Calendar intervals and the bucket grid behind the dashboard time series.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::dashboard_errors::DashboardError;
use crate::utils::time_utils::{previous_day, DateTimeRange};

/// Number of buckets in the default window when no start date is given.
pub const DEFAULT_BUCKET_COUNT: u32 = 6;

/// Bucket granularity of the new-assets series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Day,
    Week,
    #[default]
    Month,
}

impl Interval {
    /// Parses a query value, falling back to `Month` for anything unknown.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("day") => Interval::Day,
            Some("week") => Interval::Week,
            Some("month") => Interval::Month,
            _ => Interval::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Day => "day",
            Interval::Week => "week",
            Interval::Month => "month",
        }
    }

    /// Floors a date to the start of its bucket: the day itself, the Monday
    /// of its week, or the first of its month.
    pub fn floor(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Interval::Day => date,
            Interval::Week => {
                let offset = date.weekday().num_days_from_monday() as u64;
                date.checked_sub_days(Days::new(offset)).unwrap_or(date)
            }
            Interval::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Moves `date` by `amount` intervals (negative moves backwards).
    ///
    /// Returns `None` when the result leaves chrono's representable range.
    pub fn shift(&self, date: NaiveDate, amount: i64) -> Option<NaiveDate> {
        let magnitude = amount.unsigned_abs();
        match self {
            Interval::Day => shift_days(date, amount, magnitude),
            Interval::Week => shift_days(date, amount, magnitude.checked_mul(7)?),
            Interval::Month => {
                let months = Months::new(u32::try_from(magnitude).ok()?);
                if amount >= 0 {
                    date.checked_add_months(months)
                } else {
                    date.checked_sub_months(months)
                }
            }
        }
    }

    /// Bucket label: `YYYY-MM` for months, `YYYY-MM-DD` otherwise.
    pub fn key(&self, date: NaiveDate) -> String {
        match self {
            Interval::Month => date.format("%Y-%m").to_string(),
            Interval::Day | Interval::Week => date.format("%Y-%m-%d").to_string(),
        }
    }
}

fn shift_days(date: NaiveDate, amount: i64, days: u64) -> Option<NaiveDate> {
    if amount >= 0 {
        date.checked_add_days(Days::new(days))
    } else {
        date.checked_sub_days(Days::new(days))
    }
}

/// Parses an ISO date or date-time query value. Unparseable input is `None`.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.naive_utc().date());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Aligned, gapless sequence of bucket starts for one overview request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketGrid {
    interval: Interval,
    start: NaiveDate,
    end: NaiveDate,
    buckets: Vec<NaiveDate>,
}

impl BucketGrid {
    /// Resolves the requested window into a bucket grid.
    ///
    /// `end` defaults to `today`; `start` defaults to the floored end moved
    /// back `DEFAULT_BUCKET_COUNT - 1` intervals. A floored start after the
    /// end is rejected with `DashboardError::InvalidRange`.
    pub fn resolve(
        interval: Interval,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, DashboardError> {
        let end = end.unwrap_or(today);
        let aligned_end = interval.floor(end);
        let start = match start {
            Some(requested) => interval.floor(requested),
            None => interval
                .shift(aligned_end, -(i64::from(DEFAULT_BUCKET_COUNT) - 1))
                .ok_or(DashboardError::InvalidRange {
                    start: aligned_end,
                    end,
                })?,
        };

        if start > aligned_end {
            return Err(DashboardError::InvalidRange { start, end });
        }

        let mut buckets = Vec::new();
        let mut cursor = start;
        while cursor <= aligned_end {
            buckets.push(cursor);
            match interval.shift(cursor, 1) {
                Some(next) => cursor = next,
                None => break,
            }
        }

        Ok(Self {
            interval,
            start,
            end,
            buckets,
        })
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Floored start of the first bucket.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Requested (unfloored) end date; records up to the end of this day count.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn buckets(&self) -> &[NaiveDate] {
        &self.buckets
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Creation-time window of the current series.
    pub fn current_range(&self) -> DateTimeRange {
        DateTimeRange::covering_days(self.start, self.end)
    }

    /// Equal-length window immediately preceding the grid: from `start`
    /// moved back `bucket_count` intervals up to the day before `start`.
    pub fn previous_range(&self) -> Result<DateTimeRange, DashboardError> {
        let count = i64::try_from(self.bucket_count()).unwrap_or(i64::MAX);
        let out_of_range = || DashboardError::InvalidRange {
            start: self.start,
            end: self.end,
        };
        let previous_start = self.interval.shift(self.start, -count).ok_or_else(out_of_range)?;
        let previous_end = previous_day(self.start).ok_or_else(out_of_range)?;
        Ok(DateTimeRange::covering_days(previous_start, previous_end))
    }
}
