//! Folding project creations into the bucket grid.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::dashboard_model::SeriesPoint;
use super::interval::{BucketGrid, Interval};
use crate::errors::Result;
use crate::projects::ProjectAssetPoint;
use crate::utils::{checked_add, checked_sub, checked_sum};

/// A calendar-aligned slot of the series with its accumulated value.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub period_start: NaiveDate,
    pub label: String,
    pub value: Decimal,
}

/// Accumulates asset values into the buckets of a grid, in grid order.
#[derive(Debug, Clone)]
pub struct TimeSeriesBuilder {
    interval: Interval,
    buckets: Vec<Bucket>,
    index: HashMap<String, usize>,
    dropped: usize,
}

impl TimeSeriesBuilder {
    pub fn new(grid: &BucketGrid) -> Self {
        let interval = grid.interval();
        let buckets: Vec<Bucket> = grid
            .buckets()
            .iter()
            .map(|start| Bucket {
                period_start: *start,
                label: interval.key(*start),
                value: Decimal::ZERO,
            })
            .collect();
        let index = buckets
            .iter()
            .enumerate()
            .map(|(i, b)| (b.label.clone(), i))
            .collect();
        Self {
            interval,
            buckets,
            index,
            dropped: 0,
        }
    }

    /// Adds a project's value to the bucket containing its creation date.
    ///
    /// Returns false, and counts the point as dropped, when no bucket matches.
    pub fn add(&mut self, point: &ProjectAssetPoint) -> Result<bool> {
        let label = self
            .interval
            .key(self.interval.floor(point.created_at.date()));
        match self.index.get(&label) {
            Some(&i) => {
                let bucket = &mut self.buckets[i];
                bucket.value = checked_add(
                    bucket.value,
                    point.asset_value.unwrap_or(Decimal::ZERO),
                    "bucket value",
                )?;
                Ok(true)
            }
            None => {
                self.dropped += 1;
                Ok(false)
            }
        }
    }

    pub fn extend<'a, I>(&mut self, points: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a ProjectAssetPoint>,
    {
        for point in points {
            self.add(point)?;
        }
        Ok(())
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn total(&self) -> Result<Decimal> {
        checked_sum(self.buckets.iter().map(|b| b.value), "series total")
    }

    pub fn into_points(self) -> Vec<SeriesPoint> {
        self.buckets
            .into_iter()
            .map(|b| SeriesPoint {
                date: b.label,
                value: b.value,
            })
            .collect()
    }
}

/// Relative change from `previous` to `total`; zero when there is no
/// previous value to compare against.
pub fn change_pct(total: Decimal, previous: Decimal) -> Result<Decimal> {
    if previous <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let delta = checked_sub(total, previous, "changePct")?;
    Ok(delta.checked_div(previous).unwrap_or(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(y: i32, m: u32, d: u32, value: Option<Decimal>) -> ProjectAssetPoint {
        ProjectAssetPoint {
            created_at: date(y, m, d).and_hms_opt(14, 30, 0).unwrap(),
            asset_value: value,
        }
    }

    fn month_grid() -> BucketGrid {
        BucketGrid::resolve(
            Interval::Month,
            Some(date(2024, 1, 1)),
            Some(date(2024, 4, 30)),
            date(2024, 7, 1),
        )
        .unwrap()
    }

    #[test]
    fn test_mid_month_creation_lands_in_month_bucket() {
        let mut builder = TimeSeriesBuilder::new(&month_grid());
        assert!(builder.add(&point(2024, 3, 15, Some(dec!(1200)))).unwrap());
        let points = builder.into_points();
        let march = points.iter().find(|p| p.date == "2024-03").unwrap();
        assert_eq!(march.value, dec!(1200));
    }

    #[test]
    fn test_values_accumulate_and_nulls_count_as_zero() {
        let mut builder = TimeSeriesBuilder::new(&month_grid());
        builder.extend(&[
            point(2024, 1, 2, Some(dec!(100))),
            point(2024, 1, 31, Some(dec!(50))),
            point(2024, 2, 10, None),
            point(2024, 4, 30, Some(dec!(25))),
        ])
        .unwrap();
        assert_eq!(builder.total().unwrap(), dec!(175));
        let values: Vec<Decimal> = builder.buckets().iter().map(|b| b.value).collect();
        assert_eq!(values, vec![dec!(150), dec!(0), dec!(0), dec!(25)]);
    }

    #[test]
    fn test_out_of_grid_points_are_dropped() {
        let mut builder = TimeSeriesBuilder::new(&month_grid());
        assert!(!builder.add(&point(2023, 12, 31, Some(dec!(999)))).unwrap());
        assert_eq!(builder.dropped(), 1);
        assert_eq!(builder.total().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_points_follow_grid_order() {
        let builder = TimeSeriesBuilder::new(&month_grid());
        let labels: Vec<String> = builder.into_points().into_iter().map(|p| p.date).collect();
        assert_eq!(labels, vec!["2024-01", "2024-02", "2024-03", "2024-04"]);
    }

    #[test]
    fn test_week_buckets_use_monday_labels() {
        let grid = BucketGrid::resolve(
            Interval::Week,
            Some(date(2024, 3, 4)),
            Some(date(2024, 3, 17)),
            date(2024, 7, 1),
        )
        .unwrap();
        let mut builder = TimeSeriesBuilder::new(&grid);
        // Sunday 2024-03-17 belongs to the week of Monday 2024-03-11
        builder.add(&point(2024, 3, 17, Some(dec!(10)))).unwrap();
        let points = builder.into_points();
        assert_eq!(points[1].date, "2024-03-11");
        assert_eq!(points[1].value, dec!(10));
    }

    #[test]
    fn test_change_pct_zero_guard() {
        assert_eq!(change_pct(dec!(500), Decimal::ZERO).unwrap(), Decimal::ZERO);
        assert_eq!(change_pct(dec!(150), dec!(100)).unwrap(), dec!(0.5));
        assert_eq!(change_pct(dec!(50), dec!(100)).unwrap(), dec!(-0.5));
    }

    #[test]
    fn test_bucket_overflow_is_an_error() {
        let mut builder = TimeSeriesBuilder::new(&month_grid());
        builder.add(&point(2024, 2, 1, Some(Decimal::MAX))).unwrap();
        assert!(builder.add(&point(2024, 2, 2, Some(Decimal::MAX))).is_err());
    }

    #[test]
    fn test_total_overflow_across_buckets_is_an_error() {
        let mut builder = TimeSeriesBuilder::new(&month_grid());
        builder
            .extend(&[
                point(2024, 1, 5, Some(Decimal::MAX)),
                point(2024, 3, 5, Some(Decimal::MAX)),
            ])
            .unwrap();
        assert!(builder.total().is_err());
    }
}
