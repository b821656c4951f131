//! Property-based tests for the dashboard bucket grid and time series.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;

use issuer_console_core::dashboard::{BucketGrid, Interval, TimeSeriesBuilder};
use issuer_console_core::projects::ProjectAssetPoint;

// =============================================================================
// Generators
// =============================================================================

fn arb_interval() -> impl Strategy<Value = Interval> {
    prop_oneof![Just(Interval::Day), Just(Interval::Week), Just(Interval::Month)]
}

/// Dates between 2000-01-01 and roughly 2040.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..15_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset)
    })
}

/// A start/end pair with the end at most ~400 days after the start.
fn arb_window() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (arb_date(), 0i64..400).prop_map(|(start, span)| (start, start + Duration::days(span)))
}

fn is_aligned(interval: Interval, date: NaiveDate) -> bool {
    match interval {
        Interval::Day => true,
        Interval::Week => date.weekday() == Weekday::Mon,
        Interval::Month => date.day() == 1,
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_buckets_are_complete_and_aligned(
        interval in arb_interval(),
        (start, end) in arb_window(),
    ) {
        let grid = BucketGrid::resolve(interval, Some(start), Some(end), end).unwrap();
        let buckets = grid.buckets();

        prop_assert!(!buckets.is_empty());
        prop_assert_eq!(buckets[0], interval.floor(start));
        prop_assert_eq!(*buckets.last().unwrap(), interval.floor(end));
        prop_assert!(buckets.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(buckets.windows(2).all(|w| interval.shift(w[0], 1) == Some(w[1])));
        prop_assert!(buckets.iter().all(|b| is_aligned(interval, *b)));

        let keys: HashSet<String> = buckets.iter().map(|b| interval.key(*b)).collect();
        prop_assert_eq!(keys.len(), buckets.len());
    }

    #[test]
    fn prop_inverted_window_is_rejected(
        interval in arb_interval(),
        (start, end) in arb_window(),
    ) {
        // A month past the end floors to a bucket after `start`.
        let late = end + Duration::days(40);
        prop_assert!(BucketGrid::resolve(interval, Some(late), Some(start), start).is_err());
    }

    #[test]
    fn prop_series_total_matches_in_range_values(
        interval in arb_interval(),
        (start, end) in arb_window(),
        values in proptest::collection::vec((0i64..400, 0u32..1_000_000), 0..40),
    ) {
        let grid = BucketGrid::resolve(interval, Some(start), Some(end), end).unwrap();
        let range = grid.current_range();
        let points: Vec<ProjectAssetPoint> = values
            .iter()
            .map(|(offset, value)| ProjectAssetPoint {
                created_at: (grid.start() + Duration::days(*offset)).and_hms_opt(12, 0, 0).unwrap(),
                asset_value: Some(Decimal::from(*value)),
            })
            .filter(|p| range.contains(p.created_at))
            .collect();

        let mut builder = TimeSeriesBuilder::new(&grid);
        builder.extend(&points).unwrap();
        let expected: Decimal = points.iter().filter_map(|p| p.asset_value).sum();

        prop_assert_eq!(builder.dropped(), 0);
        prop_assert_eq!(builder.total().unwrap(), expected);
        prop_assert_eq!(builder.buckets().len(), grid.bucket_count());
    }
}
