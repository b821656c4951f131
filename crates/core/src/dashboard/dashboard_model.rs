//! Dashboard request and response models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::interval::Interval;

/// Raw query parameters of the overview endpoint.
///
/// Values stay loosely typed here; unknown intervals and unparseable dates
/// are treated as absent by the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewQuery {
    pub interval: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl OverviewQuery {
    /// Builds the query from decoded key/value pairs. The first occurrence of
    /// a repeated key wins and unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = OverviewQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "interval" => &mut query.interval,
                "startDate" => &mut query.start_date,
                "endDate" => &mut query.end_date,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// Point-in-time portfolio totals by funding stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub total_created: Decimal,
    pub active_remaining: Decimal,
    pub active_subscribed: Decimal,
    pub closed_raised: Decimal,
    pub not_yet_offered: Decimal,
}

/// One bucket of the new-assets series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: String,
    pub value: Decimal,
}

/// New asset value created per bucket, with period-over-period change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub interval: Interval,
    pub start_date: String,
    pub end_date: String,
    pub points: Vec<SeriesPoint>,
    pub total: Decimal,
    pub previous_total: Decimal,
    pub change_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub metrics: MetricsSummary,
    pub new_assets: TimeSeries,
}
