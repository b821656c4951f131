//! Dashboard module - the overview aggregation behind the console home page.
//!
//! The overview combines two views of an enterprise's portfolio:
//!
//! - **Metrics** (`metrics.rs`) - all-time totals by funding stage, folded
//!   from offerings and their confirmed/settled subscriptions
//! - **New assets** (`time_series.rs`) - asset value of projects created in
//!   the requested window, bucketed by day, week or month (`interval.rs`),
//!   compared against the preceding window of equal length
//!
//! Every call reads fresh from storage; nothing is cached between requests.

mod dashboard_errors;
mod dashboard_model;
mod dashboard_service;
mod dashboard_traits;
pub mod interval;
pub mod metrics;
pub mod time_series;


pub use dashboard_errors::DashboardError;
pub use dashboard_model::{
    DashboardOverview, MetricsSummary, OverviewQuery, SeriesPoint, TimeSeries,
};
pub use dashboard_service::DashboardService;
pub use dashboard_traits::{Clock, DashboardServiceTrait, SystemClock};
pub use interval::{parse_iso_date, BucketGrid, Interval, DEFAULT_BUCKET_COUNT};
pub use metrics::PortfolioTally;
pub use time_series::{change_pct, Bucket, TimeSeriesBuilder};
