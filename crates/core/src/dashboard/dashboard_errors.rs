use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the dashboard aggregation before any storage access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// The floored start date falls after the requested end date.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}
