use chrono::NaiveDate;

use super::dashboard_model::{DashboardOverview, OverviewQuery};
use crate::errors::Result;
use crate::utils::time_utils::today_utc;

/// Trait for dashboard service operations
pub trait DashboardServiceTrait: Send + Sync {
    /// Portfolio totals and the new-assets series for one enterprise.
    ///
    /// Fails with `DashboardError::InvalidRange` before touching storage when
    /// the requested start falls after the end.
    fn get_overview(&self, enterprise_id: &str, query: &OverviewQuery) -> Result<DashboardOverview>;
}

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the system time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        today_utc()
    }
}
