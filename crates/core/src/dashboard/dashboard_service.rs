use log::debug;
use std::sync::Arc;

use super::dashboard_model::{DashboardOverview, MetricsSummary, OverviewQuery, TimeSeries};
use super::dashboard_traits::{Clock, DashboardServiceTrait, SystemClock};
use super::interval::{parse_iso_date, BucketGrid, Interval};
use super::metrics::PortfolioTally;
use super::time_series::{change_pct, TimeSeriesBuilder};
use crate::errors::Result;
use crate::offerings::OfferingRepositoryTrait;
use crate::projects::ProjectRepositoryTrait;

/// Computes the dashboard overview from fresh storage reads on every call.
pub struct DashboardService {
    project_repository: Arc<dyn ProjectRepositoryTrait>,
    offering_repository: Arc<dyn OfferingRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    pub fn new(
        project_repository: Arc<dyn ProjectRepositoryTrait>,
        offering_repository: Arc<dyn OfferingRepositoryTrait>,
    ) -> Self {
        Self {
            project_repository,
            offering_repository,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn resolve_grid(&self, query: &OverviewQuery) -> Result<BucketGrid> {
        let interval = Interval::parse_or_default(query.interval.as_deref());
        let start = query.start_date.as_deref().and_then(parse_iso_date);
        let end = query.end_date.as_deref().and_then(parse_iso_date);
        Ok(BucketGrid::resolve(interval, start, end, self.clock.today())?)
    }

    fn portfolio_metrics(&self, enterprise_id: &str) -> Result<MetricsSummary> {
        let total_created = self.project_repository.sum_asset_value(enterprise_id, None)?;
        let offerings = self.offering_repository.list_for_enterprise(enterprise_id)?;
        let tally = PortfolioTally::from_offerings(&offerings)?;
        if tally.excluded_offerings > 0 || tally.excluded_subscriptions > 0 {
            debug!(
                "Excluded {} offerings and {} subscriptions from portfolio totals for enterprise {}",
                tally.excluded_offerings, tally.excluded_subscriptions, enterprise_id
            );
        }
        MetricsSummary::from_tally(total_created, &tally)
    }

    fn new_assets(&self, enterprise_id: &str, grid: &BucketGrid) -> Result<TimeSeries> {
        let in_range = self
            .project_repository
            .list_created_within(enterprise_id, &grid.current_range())?;
        let mut builder = TimeSeriesBuilder::new(grid);
        builder.extend(&in_range)?;
        if builder.dropped() > 0 {
            debug!(
                "{} projects fell outside the bucket grid for enterprise {}",
                builder.dropped(),
                enterprise_id
            );
        }

        let previous_total = self
            .project_repository
            .sum_asset_value(enterprise_id, Some(&grid.previous_range()?))?;
        let total = builder.total()?;
        let change_pct = change_pct(total, previous_total)?;
        let interval = grid.interval();

        Ok(TimeSeries {
            interval,
            start_date: interval.key(grid.start()),
            end_date: interval.key(grid.end()),
            points: builder.into_points(),
            total,
            previous_total,
            change_pct,
        })
    }
}

impl DashboardServiceTrait for DashboardService {
    fn get_overview(&self, enterprise_id: &str, query: &OverviewQuery) -> Result<DashboardOverview> {
        let grid = self.resolve_grid(query)?;
        let metrics = self.portfolio_metrics(enterprise_id)?;
        let new_assets = self.new_assets(enterprise_id, &grid)?;
        Ok(DashboardOverview {
            metrics,
            new_assets,
        })
    }
}
