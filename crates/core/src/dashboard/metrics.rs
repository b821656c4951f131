//! Portfolio totals by funding stage.

use rust_decimal::Decimal;

use super::dashboard_model::MetricsSummary;
use crate::errors::Result;
use crate::offerings::{Offering, OfferingStatus};
use crate::utils::{checked_add, checked_sub};

/// Running totals over an enterprise's offerings.
///
/// Offerings with an unrecognized status and subscriptions that are neither
/// confirmed nor settled do not contribute; they are counted so callers can
/// report what was left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioTally {
    pub active_remaining: Decimal,
    pub active_subscribed: Decimal,
    pub closed_raised: Decimal,
    pub excluded_offerings: usize,
    pub excluded_subscriptions: usize,
}

impl PortfolioTally {
    pub fn from_offerings<'a, I>(offerings: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Offering>,
    {
        offerings
            .into_iter()
            .try_fold(PortfolioTally::default(), |mut tally, offering| {
                tally.add(offering)?;
                Ok(tally)
            })
    }

    /// Fails when a total leaves the decimal range.
    pub fn add(&mut self, offering: &Offering) -> Result<()> {
        self.excluded_subscriptions += offering
            .subscriptions
            .iter()
            .filter(|s| !s.status.is_counted())
            .count();

        match &offering.status {
            OfferingStatus::Live => {
                self.active_subscribed = checked_add(
                    self.active_subscribed,
                    offering.subscribed_amount()?,
                    "activeSubscribed",
                )?;
                self.active_remaining = checked_add(
                    self.active_remaining,
                    offering.remaining_capacity()?,
                    "activeRemaining",
                )?;
            }
            OfferingStatus::ClosedSuccess => {
                self.closed_raised = checked_add(
                    self.closed_raised,
                    offering.subscribed_amount()?,
                    "closedRaised",
                )?;
            }
            OfferingStatus::Unrecognized(_) => {
                self.excluded_offerings += 1;
            }
        }
        Ok(())
    }

    /// Everything already offered, raised or still open.
    pub fn allocated(&self) -> Result<Decimal> {
        let open = checked_add(self.active_remaining, self.active_subscribed, "allocated")?;
        checked_add(open, self.closed_raised, "allocated")
    }
}

impl MetricsSummary {
    /// Builds the summary from the all-time created asset value and the
    /// offering tally. `not_yet_offered` is clamped at zero.
    pub fn from_tally(total_created: Decimal, tally: &PortfolioTally) -> Result<Self> {
        let unallocated = checked_sub(total_created, tally.allocated()?, "notYetOffered")?;
        Ok(Self {
            total_created,
            active_remaining: tally.active_remaining,
            active_subscribed: tally.active_subscribed,
            closed_raised: tally.closed_raised,
            not_yet_offered: unallocated.max(Decimal::ZERO),
        })
    }
}
