//! Offering and subscription domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::utils::{checked_sub, checked_sum};

/// Trims and uppercases a stored status value.
pub fn normalize_status(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Funding stage of an offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferingStatus {
    /// `LIVE` or `ACTIVE`
    Live,
    /// `CLOSED_SUCCESS`, `CLOSED` or `SUCCESSFUL`
    ClosedSuccess,
    /// Any other value, kept in normalized form.
    Unrecognized(String),
}

impl OfferingStatus {
    pub fn from_raw(raw: &str) -> Self {
        match normalize_status(raw).as_str() {
            "LIVE" | "ACTIVE" => OfferingStatus::Live,
            "CLOSED_SUCCESS" | "CLOSED" | "SUCCESSFUL" => OfferingStatus::ClosedSuccess,
            other => OfferingStatus::Unrecognized(other.to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, OfferingStatus::Unrecognized(_))
    }
}

/// Settlement state of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Confirmed,
    Settled,
    /// Pending, cancelled and anything else.
    Unrecognized(String),
}

impl SubscriptionStatus {
    pub fn from_raw(raw: &str) -> Self {
        match normalize_status(raw).as_str() {
            "CONFIRMED" => SubscriptionStatus::Confirmed,
            "SETTLED" => SubscriptionStatus::Settled,
            other => SubscriptionStatus::Unrecognized(other.to_string()),
        }
    }

    /// Only confirmed and settled subscriptions count toward raised amounts.
    pub fn is_counted(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Confirmed | SubscriptionStatus::Settled
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub offering_id: String,
    pub amount_usd: Decimal,
    pub status: SubscriptionStatus,
}

/// A funding round of a project, with its subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offering {
    pub id: String,
    pub project_id: String,
    pub status: OfferingStatus,
    pub cap_amount_usd: Decimal,
    pub subscriptions: Vec<Subscription>,
}

impl Offering {
    /// Sum of confirmed and settled subscription amounts.
    pub fn subscribed_amount(&self) -> Result<Decimal> {
        checked_sum(
            self.subscriptions
                .iter()
                .filter(|s| s.status.is_counted())
                .map(|s| s.amount_usd),
            "subscribed amount",
        )
    }

    /// Cap left to raise; zero when over-subscribed.
    pub fn remaining_capacity(&self) -> Result<Decimal> {
        let remaining = checked_sub(
            self.cap_amount_usd,
            self.subscribed_amount()?,
            "remaining capacity",
        )?;
        Ok(remaining.max(Decimal::ZERO))
    }
}

/// Input model for creating a new offering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffering {
    pub id: Option<String>,
    pub project_id: String,
    pub status: String,
    pub cap_amount_usd: Decimal,
}

/// Input model for recording a subscription against an offering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub id: Option<String>,
    pub offering_id: String,
    pub amount_usd: Decimal,
    pub status: String,
}
