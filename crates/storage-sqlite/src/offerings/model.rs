//! Database models for offerings and subscriptions.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::warn;
use rust_decimal::Decimal;

use crate::utils::parse_stored_decimal;
use issuer_console_core::offerings::{
    NewOffering, NewSubscription, Offering, OfferingStatus, Subscription, SubscriptionStatus,
};

/// Database model for offerings
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::offerings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OfferingDB {
    pub id: String,
    pub project_id: String,
    pub status: String,
    pub cap_amount_usd: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::offerings)]
pub struct NewOfferingDB {
    pub id: String,
    pub project_id: String,
    pub status: String,
    pub cap_amount_usd: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for subscriptions
#[derive(Queryable, Identifiable, Selectable, Associations, PartialEq, Debug, Clone)]
#[diesel(belongs_to(OfferingDB, foreign_key = offering_id))]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionDB {
    pub id: String,
    pub offering_id: String,
    pub amount_usd: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct NewSubscriptionDB {
    pub id: String,
    pub offering_id: String,
    pub amount_usd: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<SubscriptionDB> for Subscription {
    fn from(db: SubscriptionDB) -> Self {
        let status = SubscriptionStatus::from_raw(&db.status);
        if let SubscriptionStatus::Unrecognized(ref raw) = status {
            warn!(
                "Subscription {} has status '{}', not counted toward raised amounts",
                db.id, raw
            );
        }
        let amount_usd = parse_stored_decimal(Some(&db.amount_usd), "amount_usd", &db.id)
            .unwrap_or(Decimal::ZERO);
        Self {
            id: db.id,
            offering_id: db.offering_id,
            amount_usd,
            status,
        }
    }
}

impl OfferingDB {
    /// Builds the domain offering from the row and its subscription rows.
    pub fn into_domain(self, subscriptions: Vec<SubscriptionDB>) -> Offering {
        let status = OfferingStatus::from_raw(&self.status);
        if let OfferingStatus::Unrecognized(ref raw) = status {
            warn!(
                "Offering {} has unrecognized status '{}', excluded from portfolio totals",
                self.id, raw
            );
        }
        let cap_amount_usd =
            parse_stored_decimal(Some(&self.cap_amount_usd), "cap_amount_usd", &self.id)
                .unwrap_or(Decimal::ZERO);
        Offering {
            id: self.id,
            project_id: self.project_id,
            status,
            cap_amount_usd,
            subscriptions: subscriptions.into_iter().map(Subscription::from).collect(),
        }
    }
}

impl NewOfferingDB {
    pub fn from_domain(domain: NewOffering, id: String, now: NaiveDateTime) -> Self {
        Self {
            id,
            project_id: domain.project_id,
            status: domain.status,
            cap_amount_usd: domain.cap_amount_usd.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl NewSubscriptionDB {
    pub fn from_domain(domain: NewSubscription, id: String, now: NaiveDateTime) -> Self {
        Self {
            id,
            offering_id: domain.offering_id,
            amount_usd: domain.amount_usd.to_string(),
            status: domain.status,
            created_at: now,
        }
    }
}
