use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{NewOfferingDB, NewSubscriptionDB, OfferingDB, SubscriptionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{offerings, projects, subscriptions};
use crate::utils::chunk_for_sqlite;
use issuer_console_core::errors::Result;
use issuer_console_core::offerings::{
    NewOffering, NewSubscription, Offering, OfferingRepositoryTrait, Subscription,
};

pub struct OfferingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl OfferingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        OfferingRepository { pool, writer }
    }
}

#[async_trait]
impl OfferingRepositoryTrait for OfferingRepository {
    fn list_for_enterprise(&self, enterprise_id: &str) -> Result<Vec<Offering>> {
        let mut conn = get_connection(&self.pool)?;

        let offering_rows = offerings::table
            .inner_join(projects::table)
            .filter(projects::enterprise_id.eq(enterprise_id))
            .order(offerings::created_at.asc())
            .select(OfferingDB::as_select())
            .load::<OfferingDB>(&mut conn)
            .map_err(StorageError::from)?;

        let mut listed = Vec::with_capacity(offering_rows.len());
        for chunk in chunk_for_sqlite(&offering_rows) {
            let subscription_rows = SubscriptionDB::belonging_to(chunk)
                .order(subscriptions::created_at.asc())
                .select(SubscriptionDB::as_select())
                .load::<SubscriptionDB>(&mut conn)
                .map_err(StorageError::from)?;
            let grouped = subscription_rows.grouped_by(chunk);
            listed.extend(
                chunk
                    .iter()
                    .cloned()
                    .zip(grouped)
                    .map(|(row, subs)| row.into_domain(subs)),
            );
        }

        Ok(listed)
    }

    async fn create_offering(&self, new_offering: NewOffering) -> Result<Offering> {
        let id = new_offering
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let row = NewOfferingDB::from_domain(new_offering, id, Utc::now().naive_utc());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Offering> {
                let inserted = diesel::insert_into(offerings::table)
                    .values(&row)
                    .returning(OfferingDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted.into_domain(Vec::new()))
            })
            .await
    }

    async fn create_subscription(&self, new_subscription: NewSubscription) -> Result<Subscription> {
        let id = new_subscription
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let row = NewSubscriptionDB::from_domain(new_subscription, id, Utc::now().naive_utc());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Subscription> {
                let inserted = diesel::insert_into(subscriptions::table)
                    .values(&row)
                    .returning(SubscriptionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Subscription::from(inserted))
            })
            .await
    }
}
