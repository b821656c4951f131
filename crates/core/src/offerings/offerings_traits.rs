use crate::errors::Result;
use crate::offerings::offerings_model::{NewOffering, NewSubscription, Offering, Subscription};
use async_trait::async_trait;

/// Trait for offering repository operations
#[async_trait]
pub trait OfferingRepositoryTrait: Send + Sync {
    /// All offerings of the enterprise's projects, each with its subscriptions.
    fn list_for_enterprise(&self, enterprise_id: &str) -> Result<Vec<Offering>>;
    async fn create_offering(&self, new_offering: NewOffering) -> Result<Offering>;
    async fn create_subscription(&self, new_subscription: NewSubscription) -> Result<Subscription>;
}
