//! Offerings module - funding rounds, subscriptions and their status taxonomy.

mod offerings_model;
mod offerings_traits;

pub use offerings_model::{
    normalize_status, NewOffering, NewSubscription, Offering, OfferingStatus, Subscription,
    SubscriptionStatus,
};
pub use offerings_traits::OfferingRepositoryTrait;
