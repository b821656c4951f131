//! SQLite storage implementation for offerings and their subscriptions.

mod model;
mod repository;

pub use model::{NewOfferingDB, NewSubscriptionDB, OfferingDB, SubscriptionDB};
pub use repository::OfferingRepository;
