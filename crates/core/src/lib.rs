//! Issuer Console Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the issuer console: projects
//! created through the wizard, their offerings, identity resolution and the
//! dashboard overview aggregation. It is database-agnostic and defines
//! traits that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod identity;
pub mod offerings;
pub mod projects;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
