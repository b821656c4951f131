//! SQLite storage implementation for the issuer console.
//!
//! Implements the repository traits defined in `issuer-console-core` with
//! Diesel over SQLite:
//! - connection pooling and pragmas
//! - embedded Diesel migrations
//! - a single writer task for all mutations
//! - repositories for enterprises/users, projects and offerings
//!
//! This is the only crate of the workspace that depends on Diesel.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod identity;
pub mod offerings;
pub mod projects;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use identity::IdentityRepository;
pub use offerings::OfferingRepository;
pub use projects::ProjectRepository;

// Re-export from issuer-console-core for convenience
pub use issuer_console_core::errors::{DatabaseError, Error, Result};
