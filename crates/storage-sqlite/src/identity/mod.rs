//! SQLite storage implementation for enterprises and users.

mod model;
mod repository;

pub use model::{EnterpriseDB, NewEnterpriseDB, NewUserDB, UserDB};
pub use repository::IdentityRepository;
