//! Identity module - resolves a session cookie into the caller's enterprise scope,
//! and registers and logs in enterprise accounts.

mod identity_errors;
mod identity_model;
mod identity_service;
mod identity_traits;
mod password;

pub use identity_errors::AuthError;
pub use identity_model::{
    Identity, LoginInput, NewAccount, RegisterInput, UserAccount, UserCredentials,
};
pub use identity_service::IdentityService;
pub use identity_traits::{AccountServiceTrait, IdentityProviderTrait, IdentityStoreTrait};
pub use password::{hash_password, verify_password};
