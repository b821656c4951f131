use async_trait::async_trait;

use super::identity_errors::AuthError;
use super::identity_model::{Identity, LoginInput, NewAccount, RegisterInput, UserAccount, UserCredentials};
use crate::errors::Result;

/// Trait for identity persistence
#[async_trait]
pub trait IdentityStoreTrait: Send + Sync {
    fn find_user(&self, user_id: &str) -> Result<Option<UserAccount>>;

    /// Looks a user up by normalized (lowercase) email.
    fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;

    /// Idempotently provisions the demo enterprise and user and returns the user.
    async fn ensure_demo_identity(&self) -> Result<UserAccount>;

    /// Creates the enterprise and its owning user in one transaction.
    async fn create_account(&self, account: NewAccount) -> Result<UserAccount>;
}

/// Resolves a session into the caller's identity.
#[async_trait]
pub trait IdentityProviderTrait: Send + Sync {
    async fn resolve(&self, session_user_id: Option<&str>) -> std::result::Result<Identity, AuthError>;
}

/// Account registration and password login.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn register(&self, input: RegisterInput) -> Result<Identity>;
    fn login(&self, input: LoginInput) -> Result<Identity>;
}
