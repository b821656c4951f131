use thiserror::Error;

/// Errors raised while resolving the caller's identity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No session resolved to a user and no fallback identity is allowed.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The user exists but belongs to no enterprise.
    #[error("User '{0}' has no enterprise")]
    MissingEnterprise(String),

    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registration with an email that already has an account.
    #[error("Email already registered")]
    EmailTaken,

    /// The caller may not act on the target.
    #[error("{0}")]
    Forbidden(String),

    /// The identity store could not be read or written.
    #[error("Identity store failure: {0}")]
    Store(String),
}
