//! Password hashing for console accounts.
//!
//! Hashes are the lowercase hex SHA-256 digest of the raw password, the format
//! already stored for existing accounts.

use sha2::{Digest, Sha256};

pub fn hash_password(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

/// True when `raw` hashes to `stored`. An empty stored hash never matches.
pub fn verify_password(raw: &str, stored: &str) -> bool {
    !stored.is_empty() && hash_password(raw) == stored
}
