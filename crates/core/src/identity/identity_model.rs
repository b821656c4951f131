use serde::{Deserialize, Serialize};

/// Stored user with its enterprise membership, as read by the identity store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub enterprise_id: Option<String>,
    pub enterprise_name: Option<String>,
    pub role: String,
    pub is_creator: bool,
}

/// The authenticated caller on whose behalf queries are scoped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub enterprise_id: String,
    pub enterprise_name: Option<String>,
    pub role: String,
    pub is_creator: bool,
}

impl UserAccount {
    /// Converts to an identity; users without an enterprise have none.
    pub fn into_identity(self) -> Option<Identity> {
        let enterprise_id = self.enterprise_id.filter(|id| !id.is_empty())?;
        Some(Identity {
            user_id: self.id,
            email: self.email,
            name: self.name.unwrap_or_else(|| "User".to_string()),
            enterprise_id,
            enterprise_name: self.enterprise_name,
            role: self.role,
            is_creator: self.is_creator,
        })
    }
}

/// A stored user together with its password hash, as needed for login.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredentials {
    pub account: UserAccount,
    pub password_hash: String,
}

/// Registration request for a new enterprise account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub enterprise_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Validated registration, ready to be persisted as an enterprise plus its
/// owning user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub enterprise_name: String,
}
