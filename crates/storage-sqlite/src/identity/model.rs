//! Database models for enterprises and users.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use issuer_console_core::identity::{UserAccount, UserCredentials};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::enterprises)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EnterpriseDB {
    pub id: String,
    pub name: String,
    pub kyb_status: String,
    pub creator_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::enterprises)]
pub struct NewEnterpriseDB<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub kyb_status: &'a str,
    pub creator_id: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub enterprise_id: Option<String>,
    pub role: String,
    pub is_creator: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserDB<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub name: Option<&'a str>,
    pub enterprise_id: Option<&'a str>,
    pub role: &'a str,
    pub is_creator: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserDB {
    /// Joins the user row with its (optional) enterprise row.
    pub fn into_account(self, enterprise: Option<EnterpriseDB>) -> UserAccount {
        let enterprise_name = enterprise.as_ref().map(|e| e.name.clone());
        UserAccount {
            enterprise_id: self.enterprise_id.or(enterprise.map(|e| e.id)),
            id: self.id,
            email: self.email,
            name: self.name,
            enterprise_name,
            role: self.role,
            is_creator: self.is_creator,
        }
    }

    /// Keeps the stored password hash next to the account for login checks.
    pub fn into_credentials(mut self, enterprise: Option<EnterpriseDB>) -> UserCredentials {
        let password_hash = std::mem::take(&mut self.password);
        UserCredentials {
            account: self.into_account(enterprise),
            password_hash,
        }
    }
}
