use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{EnterpriseDB, NewEnterpriseDB, NewUserDB, UserDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{enterprises, users};
use issuer_console_core::constants::{
    DEMO_ENTERPRISE_ID, DEMO_ENTERPRISE_NAME, DEMO_PASSWORD, DEMO_USER_EMAIL, DEMO_USER_ID,
    DEMO_USER_NAME, ISSUER_MEMBER_ROLE, KYB_APPROVED, KYB_PENDING, OWNER_ROLE,
};
use issuer_console_core::errors::Result;
use issuer_console_core::identity::{
    hash_password, IdentityStoreTrait, NewAccount, UserAccount, UserCredentials,
};

pub struct IdentityRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl IdentityRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        IdentityRepository { pool, writer }
    }
}

fn load_account(conn: &mut SqliteConnection, user_id: &str) -> Result<Option<UserAccount>> {
    let row = users::table
        .left_join(enterprises::table)
        .filter(users::id.eq(user_id))
        .select((UserDB::as_select(), Option::<EnterpriseDB>::as_select()))
        .first::<(UserDB, Option<EnterpriseDB>)>(conn)
        .optional()
        .map_err(StorageError::from)?;
    Ok(row.map(|(user, enterprise)| user.into_account(enterprise)))
}

#[async_trait]
impl IdentityStoreTrait for IdentityRepository {
    fn find_user(&self, user_id: &str) -> Result<Option<UserAccount>> {
        let mut conn = get_connection(&self.pool)?;
        load_account(&mut conn, user_id)
    }

    fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        let mut conn = get_connection(&self.pool)?;
        let row = users::table
            .left_join(enterprises::table)
            .filter(users::email.eq(email))
            .select((UserDB::as_select(), Option::<EnterpriseDB>::as_select()))
            .first::<(UserDB, Option<EnterpriseDB>)>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(|(user, enterprise)| user.into_credentials(enterprise)))
    }

    async fn ensure_demo_identity(&self) -> Result<UserAccount> {
        self.writer
            .exec(|conn: &mut SqliteConnection| -> Result<UserAccount> {
                let now = Utc::now().naive_utc();
                let password = hash_password(DEMO_PASSWORD);

                diesel::insert_into(enterprises::table)
                    .values(&NewEnterpriseDB {
                        id: DEMO_ENTERPRISE_ID,
                        name: DEMO_ENTERPRISE_NAME,
                        kyb_status: KYB_APPROVED,
                        creator_id: None,
                        created_at: now,
                        updated_at: now,
                    })
                    .on_conflict(enterprises::id)
                    .do_nothing()
                    .execute(conn)
                    .map_err(StorageError::from)?;

                diesel::insert_into(users::table)
                    .values(&NewUserDB {
                        id: DEMO_USER_ID,
                        email: DEMO_USER_EMAIL,
                        password: &password,
                        name: Some(DEMO_USER_NAME),
                        enterprise_id: Some(DEMO_ENTERPRISE_ID),
                        role: ISSUER_MEMBER_ROLE,
                        is_creator: true,
                        created_at: now,
                        updated_at: now,
                    })
                    .on_conflict(users::id)
                    .do_update()
                    .set((
                        users::enterprise_id.eq(DEMO_ENTERPRISE_ID),
                        users::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                diesel::update(
                    enterprises::table
                        .filter(enterprises::id.eq(DEMO_ENTERPRISE_ID))
                        .filter(enterprises::creator_id.is_null()),
                )
                .set(enterprises::creator_id.eq(DEMO_USER_ID))
                .execute(conn)
                .map_err(StorageError::from)?;

                load_account(conn, DEMO_USER_ID)?.ok_or_else(|| {
                    StorageError::from(diesel::result::Error::NotFound).into()
                })
            })
            .await
    }

    async fn create_account(&self, account: NewAccount) -> Result<UserAccount> {
        let enterprise_id = Uuid::new_v4().to_string();
        let user_id = Uuid::new_v4().to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<UserAccount> {
                let now = Utc::now().naive_utc();

                diesel::insert_into(enterprises::table)
                    .values(&NewEnterpriseDB {
                        id: &enterprise_id,
                        name: &account.enterprise_name,
                        kyb_status: KYB_PENDING,
                        creator_id: None,
                        created_at: now,
                        updated_at: now,
                    })
                    .execute(conn)
                    .map_err(StorageError::from)?;

                diesel::insert_into(users::table)
                    .values(&NewUserDB {
                        id: &user_id,
                        email: &account.email,
                        password: &account.password_hash,
                        name: Some(account.name.as_str()),
                        enterprise_id: Some(enterprise_id.as_str()),
                        role: OWNER_ROLE,
                        is_creator: true,
                        created_at: now,
                        updated_at: now,
                    })
                    .execute(conn)
                    .map_err(StorageError::from)?;

                diesel::update(enterprises::table.find(&enterprise_id))
                    .set(enterprises::creator_id.eq(&user_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                load_account(conn, &user_id)?.ok_or_else(|| {
                    StorageError::from(diesel::result::Error::NotFound).into()
                })
            })
            .await
    }
}
