use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::identity_errors::AuthError;
use super::identity_model::{Identity, LoginInput, NewAccount, RegisterInput, UserAccount};
use super::identity_traits::{AccountServiceTrait, IdentityProviderTrait, IdentityStoreTrait};
use super::password::{hash_password, verify_password};
use crate::constants::{DEMO_ENTERPRISE_ID, DEMO_USER_ID};
use crate::errors::{DatabaseError, Error, Result, ValidationError};

const MIN_PASSWORD_CHARS: usize = 6;

/// Trims and lowercases an email, rejecting anything not shaped like
/// `local@domain.tld`.
fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError::InvalidInput("email must be a valid email address".to_string()).into());
    }
    Ok(email)
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    Ok(trimmed.to_string())
}

fn into_identity(account: UserAccount) -> std::result::Result<Identity, AuthError> {
    let user_id = account.id.clone();
    account
        .into_identity()
        .ok_or(AuthError::MissingEnterprise(user_id))
}

/// Cookie-session identity provider and account service.
///
/// A session user id that resolves to a user with an enterprise wins. Otherwise
/// the demo identity is returned when `demo_fallback` is enabled.
pub struct IdentityService {
    store: Arc<dyn IdentityStoreTrait>,
    demo_fallback: bool,
}

impl IdentityService {
    pub fn new(store: Arc<dyn IdentityStoreTrait>, demo_fallback: bool) -> Self {
        Self {
            store,
            demo_fallback,
        }
    }

    fn store_error(e: Error) -> AuthError {
        AuthError::Store(e.to_string())
    }

    async fn demo_identity(&self) -> std::result::Result<Identity, AuthError> {
        let existing = self
            .store
            .find_user(DEMO_USER_ID)
            .map_err(Self::store_error)?
            .and_then(UserAccount::into_identity)
            .filter(|identity| identity.enterprise_id == DEMO_ENTERPRISE_ID);
        if let Some(identity) = existing {
            debug!("Resolved request to demo identity {}", identity.user_id);
            return Ok(identity);
        }

        let account = self
            .store
            .ensure_demo_identity()
            .await
            .map_err(Self::store_error)?;
        info!("Provisioned demo identity {}", account.id);
        into_identity(account)
    }
}

#[async_trait]
impl IdentityProviderTrait for IdentityService {
    async fn resolve(&self, session_user_id: Option<&str>) -> std::result::Result<Identity, AuthError> {
        if let Some(user_id) = session_user_id.map(str::trim).filter(|id| !id.is_empty()) {
            let account = self.store.find_user(user_id).map_err(Self::store_error)?;
            match account.map(|a| a.into_identity()) {
                Some(Some(identity)) => return Ok(identity),
                Some(None) => debug!("Session user {} has no enterprise", user_id),
                None => debug!("Session user {} not found", user_id),
            }
        }

        if !self.demo_fallback {
            return Err(AuthError::Unauthenticated);
        }
        self.demo_identity().await
    }
}

#[async_trait]
impl AccountServiceTrait for IdentityService {
    async fn register(&self, input: RegisterInput) -> Result<Identity> {
        let email = normalize_email(&input.email)?;
        if input.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ValidationError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_CHARS
            ))
            .into());
        }
        let name = required("name", &input.name)?;
        let enterprise_name = required("enterpriseName", &input.enterprise_name)?;

        if self.store.find_credentials_by_email(&email)?.is_some() {
            return Err(AuthError::EmailTaken.into());
        }

        let new_account = NewAccount {
            email,
            password_hash: hash_password(&input.password),
            name,
            enterprise_name,
        };
        let account = match self.store.create_account(new_account).await {
            Err(Error::Database(DatabaseError::UniqueViolation(_))) => {
                return Err(AuthError::EmailTaken.into())
            }
            other => other?,
        };
        info!(
            "Registered user {} for enterprise {:?}",
            account.id, account.enterprise_id
        );
        Ok(into_identity(account)?)
    }

    fn login(&self, input: LoginInput) -> Result<Identity> {
        let email = normalize_email(&input.email)?;
        if input.password.is_empty() {
            return Err(ValidationError::MissingField("password".to_string()).into());
        }

        let credentials = self
            .store
            .find_credentials_by_email(&email)?
            .filter(|c| verify_password(&input.password, &c.password_hash))
            .ok_or(AuthError::InvalidCredentials)?;
        Ok(into_identity(credentials.account)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEMO_ENTERPRISE_ID, DEMO_USER_ID};
    use crate::identity::{UserAccount, UserCredentials};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockIdentityStore {
        users: Mutex<Vec<UserCredentials>>,
        demo_calls: AtomicUsize,
        broken: bool,
        racing_insert: bool,
    }

    impl MockIdentityStore {
        fn with_users(users: Vec<UserAccount>) -> Self {
            let store = Self::default();
            store.users.lock().unwrap().extend(users.into_iter().map(|account| {
                UserCredentials {
                    password_hash: hash_password("secret-1"),
                    account,
                }
            }));
            store
        }
    }

    fn account(id: &str, enterprise_id: Option<&str>) -> UserAccount {
        UserAccount {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            name: None,
            enterprise_id: enterprise_id.map(String::from),
            enterprise_name: None,
            role: "ISSUER_MEMBER".to_string(),
            is_creator: false,
        }
    }

    #[async_trait]
    impl IdentityStoreTrait for MockIdentityStore {
        fn find_user(&self, user_id: &str) -> Result<Option<UserAccount>> {
            if self.broken {
                return Err(DatabaseError::ConnectionFailed("unable to open".to_string()).into());
            }
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.account.id == user_id)
                .map(|u| u.account.clone()))
        }

        fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.account.email == email)
                .cloned())
        }

        async fn ensure_demo_identity(&self) -> Result<UserAccount> {
            self.demo_calls.fetch_add(1, Ordering::SeqCst);
            let demo = account(DEMO_USER_ID, Some(DEMO_ENTERPRISE_ID));
            self.users.lock().unwrap().push(UserCredentials {
                account: demo.clone(),
                password_hash: String::new(),
            });
            Ok(demo)
        }

        async fn create_account(&self, new_account: NewAccount) -> Result<UserAccount> {
            if self.racing_insert {
                return Err(DatabaseError::UniqueViolation("users.email".to_string()).into());
            }
            let created = UserAccount {
                id: "u-new".to_string(),
                email: new_account.email,
                name: Some(new_account.name),
                enterprise_id: Some("ent-new".to_string()),
                enterprise_name: Some(new_account.enterprise_name),
                role: "OWNER".to_string(),
                is_creator: true,
            };
            self.users.lock().unwrap().push(UserCredentials {
                account: created.clone(),
                password_hash: new_account.password_hash,
            });
            Ok(created)
        }
    }

    fn registration(email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            email: email.to_string(),
            password: password.to_string(),
            name: " Ada ".to_string(),
            enterprise_name: "Acme Capital".to_string(),
        }
    }

    #[tokio::test]
    async fn test_session_user_resolves() {
        let store = MockIdentityStore::with_users(vec![account("u-1", Some("ent-1"))]);
        let service = IdentityService::new(Arc::new(store), true);
        let identity = service.resolve(Some("u-1")).await.unwrap();
        assert_eq!(identity.enterprise_id, "ent-1");
        assert_eq!(identity.name, "User");
    }

    #[tokio::test]
    async fn test_user_without_enterprise_falls_back_to_demo() {
        let store = Arc::new(MockIdentityStore::with_users(vec![account("u-2", None)]));
        let service = IdentityService::new(store.clone(), true);
        let identity = service.resolve(Some("u-2")).await.unwrap();
        assert_eq!(identity.user_id, DEMO_USER_ID);
        assert_eq!(store.demo_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_demo_identity_is_provisioned_once() {
        let store = Arc::new(MockIdentityStore::default());
        let service = IdentityService::new(store.clone(), true);
        for _ in 0..3 {
            let identity = service.resolve(None).await.unwrap();
            assert_eq!(identity.enterprise_id, DEMO_ENTERPRISE_ID);
        }
        assert_eq!(store.demo_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_session_without_fallback_is_unauthenticated() {
        let store = Arc::new(MockIdentityStore::default());
        let service = IdentityService::new(store.clone(), false);
        assert_eq!(service.resolve(None).await, Err(AuthError::Unauthenticated));
        assert_eq!(service.resolve(Some("  ")).await, Err(AuthError::Unauthenticated));
        assert_eq!(store.demo_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let store = MockIdentityStore {
            broken: true,
            ..Default::default()
        };
        let service = IdentityService::new(Arc::new(store), true);
        assert!(matches!(
            service.resolve(Some("u-1")).await,
            Err(AuthError::Store(_))
        ));
        assert!(matches!(service.resolve(None).await, Err(AuthError::Store(_))));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = IdentityService::new(Arc::new(MockIdentityStore::default()), false);
        let registered = service
            .register(registration("  Ada@Acme.Test ", "secret-1"))
            .await
            .unwrap();
        assert_eq!(registered.email, "ada@acme.test");
        assert_eq!(registered.name, "Ada");
        assert_eq!(registered.enterprise_id, "ent-new");

        let logged_in = service
            .login(LoginInput {
                email: "ADA@acme.test".to_string(),
                password: "secret-1".to_string(),
            })
            .unwrap();
        assert_eq!(logged_in.user_id, registered.user_id);

        let wrong = service.login(LoginInput {
            email: "ada@acme.test".to_string(),
            password: "secret-2".to_string(),
        });
        assert!(matches!(wrong, Err(Error::Auth(AuthError::InvalidCredentials))));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let service = IdentityService::new(Arc::new(MockIdentityStore::default()), false);
        for input in [
            registration("not-an-email", "secret-1"),
            registration("ada@acme", "secret-1"),
            registration("ada@acme.test", "12345"),
            RegisterInput {
                name: "  ".to_string(),
                ..registration("ada@acme.test", "secret-1")
            },
            RegisterInput {
                enterprise_name: String::new(),
                ..registration("ada@acme.test", "secret-1")
            },
        ] {
            let result = service.register(input).await;
            assert!(matches!(result, Err(Error::Validation(_))), "{:?}", result);
        }
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email() {
        let store = MockIdentityStore::with_users(vec![account("u-1", Some("ent-1"))]);
        let service = IdentityService::new(Arc::new(store), false);
        let result = service
            .register(registration("U-1@example.com", "secret-1"))
            .await;
        assert!(matches!(result, Err(Error::Auth(AuthError::EmailTaken))));

        let racing = MockIdentityStore {
            racing_insert: true,
            ..Default::default()
        };
        let service = IdentityService::new(Arc::new(racing), false);
        let result = service
            .register(registration("new@example.com", "secret-1"))
            .await;
        assert!(matches!(result, Err(Error::Auth(AuthError::EmailTaken))));
    }

    #[test]
    fn test_login_unknown_email_is_invalid_credentials() {
        let service = IdentityService::new(Arc::new(MockIdentityStore::default()), false);
        let result = service.login(LoginInput {
            email: "ghost@example.com".to_string(),
            password: "whatever".to_string(),
        });
        assert!(matches!(result, Err(Error::Auth(AuthError::InvalidCredentials))));
    }
}
