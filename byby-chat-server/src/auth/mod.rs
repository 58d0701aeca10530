//! Registration and login.
//!
//! [`AuthService`] owns the password scheme and works against any
//! [`UserStore`]. Outcomes the user can fix (duplicate email, bad password,
//! missing fields) are distinct [`AuthError`] variants so the route layer can
//! turn them into notices instead of error pages.

pub mod password;

pub use password::{PasswordError, PasswordScheme};

use std::fmt;

use byby_core::db::is_unique_violation;
use thiserror::Error;
use tracing::{info, warn};

use crate::entities::{NewUser, User, UserStore};

/// Which unique field a registration collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Email,
    Username,
}

impl fmt::Display for ConflictField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictField::Email => "email",
            ConflictField::Username => "username",
        })
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0} is already registered")]
    Conflict(ConflictField),

    /// Unknown email or wrong password; the two are not distinguished.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct AuthService {
    scheme: PasswordScheme,
    admin_username: Option<String>,
}

impl AuthService {
    pub fn new(scheme: PasswordScheme) -> Self {
        Self {
            scheme,
            admin_username: None,
        }
    }

    /// Reserve `username` for the administrator. Public registration can no
    /// longer claim it; only [`AuthService::ensure_admin`] creates it.
    pub fn with_admin_username(mut self, username: impl Into<String>) -> Self {
        self.admin_username = Some(username.into());
        self
    }

    pub fn scheme(&self) -> PasswordScheme {
        self.scheme
    }

    fn is_reserved(&self, username: &str) -> bool {
        self.admin_username
            .as_deref()
            .is_some_and(|admin| admin.eq_ignore_ascii_case(username))
    }

    /// Create a user. `username` defaults to the email when absent or blank.
    ///
    /// Existing rows are checked first; a concurrent registration that slips
    /// past the check is caught by the storage UNIQUE constraints and
    /// reported as the same conflict. The admin username is always taken.
    pub async fn register<S: UserStore>(
        &self,
        store: &S,
        email: &str,
        username: Option<&str>,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = email.trim();
        validate(email, password)?;
        let username = username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(email);

        if self.is_reserved(username) {
            warn!(email, "registration tried the admin username");
            return Err(AuthError::Conflict(ConflictField::Username));
        }
        self.create(store, email, username, password).await
    }

    /// Make sure the administrator account exists, creating it under the
    /// reserved username when `email` is not registered yet.
    pub async fn ensure_admin<S: UserStore>(
        &self,
        store: &S,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = email.trim();
        validate(email, password)?;
        let Some(admin) = self.admin_username.as_deref() else {
            return Err(AuthError::InvalidInput("no admin username configured"));
        };
        if let Some(user) = store.find_user_by_email(email).await? {
            if user.username != admin {
                warn!(user_id = user.id, "admin email belongs to a regular user");
                return Err(AuthError::Conflict(ConflictField::Email));
            }
            return Ok(user);
        }
        self.create(store, email, admin, password).await
    }

    async fn create<S: UserStore>(
        &self,
        store: &S,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if store.find_user_by_email(email).await?.is_some() {
            return Err(AuthError::Conflict(ConflictField::Email));
        }
        if store.find_user_by_username(username).await?.is_some() {
            return Err(AuthError::Conflict(ConflictField::Username));
        }

        let scheme = self.scheme;
        let password = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || scheme.hash(&password)).await??;

        let new_user = NewUser {
            email: email.to_owned(),
            username: username.to_owned(),
            password_hash,
        };
        match store.insert_user(new_user).await {
            Ok(user) => {
                info!(user_id = user.id, username = %user.username, "user registered");
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => {
                warn!(email, "registration lost a uniqueness race");
                let field = if store.find_user_by_email(email).await?.is_some() {
                    ConflictField::Email
                } else {
                    ConflictField::Username
                };
                Err(AuthError::Conflict(field))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials and return the user on success.
    pub async fn login<S: UserStore>(
        &self,
        store: &S,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let Some(user) = store.find_user_by_email(email.trim()).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        let password = password.to_owned();
        let stored = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || password::verify(&password, &stored)).await??;

        if matches {
            info!(user_id = user.id, "login succeeded");
            Ok(user)
        } else {
            warn!(user_id = user.id, "login rejected");
            Err(AuthError::InvalidCredentials)
        }
    }
}

fn validate(email: &str, password: &str) -> Result<(), AuthError> {
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::InvalidInput("a valid email address is required"));
    }
    if password.is_empty() {
        return Err(AuthError::InvalidInput("a password is required"));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entities::AnyStore;
    use byby_core::db::DatabaseSettings;

    async fn store() -> AnyStore {
        AnyStore::connect(&DatabaseSettings::in_memory())
            .await
            .expect("in-memory store")
    }

    #[tokio::test]
    async fn register_then_login() {
        let store = store().await;
        let auth = AuthService::new(PasswordScheme::Argon2);
        let user = auth
            .register(&store, " an@example.com ", None, "s3cret")
            .await
            .expect("register");
        assert_eq!(user.email, "an@example.com");
        assert_eq!(user.username, "an@example.com");
        assert!(user.password_hash.starts_with("$argon2id$"));

        let logged_in = auth
            .login(&store, "an@example.com", "s3cret")
            .await
            .expect("login");
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let store = store().await;
        let auth = AuthService::new(PasswordScheme::Argon2);
        auth.register(&store, "an@example.com", Some("an"), "s3cret")
            .await
            .expect("register");

        let wrong = auth.login(&store, "an@example.com", "nope").await.unwrap_err();
        let unknown = auth.login(&store, "who@example.com", "s3cret").await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = store().await;
        let auth = AuthService::new(PasswordScheme::LegacySha256);
        auth.register(&store, "an@example.com", None, "one")
            .await
            .expect("register");
        let err = auth
            .register(&store, "an@example.com", Some("someone-else"), "two")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(ConflictField::Email)));
        assert_eq!(store.list_users().await.expect("users").len(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let store = store().await;
        let auth = AuthService::new(PasswordScheme::LegacySha256);
        auth.register(&store, "a@example.com", Some("an"), "one")
            .await
            .expect("register");
        let err = auth
            .register(&store, "b@example.com", Some("an"), "two")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(ConflictField::Username)));
    }

    #[tokio::test]
    async fn admin_username_cannot_be_registered() {
        let store = store().await;
        let auth = AuthService::new(PasswordScheme::LegacySha256).with_admin_username("admin");
        for username in ["admin", " Admin "] {
            let err = auth
                .register(&store, "mallory@example.com", Some(username), "pw")
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::Conflict(ConflictField::Username)), "{username:?}");
        }
        assert!(store.list_users().await.expect("users").is_empty());
    }

    #[tokio::test]
    async fn ensure_admin_creates_once() {
        let store = store().await;
        let auth = AuthService::new(PasswordScheme::LegacySha256).with_admin_username("admin");
        let first = auth
            .ensure_admin(&store, "boss@example.com", "pw")
            .await
            .expect("create admin");
        assert_eq!(first.username, "admin");
        let again = auth
            .ensure_admin(&store, "boss@example.com", "other")
            .await
            .expect("existing admin");
        assert_eq!(again.id, first.id);
        assert_eq!(store.list_users().await.expect("users").len(), 1);

        auth.register(&store, "an@example.com", Some("an"), "pw")
            .await
            .expect("register");
        let err = auth
            .ensure_admin(&store, "an@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(ConflictField::Email)));
    }

    #[tokio::test]
    async fn concurrent_duplicates_create_one_row() {
        let store = store().await;
        let auth = AuthService::new(PasswordScheme::Argon2);
        let (a, b) = tokio::join!(
            auth.register(&store, "race@example.com", None, "one"),
            auth.register(&store, "race@example.com", None, "two"),
        );

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|r| matches!(r, Err(AuthError::Conflict(ConflictField::Email))))
        );
        assert_eq!(store.list_users().await.expect("users").len(), 1);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_storage() {
        let store = store().await;
        let auth = AuthService::new(PasswordScheme::LegacySha256);
        for (email, password) in [("", "pw"), ("no-at-sign", "pw"), ("an@example.com", "")] {
            let err = auth.register(&store, email, None, password).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidInput(_)), "{email:?}/{password:?}");
        }
        assert!(store.list_users().await.expect("users").is_empty());
    }

    #[tokio::test]
    async fn legacy_rows_still_log_in_under_argon2() {
        let store = store().await;
        AuthService::new(PasswordScheme::LegacySha256)
            .register(&store, "old@example.com", None, "s3cret")
            .await
            .expect("register");

        let user = AuthService::new(PasswordScheme::Argon2)
            .login(&store, "old@example.com", "s3cret")
            .await
            .expect("login");
        assert_eq!(user.password_hash.len(), 64);
    }
}
