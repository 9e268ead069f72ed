//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::repositories::user::{hash_password_blocking, verify_password};
use crate::db::{Store, User};
use crate::services::auth_service::{AuthError, AuthService};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

fn record_auth_event(event: &'static str, outcome: &'static str) {
    metrics::counter!("auth_events_total", "event" => event, "outcome" => outcome).increment(1);
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        if self.store.get_user_by_username(username).await?.is_some() {
            record_auth_event("register", "duplicate");
            return Err(AuthError::UserExists);
        }

        let password_hash = hash_password_blocking(password, &self.security).await?;

        // A concurrent registration can still win the race between the lookup and the insert.
        let user = self
            .store
            .create_user(username, &password_hash)
            .await?
            .ok_or(AuthError::UserExists)?;

        record_auth_event("register", "success");
        info!(user_id = user.id, "Registered user {}", user.username);
        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let Some((user, password_hash)) = self
            .store
            .get_user_by_username_with_password(username)
            .await?
        else {
            record_auth_event("login", "unknown_user");
            return Err(AuthError::UserNotFound);
        };

        if !verify_password(&password_hash, password).await? {
            record_auth_event("login", "bad_password");
            warn!(user_id = user.id, "Rejected login with incorrect password");
            return Err(AuthError::IncorrectPassword);
        }

        record_auth_event("login", "success");
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(id).await?)
    }
}
