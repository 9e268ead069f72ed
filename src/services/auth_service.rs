//! Domain service for registration and login.
//!
//! Session handling lives in the web layer; this service only answers
//! "who is this" questions against the user table.

use thiserror::Error;

use crate::db::User;

/// Errors specific to authentication operations.
///
/// The first four variants are expected outcomes of a form submission and
/// their `Display` text is shown to the user as-is.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please fill out all fields")]
    MissingFields,

    #[error("User already exists")]
    UserExists,

    #[error("User does not exist")]
    UserNotFound,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether the error should be rendered back into the form instead of
    /// failing the request.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::MissingFields | Self::UserExists | Self::UserNotFound | Self::IncorrectPassword
        )
    }
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a user with a freshly hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UserExists`] if the username is taken and
    /// [`AuthError::MissingFields`] if either value is empty.
    async fn register(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Verifies credentials and returns the matching user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UserNotFound`] or [`AuthError::IncorrectPassword`]
    /// if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Loads the user a session points at.
    async fn get_user(&self, id: i32) -> Result<Option<User>, AuthError>;
}
