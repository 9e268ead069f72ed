use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::services::{AuthError, ProductError};

use super::views;

/// Failures that cannot be shown inline in a form.
///
/// Expected outcomes (missing fields, wrong password, ...) never become a
/// `WebError`; handlers render those back into the page with status 200.
#[derive(Debug)]
pub enum WebError {
    DatabaseError(String),

    SessionError(String),

    InternalError(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            WebError::SessionError(msg) => write!(f, "Session error: {}", msg),
            WebError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for WebError {}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match &self {
            WebError::DatabaseError(msg) => tracing::error!("Database error: {}", msg),
            WebError::SessionError(msg) => tracing::error!("Session error: {}", msg),
            WebError::InternalError(msg) => tracing::error!("Internal error: {}", msg),
        }

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        (status, views::error_page(status)).into_response()
    }
}

impl From<anyhow::Error> for WebError {
    fn from(err: anyhow::Error) -> Self {
        WebError::InternalError(format!("{err:#}"))
    }
}

impl From<tower_sessions::session::Error> for WebError {
    fn from(err: tower_sessions::session::Error) -> Self {
        WebError::SessionError(err.to_string())
    }
}

impl From<AuthError> for WebError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(msg) => WebError::DatabaseError(msg),
            other => WebError::InternalError(other.to_string()),
        }
    }
}

impl From<ProductError> for WebError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Database(msg) => WebError::DatabaseError(msg),
            other => WebError::InternalError(other.to_string()),
        }
    }
}

impl WebError {
    pub fn session(msg: impl Into<String>) -> Self {
        WebError::SessionError(msg.into())
    }
}
