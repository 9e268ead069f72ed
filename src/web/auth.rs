use argon2::Argon2;
use axum::{
    Form,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::{Expiry, Session, cookie::Key};

use super::forms::{LoginForm, RegisterForm};
use super::views::{self, Notice};
use super::{AppState, WebError};
use crate::config::{MAX_REMEMBER_ME_DAYS, SecurityConfig};
use crate::db::User;

/// Session key holding the logged-in user's id.
pub const USER_ID_KEY: &str = "user_id";

const SESSION_KEY_SALT: &[u8] = b"storefront.session-cookie";

const SECONDS_PER_DAY: i64 = 86_400;

/// Stretch the configured secret into the 64 bytes the cookie signer needs.
pub fn derive_session_key(secret: &str) -> anyhow::Result<Key> {
    let mut bytes = [0u8; 64];
    Argon2::default()
        .hash_password_into(secret.as_bytes(), SESSION_KEY_SALT, &mut bytes)
        .map_err(|e| anyhow::anyhow!("Failed to derive session key: {e}"))?;

    Key::try_from(&bytes[..]).map_err(|e| anyhow::anyhow!("Invalid session key: {e}"))
}

// ============================================================================
// Session helpers
// ============================================================================

/// Resolve the session's user id to a user row.
///
/// A session pointing at a user that no longer exists counts as anonymous.
async fn session_user(state: &AppState, session: &Session) -> Result<Option<User>, WebError> {
    let Some(user_id) = session.get::<i32>(USER_ID_KEY).await? else {
        return Ok(None);
    };

    Ok(state.auth().get_user(user_id).await?)
}

/// Inactivity window for remembered sessions, bounded so the store's expiry
/// date arithmetic cannot overflow.
fn remember_duration(security: &SecurityConfig) -> Result<time::Duration, WebError> {
    Some(security.remember_me_days)
        .filter(|days| (1..=MAX_REMEMBER_ME_DAYS).contains(days))
        .and_then(|days| days.checked_mul(SECONDS_PER_DAY))
        .map(time::Duration::seconds)
        .ok_or_else(|| {
            WebError::InternalError(format!(
                "remember_me_days out of range: {}",
                security.remember_me_days
            ))
        })
}

async fn start_session(
    session: &Session,
    user: &User,
    remember: bool,
    security: &SecurityConfig,
) -> Result<(), WebError> {
    let expiry = if remember {
        Expiry::OnInactivity(remember_duration(security)?)
    } else {
        Expiry::OnSessionEnd
    };

    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user.id).await?;
    session.set_expiry(Some(expiry));

    tracing::Span::current().record("user_id", user.id);
    Ok(())
}

/// The logged-in user, if any, for pages that do not require a login.
pub struct Viewer(pub Option<User>);

impl FromRequestParts<Arc<AppState>> for Viewer {
    type Rejection = WebError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>() {
            return Ok(Self(Some(user.clone())));
        }

        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| WebError::session(msg))?;

        Ok(Self(session_user(state, &session).await?))
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Login gate for the routes that need a user.
///
/// Anonymous requests are redirected to the login page; otherwise the user is
/// stored in the request extensions for `Extension<User>` extractors.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let Some(user) = session_user(&state, &session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    tracing::Span::current().record("user_id", user.id);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /login
pub async fn login_form(Viewer(viewer): Viewer) -> impl IntoResponse {
    views::login_page(viewer.as_ref(), None)
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let username = form.username.as_deref().unwrap_or_default();
    let password = form.password.as_deref().unwrap_or_default();

    match state.auth().login(username, password).await {
        Ok(user) => {
            let remember = form.remember();
            start_session(&session, &user, remember, &state.config().security).await?;
            tracing::info!(user_id = user.id, remember, "User logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) if e.is_user_facing() => {
            Ok(views::login_page(None, Some(&Notice::error(e.to_string()))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /register
pub async fn register_form(Viewer(viewer): Viewer) -> impl IntoResponse {
    views::register_page(viewer.as_ref(), None)
}

/// POST /register
/// Creates the user and logs them in right away.
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Viewer(viewer): Viewer,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    let username = form.username.as_deref().unwrap_or_default();
    let password = form.password.as_deref().unwrap_or_default();

    match state.auth().register(username, password).await {
        Ok(user) => {
            start_session(&session, &user, false, &state.config().security).await?;
            Ok(
                views::register_page(Some(&user), Some(&Notice::success("User created")))
                    .into_response(),
            )
        }
        Err(e) if e.is_user_facing() => Ok(views::register_page(
            viewer.as_ref(),
            Some(&Notice::error(e.to_string())),
        )
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// GET /logout
pub async fn logout(session: Session) -> Result<Redirect, WebError> {
    session.flush().await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_is_deterministic() {
        let a = derive_session_key("X!7RV*wr3GFFnA8dn88Mmc").unwrap();
        let b = derive_session_key("X!7RV*wr3GFFnA8dn88Mmc").unwrap();
        let c = derive_session_key("another secret").unwrap();

        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }

    #[test]
    fn test_remember_duration_never_panics() {
        let mut security = SecurityConfig::default();
        assert_eq!(
            remember_duration(&security).unwrap(),
            time::Duration::days(365)
        );

        for days in [0, -5, MAX_REMEMBER_ME_DAYS + 1, i64::MAX / 1000, i64::MAX] {
            security.remember_me_days = days;
            assert!(remember_duration(&security).is_err(), "{days}");
        }
    }
}
