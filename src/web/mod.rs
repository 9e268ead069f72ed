use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{
    ExpiredDeletion, SessionManagerLayer,
    cookie::{Key, SameSite},
};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::Config;
use crate::services::{AuthService, ProductService};
use crate::state::SharedState;

mod assets;
pub mod auth;
mod error;
pub mod forms;
mod home;
mod observability;
mod products;
pub mod views;

pub use error::WebError;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub session_key: Key,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn products(&self) -> &Arc<dyn ProductService> {
        &self.shared.product_service
    }
}

pub fn create_app_state(shared: Arc<SharedState>) -> anyhow::Result<Arc<AppState>> {
    let session_key = auth::derive_session_key(&shared.config.security.secret_key)?;

    Ok(Arc::new(AppState {
        shared,
        session_key,
    }))
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared)
}

/// Build the application router.
///
/// Sessions live in the same SQLite database as the rest of the data. Expired
/// rows are purged once here, the store drops stale sessions on load anyway.
pub async fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let session_store = SqliteStore::new(state.store().conn.get_sqlite_connection_pool().clone());
    session_store.migrate().await?;
    session_store.delete_expired().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(state.config().server.secure_cookies)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_signed(state.session_key.clone());

    let protected_routes = create_protected_router(state.clone());

    Ok(Router::new()
        .merge(protected_routes)
        .route("/", get(home::index))
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::show_product))
        .route("/products/delete/{id}", get(products::delete_product))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/static/{*path}", get(assets::serve_asset))
        .layer(session_layer)
        .with_state(state)
        .layer(middleware::from_fn(observability::record_metrics))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(observability::request_span)
                .on_response(observability::log_response),
        )
        .layer(middleware::from_fn(observability::security_headers)))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/products/add",
            get(products::add_form).post(products::add_product),
        )
        .route(
            "/products/edit/{id}",
            get(products::edit_form).post(products::edit_product),
        )
        .route("/logout", get(auth::logout))
        .route_layer(middleware::from_fn_with_state(state, auth::require_login))
}
