use axum::{extract::State, response::Html};
use std::sync::Arc;

use super::auth::Viewer;
use super::{AppState, WebError, views};

/// GET /
/// Logged-in users see their own products, everyone else the landing page.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Viewer(viewer): Viewer,
) -> Result<Html<String>, WebError> {
    let products = match &viewer {
        Some(user) => state.products().list_for_owner(user.id).await?,
        None => Vec::new(),
    };

    Ok(views::home_page(viewer.as_ref(), &products))
}
