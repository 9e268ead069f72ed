use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use std::sync::Arc;

use super::auth::Viewer;
use super::views::{self, Notice};
use super::{AppState, WebError};
use crate::db::User;
use crate::services::ProductFields;

/// GET /products
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Viewer(viewer): Viewer,
) -> Result<Html<String>, WebError> {
    let products = state.products().list_all().await?;
    Ok(views::products_page(viewer.as_ref(), &products))
}

/// GET /products/{id}
pub async fn show_product(
    State(state): State<Arc<AppState>>,
    Viewer(viewer): Viewer,
    Path(id): Path<i32>,
) -> Result<Html<String>, WebError> {
    let product = state.products().get(id).await?;
    Ok(views::product_page(viewer.as_ref(), product.as_ref()))
}

/// GET /products/add
pub async fn add_form(Extension(user): Extension<User>) -> Html<String> {
    views::add_product_page(&user, &ProductFields::default(), None)
}

/// POST /products/add
pub async fn add_product(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Form(fields): Form<ProductFields>,
) -> Result<Html<String>, WebError> {
    match state.products().create(user.id, &fields).await {
        Ok(product) => {
            tracing::info!(product_id = product.id, owner = user.id, "Product added");
            Ok(views::add_product_page(
                &user,
                &fields,
                Some(&Notice::success("Product added")),
            ))
        }
        Err(e) if e.is_user_facing() => Ok(views::add_product_page(
            &user,
            &ProductFields::default(),
            Some(&Notice::error(e.to_string())),
        )),
        Err(e) => Err(e.into()),
    }
}

/// GET /products/edit/{id}
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
) -> Result<Html<String>, WebError> {
    let product = state.products().get(id).await?;
    Ok(views::edit_product_page(&user, id, product.as_ref(), None))
}

/// POST /products/edit/{id}
///
/// On a validation error the stored values are shown again, untouched.
pub async fn edit_product(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i32>,
    Form(fields): Form<ProductFields>,
) -> Result<Html<String>, WebError> {
    let current = state.products().get(id).await?;

    match state.products().update(id, &fields).await {
        Ok(_) => {
            let product = state.products().get(id).await?;
            Ok(views::edit_product_page(
                &user,
                id,
                product.as_ref(),
                Some(&Notice::success("Product edited")),
            ))
        }
        Err(e) if e.is_user_facing() => Ok(views::edit_product_page(
            &user,
            id,
            current.as_ref(),
            Some(&Notice::error(e.to_string())),
        )),
        Err(e) => Err(e.into()),
    }
}

/// GET /products/delete/{id}
/// Deleting an id that does not exist is not an error.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Redirect, WebError> {
    state.products().delete(id).await?;
    Ok(Redirect::to("/products"))
}
