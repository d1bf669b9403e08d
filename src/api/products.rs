//! Product endpoints - thin handlers over [`crate::core::products`].

use super::AppState;
use crate::{
    core::products,
    entities::product,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

/// GET /restaurants/:restaurant_id/products - list a restaurant's catalog
#[instrument(skip(state))]
pub async fn index_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i32>,
) -> Result<Json<Vec<products::ProductWithCategory>>> {
    let listed = products::list_by_restaurant(&state.db, restaurant_id).await?;
    Ok(Json(listed))
}

/// GET /products/:product_id - public single product with its category
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<products::ProductWithCategory>> {
    let fetched = products::get_with_category(&state.db, product_id).await?;
    Ok(Json(fetched))
}

/// POST /products - create a product
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<products::NewProduct>,
) -> Result<Json<product::Model>> {
    let created = products::create_product(&state.db, payload).await?;
    Ok(Json(created))
}

/// PUT /products/:product_id - partial update
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(payload): Json<products::ProductChanges>,
) -> Result<Json<product::Model>> {
    let updated = products::update_product(&state.db, product_id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /products/:product_id - delete, reporting the outcome as a message
///
/// A zero-row match is a success with a "could not delete" message, never an
/// error.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<String>> {
    let removed = products::delete_product(&state.db, product_id).await?;
    let message = if removed == 1 {
        format!("Successfully deleted product id.{product_id}")
    } else {
        "Could not delete product.".to_string()
    };
    Ok(Json(message))
}

/// GET /products/popular - top 3 products by units sold
#[instrument(skip(state))]
pub async fn popular(
    State(state): State<AppState>,
) -> Result<Json<Vec<products::PopularProduct>>> {
    let ranking = products::popular_products(&state.db).await?;
    Ok(Json(ranking))
}

/// PATCH /products/:product_id/promote - toggle promotion participation
#[instrument(skip(state))]
pub async fn toggle_promote(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<product::Model>> {
    let toggled = products::toggle_promotion(&state.db, product_id).await?;
    Ok(Json(toggled))
}

/// GET /restaurants/:restaurant_id/products/:product_id - single product,
/// repriced first when the restaurant runs a discount
#[instrument(skip(state))]
pub async fn show_with_discount(
    State(state): State<AppState>,
    Path((restaurant_id, product_id)): Path<(i32, i32)>,
) -> Result<Json<products::ProductWithCategory>> {
    let fetched =
        products::product_with_live_discount(&state.db, restaurant_id, product_id).await?;
    Ok(Json(fetched))
}

/// PATCH /restaurants/:restaurant_id/products/discount - apply the
/// restaurant's discount across its catalog and return the refreshed list
#[instrument(skip(state))]
pub async fn apply_discount(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i32>,
) -> Result<Json<Vec<products::ProductWithCategory>>> {
    let refreshed = products::apply_restaurant_discount(&state.db, restaurant_id).await?;
    Ok(Json(refreshed))
}
