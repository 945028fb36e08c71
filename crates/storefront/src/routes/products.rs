//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crown_shop_core::{Product, ProductId};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// List every product.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.store().list_products().await?;
    Ok(Json(products))
}

/// Show one product. Unknown or non-numeric IDs are 404.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let not_found = || AppError::NotFound(format!("Product {id}"));

    let product_id: ProductId = id.parse().map_err(|_| not_found())?;
    let product = state
        .store()
        .get_product(product_id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(product))
}
