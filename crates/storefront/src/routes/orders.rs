//! Checkout route handler.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::instrument;

use crown_shop_core::api::{CreateOrderRequest, CreateOrderResponse};

use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Submit an order.
///
/// The body is validated and priced against the catalog before anything is
/// stored. The response carries the new order ID and static payment
/// instructions.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>> {
    let Json(request) = payload?;

    let order = state.orders().place_order(&request).await?;

    let order_id = order.id.to_string();
    add_breadcrumb("checkout", "Order created", Some(&[("order_id", order_id.as_str())]));

    Ok(Json(CreateOrderResponse {
        order_id: order.id,
        message: "Order created".to_string(),
        payment_info: state.config().payment.instructions_for(order.id),
    }))
}
