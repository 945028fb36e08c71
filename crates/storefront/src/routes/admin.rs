//! Admin route handlers: login, logout, order desk.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use secrecy::ExposeSecret;
use tracing::instrument;

use crown_shop_core::OrderId;
use crown_shop_core::api::{
    AdminLoginRequest, AdminLoginResponse, AdminOrderView, UpdateStatusRequest,
    UpdateStatusResponse,
};

use crate::error::{AppError, Result, clear_sentry_user};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Exchange admin credentials for a bearer token.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AdminLoginRequest>, JsonRejection>,
) -> Result<Json<AdminLoginResponse>> {
    let Json(request) = payload?;

    let issued = state
        .admin_auth()
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(AdminLoginResponse {
        username: issued.session.username,
        token: issued.token.expose_secret().to_owned(),
        expires_at: issued.session.expires_at,
    }))
}

/// Revoke the caller's token.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
) -> StatusCode {
    state.admin_auth().logout(&session).await;
    clear_sentry_user();
    StatusCode::NO_CONTENT
}

/// All orders, newest first, each with the single status it may move to.
#[instrument(skip_all)]
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
) -> Result<Json<Vec<AdminOrderView>>> {
    let orders = state.store().list_orders().await?;
    tracing::debug!(admin = %session.username, count = orders.len(), "Listing orders");
    Ok(Json(orders.into_iter().map(AdminOrderView::from).collect()))
}

/// Advance one order to its next status.
#[instrument(skip(state, session, payload))]
pub async fn update_order(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<UpdateStatusResponse>> {
    let order_id: OrderId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("Order {id}")))?;
    let Json(request) = payload?;

    let order = state
        .orders()
        .update_status(order_id, &request.status)
        .await?;
    tracing::info!(
        admin = %session.username,
        order_id = %order.id,
        status = %order.status,
        "Admin updated order"
    );

    Ok(Json(UpdateStatusResponse {
        success: true,
        id: order.id,
        status: order.status,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use crown_shop_core::api::ErrorBody;
    use crown_shop_core::{OrderStatus, Price, ProductId};

    use super::*;
    use crate::db::{NewOrder, OrderStore};
    use crate::routes::test_support::{admin_token, json, send, test_app};
    use crown_shop_core::OrderLineSnapshot;

    fn new_order(name: &str) -> NewOrder {
        NewOrder {
            customer_name: name.to_string(),
            phone: "13900000000".to_string(),
            address: "Hangzhou".to_string(),
            total_amount: Price::from_cents(10_000),
            items: vec![OrderLineSnapshot {
                id: ProductId::new(1),
                title: "Crystal Tiara".to_string(),
                unit_price: Price::from_cents(10_000),
                quantity: 1,
            }],
        }
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_401() {
        let (app, _) = test_app();

        let response = send(
            &app,
            Method::POST,
            "/api/admin/login",
            None,
            Some(json!({"username": "admin", "password": "admin123"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: ErrorBody = json(response).await;
        assert_eq!(body.error, "Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_is_rate_limited() {
        let (app, _) = test_app();
        let attempt = json!({"username": "admin", "password": "nope"});

        let mut statuses = Vec::new();
        for _ in 0..7 {
            let response = send(
                &app,
                Method::POST,
                "/api/admin/login",
                None,
                Some(attempt.clone()),
            )
            .await;
            statuses.push(response.status());
        }

        assert_eq!(statuses.first(), Some(&StatusCode::UNAUTHORIZED));
        assert_eq!(statuses.last(), Some(&StatusCode::TOO_MANY_REQUESTS));
    }

    #[tokio::test]
    async fn test_orders_require_token() {
        let (app, store) = test_app();
        let order = store.create_order(new_order("a")).await.unwrap();

        let response = send(&app, Method::GET, "/api/admin/orders", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(
            &app,
            Method::PUT,
            &format!("/api/admin/orders/{}", order.id),
            Some("secret-admin-token"),
            Some(json!({"status": "paid"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let unchanged = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_with_next_status() {
        let (app, store) = test_app();
        store.create_order(new_order("first")).await.unwrap();
        store.create_order(new_order("second")).await.unwrap();
        let token = admin_token(&app).await;

        let response = send(&app, Method::GET, "/api/admin/orders", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let orders: Vec<AdminOrderView> = json(response).await;
        assert_eq!(orders.len(), 2);
        assert_eq!(orders.first().unwrap().order.customer_name, "second");
        assert!(
            orders
                .iter()
                .all(|view| view.next_status == Some(OrderStatus::Paid))
        );
    }

    #[tokio::test]
    async fn test_update_status_flow() {
        let (app, store) = test_app();
        let order = store.create_order(new_order("a")).await.unwrap();
        let token = admin_token(&app).await;
        let uri = format!("/api/admin/orders/{}", order.id);

        let response = send(&app, Method::PUT, &uri, Some(&token), Some(json!({"status": "paid"}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: UpdateStatusResponse = json(response).await;
        assert!(body.success);
        assert_eq!(body.status, OrderStatus::Paid);

        // Backwards
        let response = send(&app, Method::PUT, &uri, Some(&token), Some(json!({"status": "pending"}))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Skip
        let response = send(&app, Method::PUT, &uri, Some(&token), Some(json!({"status": "completed"}))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Unknown status
        let response = send(&app, Method::PUT, &uri, Some(&token), Some(json!({"status": "refunded"}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let stored = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_update_unknown_order_is_404() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;

        for uri in ["/api/admin/orders/404", "/api/admin/orders/abc"] {
            let response =
                send(&app, Method::PUT, uri, Some(&token), Some(json!({"status": "paid"}))).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;

        let response = send(&app, Method::POST, "/api/admin/logout", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::GET, "/api/admin/orders", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
