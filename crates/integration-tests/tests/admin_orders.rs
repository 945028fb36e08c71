//! End-to-end tests for the admin gate and the order status lifecycle.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use crown_shop_client::ClientError;
use crown_shop_core::api::{CreateOrderRequest, OrderLineRequest};
use crown_shop_core::{OrderStatus, Price, ProductId};
use crown_shop_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, TestContext};

#[tokio::test]
async fn test_status_moves_forward_one_step_at_a_time() {
    let ctx = TestContext::start().await;
    let placed = ctx.place_order(&[(1, 1), (2, 1)]).await;
    ctx.login().await;

    let orders = ctx.admin.list_orders().await.unwrap();
    let view = orders.first().unwrap();
    assert_eq!(view.order.id, placed.order_id);
    assert_eq!(view.order.status, OrderStatus::Pending);
    assert_eq!(view.next_status, Some(OrderStatus::Paid));

    // Skipping ahead is refused and changes nothing
    let skip = ctx
        .admin
        .update_status(placed.order_id, OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(skip.is_conflict());

    let paid = ctx.admin.advance(view).await.unwrap().unwrap();
    assert!(paid.success);
    assert_eq!(paid.status, OrderStatus::Paid);

    // Going back is refused
    let back = ctx
        .admin
        .update_status(placed.order_id, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert!(back.is_conflict());

    let mut seen = vec![OrderStatus::Paid];
    loop {
        let orders = ctx.admin.list_orders().await.unwrap();
        let view = orders.first().unwrap();
        assert_eq!(view.order.status, *seen.last().unwrap());
        match ctx.admin.advance(view).await.unwrap() {
            Some(updated) => seen.push(updated.status),
            None => break,
        }
    }
    assert_eq!(
        seen,
        vec![OrderStatus::Paid, OrderStatus::Shipped, OrderStatus::Completed]
    );

    let done = ctx.admin.list_orders().await.unwrap();
    assert_eq!(done.first().unwrap().next_status, None);
}

#[tokio::test]
async fn test_orders_listed_newest_first() {
    let ctx = TestContext::start().await;
    let first = ctx.place_order(&[(1, 1)]).await;
    let second = ctx.place_order(&[(2, 1)]).await;
    ctx.login().await;

    let ids: Vec<_> = ctx
        .admin
        .list_orders()
        .await
        .unwrap()
        .into_iter()
        .map(|view| view.order.id)
        .collect();
    assert_eq!(ids, vec![second.order_id, first.order_id]);
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let ctx = TestContext::start().await;
    ctx.login().await;

    let err = ctx
        .admin
        .update_status(crown_shop_core::OrderId::new(999), OrderStatus::Paid)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound));
    assert!(ctx.admin.is_logged_in());
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let ctx = TestContext::start().await;

    let err = ctx
        .admin
        .login(ADMIN_USERNAME, "not-the-password")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert!(!ctx.admin.is_logged_in());

    let err = ctx.admin.login("someone", ADMIN_PASSWORD).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
}

#[tokio::test]
async fn test_order_desk_requires_login() {
    let ctx = TestContext::start().await;
    let http = reqwest::Client::new();

    let response = http
        .get(format!("{}/api/admin/orders", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    let response = http
        .put(format!("{}/api/admin/orders/1", ctx.base_url))
        .bearer_auth("forged-token")
        .json(&serde_json::json!({"status": "paid"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_token_on_server() {
    let ctx = TestContext::start().await;
    let login = ctx
        .admin
        .login(ADMIN_USERNAME, ADMIN_PASSWORD)
        .await
        .unwrap();

    ctx.admin.logout().await.unwrap();
    assert!(!ctx.admin.is_logged_in());

    let response = reqwest::Client::new()
        .get(format!("{}/api/admin/orders", ctx.base_url))
        .bearer_auth(&login.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_logs_client_out() {
    let ctx = TestContext::start_with_token_ttl(Duration::from_millis(200)).await;
    ctx.login().await;
    assert!(ctx.admin.list_orders().await.is_ok());

    tokio::time::sleep(Duration::from_millis(400)).await;

    let err = ctx.admin.list_orders().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert!(!ctx.admin.is_logged_in());
}

#[tokio::test]
async fn test_concurrent_updates_only_one_wins() {
    let ctx = TestContext::start().await;
    let placed = ctx.place_order(&[(2, 2)]).await;

    let other = ctx.second_admin();
    ctx.login().await;
    other.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.unwrap();

    let (a, b) = tokio::join!(
        ctx.admin.update_status(placed.order_id, OrderStatus::Paid),
        other.update_status(placed.order_id, OrderStatus::Paid),
    );

    let wins = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    let loser = if a.is_ok() { b } else { a };
    assert!(loser.unwrap_err().is_conflict());
}

#[tokio::test]
async fn test_forged_total_is_rejected() {
    let ctx = TestContext::start().await;

    let request = CreateOrderRequest {
        name: "Zhao Min".to_string(),
        phone: "13500001111".to_string(),
        address: "5 Binjiang Road, Ningbo".to_string(),
        total_amount: Price::from_cents(100),
        items: vec![OrderLineRequest {
            id: ProductId::new(1),
            quantity: 1,
        }],
    };

    let err = ctx.shop.create_order(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected { status: 400, .. }));

    ctx.login().await;
    assert!(ctx.admin.list_orders().await.unwrap().is_empty());
}
