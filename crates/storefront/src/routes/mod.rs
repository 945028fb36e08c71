//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store reachable)
//!
//! # Catalog
//! GET  /api/products           - All products
//! GET  /api/products/{id}      - One product
//!
//! # Checkout
//! POST /api/orders             - Submit an order
//!
//! # Admin (Authorization: Bearer)
//! POST /api/admin/login        - Exchange credentials for a token (rate limited)
//! POST /api/admin/logout       - Revoke the current token
//! GET  /api/admin/orders       - All orders, newest first
//! PUT  /api/admin/orders/{id}  - Advance an order's status
//! ```

pub mod admin;
pub mod health;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::login_rate_limiter;
use crate::state::AppState;

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/orders", post(orders::create))
        .nest("/admin", admin_routes())
}

/// Create the `/api/admin` router.
pub fn admin_routes() -> Router<AppState> {
    let login = Router::new()
        .route("/login", post(admin::login))
        .layer(login_rate_limiter());

    Router::new()
        .route("/logout", post(admin::logout))
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}", put(admin::update_order))
        .merge(login)
}
