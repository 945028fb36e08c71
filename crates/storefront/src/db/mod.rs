//! Persistence for the catalog and orders.
//!
//! # Database: `crown_shop`
//!
//! ## Tables
//!
//! - `products` - Catalog managed out of band (seeded with `crown-cli seed products`)
//! - `orders` - Checkout submissions with an item snapshot and lifecycle status
//!
//! # Stores
//!
//! Handlers never touch a pool directly. They go through the [`CatalogStore`]
//! and [`OrderStore`] traits, implemented by [`PgStore`] for production and by
//! [`MemoryStore`] for tests and local demos.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p crown-shop-cli -- migrate
//! ```

pub mod memory;
pub mod orders;
pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crown_shop_core::{Order, OrderId, OrderLineSnapshot, OrderStatus, Price, Product, ProductId};

pub use memory::MemoryStore;
pub use orders::OrderRepository;
pub use products::{ProductRecord, ProductRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// An order ready to be persisted. The store assigns ID, status and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub total_amount: Price,
    pub items: Vec<OrderLineSnapshot>,
}

/// Read access to the product catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All products, ordered by ID.
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    /// One product, or `None` if no such ID exists.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// The subset of `ids` that exist, in no particular order.
    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;
}

/// Order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new order in `pending` status.
    async fn create_order(&self, order: NewOrder) -> Result<Order, RepositoryError>;

    /// All orders, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError>;

    /// One order, or `None` if no such ID exists.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Set the status of `id` to `to`, but only if it is currently `from`.
    ///
    /// Returns the updated order, or `None` if the order does not exist or its
    /// status is no longer `from`.
    async fn compare_and_set_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError>;
}

/// Everything the HTTP layer needs from storage.
#[async_trait]
pub trait Store: CatalogStore + OrderStore {
    /// Liveness check for `/health/ready`.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).list().await
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).get_by_id(id).await
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).get_many(ids).await
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn create_order(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        OrderRepository::new(&self.pool).create(&order).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        OrderRepository::new(&self.pool).list_newest_first().await
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        OrderRepository::new(&self.pool).get_by_id(id).await
    }

    async fn compare_and_set_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        OrderRepository::new(&self.pool)
            .compare_and_set_status(id, from, to)
            .await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
