//! End-to-end test harness for Crown Shop.
//!
//! Each [`TestContext`] starts a real storefront on an ephemeral local port,
//! backed by an in-memory store, and hands out HTTP clients pointed at it.
//! No database or external service is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p crown-shop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Catalog reads and customer checkout
//! - `admin_orders` - Admin login, order desk and status lifecycle

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use argon2::Params;
use secrecy::SecretString;
use tokio::task::JoinHandle;

use crown_shop_client::{AdminClient, ShopClient};
use crown_shop_core::api::{CreateOrderRequest, CreateOrderResponse, OrderLineRequest};
use crown_shop_core::{Price, Product, ProductId};
use crown_shop_storefront::config::{AdminConfig, PaymentConfig, StorefrontConfig};
use crown_shop_storefront::db::MemoryStore;
use crown_shop_storefront::services::admin_auth::hash_password;
use crown_shop_storefront::state::AppState;

/// Admin login name configured on every test server.
pub const ADMIN_USERNAME: &str = "owner";

/// Admin password configured on every test server.
pub const ADMIN_PASSWORD: &str = "Gq8$wN3!pX6@tB1%";

/// Seed catalog for test servers.
#[must_use]
pub fn catalog() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new(1),
            title: "Baroque Crystal Crown".to_string(),
            price: Price::from_cents(29_900),
            images: vec!["/img/baroque-1.jpg".to_string()],
            stock: 2,
            category: "crown".to_string(),
        },
        Product {
            id: ProductId::new(2),
            title: "Silk Bridal Veil".to_string(),
            price: Price::from_cents(12_850),
            images: vec!["/img/veil-1.jpg".to_string(), "/img/veil-2.jpg".to_string()],
            stock: 10,
            category: "veil".to_string(),
        },
        Product {
            id: ProductId::new(3),
            title: "Pearl Hair Comb".to_string(),
            price: Price::from_cents(4_599),
            images: Vec::new(),
            stock: 0,
            category: "hair".to_string(),
        },
    ]
}

/// Server configuration with cheap Argon2 parameters and the given token TTL.
#[must_use]
pub fn test_config(token_ttl: Duration) -> StorefrontConfig {
    let params = Params::new(1024, 1, 1, None).expect("valid argon2 params");
    let password_hash = hash_password(ADMIN_PASSWORD, params).expect("hash test password");

    StorefrontConfig {
        database_url: SecretString::from("postgres://unused"),
        host: "127.0.0.1".parse().expect("valid IP"),
        port: 0,
        admin: AdminConfig {
            username: ADMIN_USERNAME.to_string(),
            password_hash: SecretString::from(password_hash),
            token_ttl,
        },
        payment: PaymentConfig {
            kind: "bank_transfer".to_string(),
            bank: Some("中国银行".to_string()),
            account_number: Some("6013-8200-0000-0042".to_string()),
            account_name: Some("Crown Shop Ltd".to_string()),
        },
        cors_allowed_origins: Vec::new(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A running storefront plus clients pointed at it.
pub struct TestContext {
    /// Base URL such as `http://127.0.0.1:41234`.
    pub base_url: String,
    /// The server's store, for asserting on persisted state.
    pub store: Arc<MemoryStore>,
    /// Customer client.
    pub shop: ShopClient,
    /// Admin client, logged out.
    pub admin: AdminClient,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start a server with a 1 hour admin token TTL.
    pub async fn start() -> Self {
        Self::start_with_token_ttl(Duration::from_secs(3600)).await
    }

    /// Start a server whose admin tokens expire after `token_ttl`.
    pub async fn start_with_token_ttl(token_ttl: Duration) -> Self {
        let store = Arc::new(MemoryStore::with_products(catalog()));
        let state = AppState::new(test_config(token_ttl), store.clone());
        let app = crown_shop_storefront::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");

        let server = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("test server crashed");
        });

        let base_url = format!("http://{addr}");
        Self {
            shop: ShopClient::new(&base_url).expect("shop client"),
            admin: AdminClient::new(&base_url).expect("admin client"),
            base_url,
            store,
            server,
        }
    }

    /// Another admin client for the same server, logged out.
    #[must_use]
    pub fn second_admin(&self) -> AdminClient {
        AdminClient::new(&self.base_url).expect("admin client")
    }

    /// Log the context's admin client in.
    pub async fn login(&self) {
        self.admin
            .login(ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .expect("admin login");
    }

    /// Place an order for `lines` with the correct total and a valid address.
    pub async fn place_order(&self, lines: &[(i32, u32)]) -> CreateOrderResponse {
        let catalog = catalog();
        let total = lines.iter().fold(Price::ZERO, |total, &(id, quantity)| {
            let product = catalog
                .iter()
                .find(|p| p.id == ProductId::new(id))
                .expect("product in catalog");
            total + product.price.times(quantity)
        });

        let request = CreateOrderRequest {
            name: "Chen Jing".to_string(),
            phone: "13812345678".to_string(),
            address: "88 Nanjing Road, Shanghai".to_string(),
            total_amount: total,
            items: lines
                .iter()
                .map(|&(id, quantity)| OrderLineRequest {
                    id: ProductId::new(id),
                    quantity,
                })
                .collect(),
        };

        self.shop
            .create_order(&request)
            .await
            .expect("order accepted")
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}
