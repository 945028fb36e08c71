//! Customer-facing client: catalog reads and order submission.

use reqwest::Method;
use tracing::instrument;
use url::Url;

use crown_shop_core::api::{CreateOrderRequest, CreateOrderResponse};
use crown_shop_core::checkout::OrderGateway;
use crown_shop_core::{Product, ProductId};

use crate::error::ClientError;
use crate::http::{Api, decode};

/// Client for the public storefront endpoints.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ShopClient {
    api: Api,
}

impl ShopClient {
    /// Create a client for the storefront at `base_url`, e.g.
    /// `http://localhost:3000`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if `base_url` is not an absolute URL,
    /// or `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            api: Api::new(base_url)?,
        })
    }

    /// The normalized base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.api.base()
    }

    /// Fetch the whole catalog, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server answers non-2xx.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.api.request(Method::GET, "api/products")?.send().await?;
        decode(response).await
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ClientError> {
        let response = self
            .api
            .request(Method::GET, &format!("api/products/{id}"))?
            .send()
            .await?;
        decode(response).await
    }

    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` with status 400 if the server refuses
    /// the request (missing fields, unknown product, total mismatch).
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ClientError> {
        let response = self
            .api
            .request(Method::POST, "api/orders")?
            .json(request)
            .send()
            .await?;
        let created: CreateOrderResponse = decode(response).await?;
        tracing::info!(order_id = %created.order_id, "order submitted");
        Ok(created)
    }
}

impl OrderGateway for ShopClient {
    type Error = ClientError;

    async fn submit_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, Self::Error> {
        self.create_order(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ShopClient::new("http://127.0.0.1:3000/shop").unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:3000/shop/");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        // Port 9 (discard) is closed on test machines
        let client = ShopClient::new("http://127.0.0.1:9").unwrap();
        let err = client.get_products().await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
