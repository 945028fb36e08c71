//! Shared request plumbing for the customer and admin clients.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL plus a pooled HTTP client.
#[derive(Debug, Clone)]
pub(crate) struct Api {
    http: Client,
    base: Url,
}

impl Api {
    pub(crate) fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        // `Url::join` replaces the last segment unless the path ends in a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, base })
    }

    pub(crate) const fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve an API path such as `api/products` against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        Ok(self.http.request(method, self.endpoint(path)?))
    }
}

/// Decode a JSON success body, or turn the response into a [`ClientError`].
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    Err(error_for(response).await)
}

/// Accept any success status and discard the body.
pub(crate) async fn expect_success(response: Response) -> Result<(), ClientError> {
    if response.status().is_success() {
        return Ok(());
    }
    Err(error_for(response).await)
}

async fn error_for(response: Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), "storefront rejected request");
    ClientError::from_response(status, &body)
}
