//! Admin client: login, order desk and status updates.
//!
//! The client keeps the bearer token from the last successful login. Any 401
//! from an admin endpoint means the server no longer accepts that token
//! (expired, revoked or the server restarted), so the stored token is dropped
//! and the caller must log in again.

use std::sync::{Mutex, PoisonError};

use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crown_shop_core::api::{
    AdminLoginRequest, AdminLoginResponse, AdminOrderView, UpdateStatusRequest,
    UpdateStatusResponse,
};
use crown_shop_core::{OrderId, OrderStatus};

use crate::error::ClientError;
use crate::http::{Api, decode, expect_success};

/// Client for the `/api/admin` endpoints.
pub struct AdminClient {
    api: Api,
    token: Mutex<Option<SecretString>>,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.api.base().as_str())
            .field("logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    /// Create a logged-out admin client for the storefront at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            api: Api::new(base_url)?,
            token: Mutex::new(None),
        })
    }

    /// Whether a token from a previous login is held.
    ///
    /// The server may still reject it; that is only discovered on the next call.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.slot().is_some()
    }

    /// Log in and keep the returned token for later calls.
    ///
    /// A failed login also drops any token held from before.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` for wrong credentials, or
    /// `ClientError::Rejected` with status 429 when rate limited.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminLoginResponse, ClientError> {
        let body = AdminLoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .api
            .request(Method::POST, "api/admin/login")?
            .json(&body)
            .send()
            .await?;

        match decode::<AdminLoginResponse>(response).await {
            Ok(login) => {
                *self.slot() = Some(SecretString::from(login.token.clone()));
                tracing::info!(expires_at = %login.expires_at, "admin logged in");
                Ok(login)
            }
            Err(err) => {
                self.forget();
                Err(err)
            }
        }
    }

    /// Revoke the current token and forget it locally.
    ///
    /// Succeeds without a request when no token is held, and also when the
    /// server had already stopped accepting the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails in transit; the local token is
    /// forgotten regardless.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ClientError> {
        let Some(token) = self.slot().take() else {
            return Ok(());
        };

        let response = self
            .api
            .request(Method::POST, "api/admin/logout")?
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        match expect_success(response).await {
            Ok(()) | Err(ClientError::Unauthorized) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// List all orders, newest first, each with its allowed next status.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` (and forgets the token) if the
    /// server rejects the token.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<AdminOrderView>, ClientError> {
        let response = self.authorized(Method::GET, "api/admin/orders")?.send().await?;
        self.check_auth(decode(response).await)
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// - `ClientError::Unauthorized` if the token is missing or rejected
    /// - `ClientError::NotFound` if the order does not exist
    /// - `ClientError::Rejected` with status 409 if `status` is not the order's
    ///   next status, or another admin moved it first
    #[instrument(skip_all, fields(order_id = %id, status = %status))]
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<UpdateStatusResponse, ClientError> {
        let body = UpdateStatusRequest {
            status: status.as_str().to_string(),
        };
        let response = self
            .authorized(Method::PUT, &format!("api/admin/orders/{id}"))?
            .json(&body)
            .send()
            .await?;
        self.check_auth(decode(response).await)
    }

    /// Advance an order to its next status, if it has one.
    ///
    /// Returns `Ok(None)` for a completed order without sending a request.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update_status`].
    pub async fn advance(
        &self,
        order: &AdminOrderView,
    ) -> Result<Option<UpdateStatusResponse>, ClientError> {
        match order.next_status {
            Some(next) => self.update_status(order.order.id, next).await.map(Some),
            None => Ok(None),
        }
    }

    /// Build a request carrying the stored bearer token.
    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let slot = self.slot();
        let token = slot.as_ref().ok_or(ClientError::Unauthorized)?;
        Ok(self
            .api
            .request(method, path)?
            .bearer_auth(token.expose_secret()))
    }

    /// Forget the token when the server says it is no longer valid.
    fn check_auth<T>(&self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if matches!(result, Err(ClientError::Unauthorized)) {
            tracing::warn!("admin token rejected, logging out");
            self.forget();
        }
        result
    }

    fn forget(&self) {
        *self.slot() = None;
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<SecretString>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_calls_without_login_fail_locally() {
        let client = AdminClient::new("http://127.0.0.1:9").unwrap();
        assert!(!client.is_logged_in());

        assert!(matches!(
            client.list_orders().await,
            Err(ClientError::Unauthorized)
        ));
        assert!(matches!(
            client.update_status(OrderId::new(1), OrderStatus::Paid).await,
            Err(ClientError::Unauthorized)
        ));
        client.logout().await.unwrap();
    }

    #[test]
    fn test_check_auth_forgets_token() {
        let client = AdminClient::new("http://127.0.0.1:9").unwrap();
        *client.slot() = Some(SecretString::from("token"));
        assert!(client.is_logged_in());

        let kept: Result<(), ClientError> = client.check_auth(Err(ClientError::NotFound));
        assert!(kept.is_err());
        assert!(client.is_logged_in());

        let dropped: Result<(), ClientError> = client.check_auth(Err(ClientError::Unauthorized));
        assert!(dropped.is_err());
        assert!(!client.is_logged_in());
    }

    #[test]
    fn test_debug_hides_token() {
        let client = AdminClient::new("http://127.0.0.1:9").unwrap();
        *client.slot() = Some(SecretString::from("super-secret-token"));
        let debug = format!("{client:?}");
        assert!(debug.contains("logged_in: true"));
        assert!(!debug.contains("super-secret-token"));
    }
}
