//! Admin authentication extractor.
//!
//! Admin endpoints take a [`RequireAdmin`] argument. It reads the
//! `Authorization: Bearer <token>` header and resolves it through the admin
//! auth service; anything else is rejected with 401 before the handler runs.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::services::admin_auth::AdminSession;
use crate::state::AppState;

/// Extractor that requires a valid admin bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_orders(
///     RequireAdmin(session): RequireAdmin,
///     State(state): State<AppState>,
/// ) -> Result<Json<Vec<AdminOrderView>>> {
///     tracing::info!(admin = %session.username, "listing orders");
///     // ...
/// }
/// ```
pub struct RequireAdmin(pub AdminSession);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let session = state.admin_auth().authenticate(token).await?;
        set_sentry_user(&session.username);

        Ok(Self(session))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. Returns `None` for a missing
/// header, another scheme or an empty token.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
