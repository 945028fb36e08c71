//! Error types for the storefront client.

use reqwest::StatusCode;
use thiserror::Error;

use crown_shop_core::api::ErrorBody;

/// Errors that can occur when talking to the storefront.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got a response, or the response was not valid JSON.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing, expired or revoked admin token, or wrong credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The product or order does not exist.
    #[error("not found")]
    NotFound,

    /// The server refused the request.
    #[error("rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message from the `{"error": ...}` body, or the raw body text.
        message: String,
    },

    /// The base URL could not be parsed or joined.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Whether the server answered 409 Conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Rejected { status: 409, .. })
    }

    /// Map a non-success response to an error.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::NOT_FOUND => Self::NotFound,
            _ => Self::Rejected {
                status: status.as_u16(),
                message: rejection_message(status, body),
            },
        }
    }
}

/// Pull the message out of an error body.
///
/// The storefront answers `{"error": "..."}`; the login rate limiter answers
/// plain text. An empty body falls back to the status reason.
fn rejection_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ClientError::from_response(StatusCode::UNAUTHORIZED, r#"{"error":"Unauthorized"}"#),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            ClientError::from_response(StatusCode::NOT_FOUND, ""),
            ClientError::NotFound
        ));
    }

    #[test]
    fn test_rejected_reads_error_body() {
        let err = ClientError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"address is required"}"#,
        );
        assert_eq!(err.to_string(), "rejected (400): address is required");
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_rejected_plain_text_and_empty_body() {
        let err = ClientError::from_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Too Many Requests! Wait for 6s",
        );
        assert!(matches!(
            err,
            ClientError::Rejected { status: 429, ref message } if message.starts_with("Too Many")
        ));

        let err = ClientError::from_response(StatusCode::CONFLICT, "");
        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "rejected (409): Conflict");
    }
}
