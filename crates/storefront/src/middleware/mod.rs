//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. CORS (only when origins are configured)
//! 3. `TraceLayer` (request span)
//! 4. Request ID (recorded into the span, echoed in the response)
//! 5. Security headers
//! 6. Rate limiting on `POST /api/admin/login` (governor)
//!
//! Admin endpoints additionally extract [`RequireAdmin`].

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use auth::{RequireAdmin, bearer_token};
pub use rate_limit::login_rate_limiter;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
