//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_PASSWORD_HASH` - Argon2 PHC hash of the admin password
//!   (generate with `crown-cli admin hash-password`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `ADMIN_USERNAME` - Admin login name (default: admin)
//! - `ADMIN_TOKEN_TTL_SECS` - Admin bearer token lifetime (default: 43200, 12 hours)
//! - `PAYMENT_TYPE` - Payment method shown after checkout (default: `bank_transfer`)
//! - `PAYMENT_BANK` - Bank name for transfers
//! - `PAYMENT_ACCOUNT_NUMBER` - Account number for transfers
//! - `PAYMENT_ACCOUNT_NAME` - Account holder for transfers
//! - `CORS_ALLOWED_ORIGINS` - Comma-separated origins allowed to call the API
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crown_shop_core::OrderId;
use crown_shop_core::api::PaymentInfo;

const DEFAULT_TOKEN_TTL_SECS: u64 = 12 * 60 * 60;
const MAX_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;
const MIN_ADMIN_PASSWORD_LENGTH: usize = 12;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Account text returned when no bank details are configured.
const FALLBACK_ACCOUNT_TEXT: &str = "Please see frontend instructions";

/// Blocklist of common weak password patterns (case-insensitive)
const WEAK_PASSWORD_PATTERNS: &[&str] = &[
    "admin",
    "password",
    "123456",
    "qwerty",
    "changeme",
    "secret",
    "crown",
    "letmein",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Admin gate configuration
    pub admin: AdminConfig,
    /// Payment instructions shown after checkout
    pub payment: PaymentConfig,
    /// Origins allowed to call the API cross-origin (empty = same-origin only)
    pub cors_allowed_origins: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0-1.0)
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate (0.0-1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Admin gate configuration.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone)]
pub struct AdminConfig {
    /// Admin login name
    pub username: String,
    /// Argon2 PHC string of the admin password
    pub password_hash: SecretString,
    /// How long an issued bearer token stays valid
    pub token_ttl: Duration,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Static payment instructions (no payment gateway).
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Payment method, e.g. `bank_transfer`
    pub kind: String,
    /// Bank name
    pub bank: Option<String>,
    /// Account number
    pub account_number: Option<String>,
    /// Account holder
    pub account_name: Option<String>,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            kind: "bank_transfer".to_string(),
            bank: None,
            account_number: None,
            account_name: None,
        }
    }
}

impl PaymentConfig {
    /// Human-readable account description, e.g. `招商银行 / 1234-5678 / CROWN SHOP`.
    #[must_use]
    pub fn account_text(&self) -> String {
        let parts: Vec<&str> = [&self.bank, &self.account_number, &self.account_name]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect();
        if parts.is_empty() {
            FALLBACK_ACCOUNT_TEXT.to_string()
        } else {
            parts.join(" / ")
        }
    }

    /// Payment instructions for a freshly created order.
    #[must_use]
    pub fn instructions_for(&self, order_id: OrderId) -> PaymentInfo {
        PaymentInfo {
            kind: self.kind.clone(),
            account: self.account_text(),
            reference: format!("#{order_id}"),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the admin password hash is not a valid PHC string.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let admin = AdminConfig::from_env()?;
        let payment = PaymentConfig::from_env();
        let cors_allowed_origins = get_optional_env("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origin_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            database_url,
            host,
            port,
            admin,
            payment,
            cors_allowed_origins,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_optional_env("SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            sentry_traces_sample_rate: get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.1),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let password_hash = get_required_secret("ADMIN_PASSWORD_HASH")?;
        validate_password_hash(&password_hash, "ADMIN_PASSWORD_HASH")?;

        let ttl_secs = get_env_or_default("ADMIN_TOKEN_TTL_SECS", &DEFAULT_TOKEN_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ADMIN_TOKEN_TTL_SECS".to_string(), e.to_string())
            })?;
        if ttl_secs == 0 || ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::InvalidEnvVar(
                "ADMIN_TOKEN_TTL_SECS".to_string(),
                format!("must be between 1 and {MAX_TOKEN_TTL_SECS}"),
            ));
        }

        Ok(Self {
            username: get_env_or_default("ADMIN_USERNAME", "admin"),
            password_hash,
            token_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl PaymentConfig {
    fn from_env() -> Self {
        Self {
            kind: get_env_or_default("PAYMENT_TYPE", "bank_transfer"),
            bank: get_optional_env("PAYMENT_BANK"),
            account_number: get_optional_env("PAYMENT_ACCOUNT_NUMBER"),
            account_name: get_optional_env("PAYMENT_ACCOUNT_NAME"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Load only the database URL, for tools that never start the server.
///
/// Reads `STOREFRONT_DATABASE_URL`, falling back to `DATABASE_URL`.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if neither variable is set.
pub fn database_url_from_env() -> Result<SecretString, ConfigError> {
    let _ = dotenvy::dotenv();
    get_database_url("STOREFRONT_DATABASE_URL")
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Validate that the configured admin hash is an Argon2 PHC string.
fn validate_password_hash(hash: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let parsed = argon2::PasswordHash::new(hash.expose_secret()).map_err(|e| {
        ConfigError::InvalidEnvVar(var_name.to_string(), format!("not a PHC hash string: {e}"))
    })?;
    if !parsed.algorithm.as_str().starts_with("argon2") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("expected an argon2 hash, got {}", parsed.algorithm),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Reject admin passwords that are short, common, or low-entropy.
///
/// Used by `crown-cli admin hash-password` before a hash is produced.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` describing the first failed check.
pub fn validate_admin_password(password: &str) -> Result<(), ConfigError> {
    const NAME: &str = "admin password";

    let length = password.chars().count();
    if length < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            NAME.to_string(),
            format!("must be at least {MIN_ADMIN_PASSWORD_LENGTH} characters (got {length})"),
        ));
    }

    let lower = password.to_lowercase();
    for pattern in WEAK_PASSWORD_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                NAME.to_string(),
                format!("contains a common pattern ('{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(password);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            NAME.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
