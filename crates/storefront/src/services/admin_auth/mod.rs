//! Admin gate: password login and expiring bearer tokens.
//!
//! There is a single admin account configured through the environment. A
//! successful login mints a random 256-bit token. Only its SHA-256 digest is
//! kept server-side, in a `moka` cache whose time-to-live matches the token
//! lifetime.

mod error;

pub use error::AdminAuthError;

use std::time::Duration;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use moka::future::Cache;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::config::AdminConfig;

/// Random bytes per token before encoding.
const TOKEN_BYTES: usize = 32;

/// Upper bound on concurrently valid tokens.
const MAX_SESSIONS: u64 = 1_000;

/// A logged-in admin, as resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    /// Admin username.
    pub username: String,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token stops working.
    pub expires_at: DateTime<Utc>,
    token_digest: String,
}

/// A freshly minted token. The raw value is only ever handed to the client.
pub struct IssuedToken {
    pub token: SecretString,
    pub session: AdminSession,
}

/// Admin authentication service.
///
/// Cheap to share behind `AppState`; the session cache is internally
/// synchronized.
pub struct AdminAuthService {
    username: String,
    password_hash: SecretString,
    token_ttl: Duration,
    sessions: Cache<String, AdminSession>,
}

impl AdminAuthService {
    /// Create the service from admin configuration.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_live(config.token_ttl)
            .build();

        Self {
            username: config.username.clone(),
            password_hash: config.password_hash.clone(),
            token_ttl: config.token_ttl,
            sessions,
        }
    }

    /// Verify credentials and issue a new bearer token.
    ///
    /// The password is always checked, even for an unknown username, so the
    /// response time does not reveal which part was wrong.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` if either value is wrong.
    /// Returns `AdminAuthError::PasswordHash` if the configured hash is unusable.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AdminAuthError> {
        let hash = self.password_hash.expose_secret().to_owned();
        let candidate = password.to_owned();
        let password_ok = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
            .await
            .map_err(|_| AdminAuthError::PasswordHash)??;

        if !password_ok || username != self.username {
            tracing::warn!(username, "Admin login rejected");
            return Err(AdminAuthError::InvalidCredentials);
        }

        let lifetime =
            TimeDelta::from_std(self.token_ttl).map_err(|_| AdminAuthError::TokenLifetime)?;
        let issued_at = Utc::now();
        let expires_at = issued_at
            .checked_add_signed(lifetime)
            .ok_or(AdminAuthError::TokenLifetime)?;

        let token = generate_token();
        let session = AdminSession {
            username: self.username.clone(),
            issued_at,
            expires_at,
            token_digest: digest_token(&token),
        };
        self.sessions
            .insert(session.token_digest.clone(), session.clone())
            .await;

        tracing::info!(username = %session.username, %expires_at, "Admin logged in");
        Ok(IssuedToken {
            token: SecretString::from(token),
            session,
        })
    }

    /// Resolve a bearer token to its session.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidToken` if the token is unknown, revoked
    /// or expired.
    pub async fn authenticate(&self, token: &str) -> Result<AdminSession, AdminAuthError> {
        let digest = digest_token(token);
        let session = self
            .sessions
            .get(&digest)
            .await
            .ok_or(AdminAuthError::InvalidToken)?;

        if session.expires_at <= Utc::now() {
            self.sessions.invalidate(&digest).await;
            return Err(AdminAuthError::InvalidToken);
        }

        Ok(session)
    }

    /// Revoke the token behind `session`. Returns whether it was still live.
    pub async fn logout(&self, session: &AdminSession) -> bool {
        let revoked = self.sessions.remove(&session.token_digest).await.is_some();
        tracing::info!(username = %session.username, revoked, "Admin logged out");
        revoked
    }
}

/// Hash a password into an Argon2id PHC string with the given cost `params`.
///
/// # Errors
///
/// Returns `AdminAuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str, params: Params) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AdminAuthError::PasswordHash)
}

/// Verify a password against a PHC hash. Cost parameters come from the hash.
fn verify_password(password: &str, hash: &str) -> Result<bool, AdminAuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AdminAuthError::PasswordHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(AdminAuthError::PasswordHash),
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn digest_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
