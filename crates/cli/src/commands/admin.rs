//! Admin account setup.
//!
//! The storefront has a single admin account configured through
//! `ADMIN_USERNAME` and `ADMIN_PASSWORD_HASH`. This command produces the hash.
//!
//! # Usage
//!
//! ```bash
//! # Prompted on stdin so the password stays out of shell history
//! crown-cli admin hash-password
//!
//! # Non-interactive
//! echo "$PASSWORD" | crown-cli admin hash-password
//! ```

use std::io::BufRead;

use argon2::Params;
use thiserror::Error;

use crown_shop_storefront::config::{ConfigError, validate_admin_password};
use crown_shop_storefront::services::admin_auth::{self, AdminAuthError};

/// Errors that can occur during admin setup.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Password failed the strength checks.
    #[error(transparent)]
    WeakPassword(#[from] ConfigError),

    /// Hashing failed.
    #[error("Password hashing failed: {0}")]
    Hash(#[from] AdminAuthError),

    /// Could not read the password.
    #[error("Failed to read password: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing was entered.
    #[error("No password given")]
    Empty,
}

/// Read one line from stdin as the password.
///
/// # Errors
///
/// Returns `AdminError::Empty` if the line is blank.
pub fn read_password_from_stdin() -> Result<String, AdminError> {
    tracing::info!("Enter the admin password, then press Enter:");

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();

    if password.is_empty() {
        return Err(AdminError::Empty);
    }
    Ok(password)
}

/// Check and hash an admin password with production Argon2 parameters.
///
/// # Errors
///
/// Returns `AdminError::Empty` for an empty password, or
/// `AdminError::WeakPassword` if the strength checks fail and `allow_weak` is
/// not set.
pub fn hash_password(password: &str, allow_weak: bool) -> Result<String, AdminError> {
    if password.is_empty() {
        return Err(AdminError::Empty);
    }
    if allow_weak {
        tracing::warn!("Skipping password strength checks");
    } else {
        validate_admin_password(password)?;
    }

    let hash = admin_auth::hash_password(password, Params::default())?;
    tracing::info!("Set ADMIN_PASSWORD_HASH to the line printed below");
    Ok(hash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_password_rejected() {
        assert!(matches!(
            hash_password("password1234", false),
            Err(AdminError::WeakPassword(_))
        ));
        assert!(matches!(hash_password("", true), Err(AdminError::Empty)));
    }

    #[test]
    fn test_strong_password_produces_argon2id_hash() {
        let hash = hash_password("vT9#qL2!mZ7&rW4^", false).unwrap();
        assert!(hash.starts_with("$argon2id$v=19$"));
    }
}
