//! JWT configuration.
//!
//! Loaded once at startup from environment variables (a `.env` file is
//! honoured) or built programmatically, then validated.

use std::env;
use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::AuthError;

/// Environment variable holding the HMAC signing secret.
pub const SECRET_VAR: &str = "WSC_AUTH_JWT_SECRET";
/// Environment variable holding the access token TTL in milliseconds.
pub const ACCESS_TTL_VAR: &str = "WSC_AUTH_JWT_ACCESS_TOKEN_EXPIRATION";
/// Environment variable holding the refresh token TTL in milliseconds.
pub const REFRESH_TTL_VAR: &str = "WSC_AUTH_JWT_REFRESH_TOKEN_EXPIRATION";

/// Minimum secret length in bytes (256 bits, the HMAC-SHA256 floor).
pub const MIN_SECRET_BYTES: usize = 32;

const DEFAULT_ACCESS_TTL_MS: u64 = 900_000;
const DEFAULT_REFRESH_TTL_MS: u64 = 604_800_000;

/// Signing secret and token lifetimes.
pub struct JwtConfig {
    /// Symmetric signing material
    pub secret: SecretString,
    /// Access token TTL
    pub access_token_ttl: Duration,
    /// Refresh token TTL
    pub refresh_token_ttl: Duration,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

impl JwtConfig {
    /// Builds a configuration from a secret and TTLs in milliseconds.
    pub fn new(secret: impl Into<String>, access_ttl_ms: u64, refresh_ttl_ms: u64) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
            access_token_ttl: Duration::from_millis(access_ttl_ms),
            refresh_token_ttl: Duration::from_millis(refresh_ttl_ms),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is missing or a value is invalid.
    pub fn from_env() -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();

        let secret = env::var(SECRET_VAR)
            .map_err(|_| AuthError::config(format!("{SECRET_VAR} is required")))?;
        let access_ttl_ms = parse_env(ACCESS_TTL_VAR, DEFAULT_ACCESS_TTL_MS)?;
        let refresh_ttl_ms = parse_env(REFRESH_TTL_VAR, DEFAULT_REFRESH_TTL_MS)?;

        let config = Self::new(secret, access_ttl_ms, refresh_ttl_ms);
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AuthError> {
        let secret_len = self.secret.expose_secret().len();
        if secret_len < MIN_SECRET_BYTES {
            return Err(AuthError::config(format!(
                "JWT secret must be at least {MIN_SECRET_BYTES} bytes, got {secret_len}"
            )));
        }

        // exp and iat are whole seconds
        if self.access_token_ttl < Duration::from_secs(1) {
            return Err(AuthError::config("Access token TTL must be at least 1000 ms"));
        }
        if self.refresh_token_ttl < Duration::from_secs(1) {
            return Err(AuthError::config("Refresh token TTL must be at least 1000 ms"));
        }

        Ok(())
    }
}

/// Parse environment variable with default value.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AuthError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .parse()
            .map_err(|e| AuthError::config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
