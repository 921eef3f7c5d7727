//! Process-wide HMAC signing key.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use secrecy::ExposeSecret;

use crate::config::{JwtConfig, MIN_SECRET_BYTES};
use crate::error::AuthError;

/// Symmetric key material shared by every codec operation.
///
/// The HMAC variant follows the secret length: 64 bytes or more signs with
/// HS512, 48 or more with HS384, anything else with HS256.
pub struct SigningKey {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Derives the key from raw secret bytes.
    pub fn from_secret(secret: &[u8]) -> Result<Self, AuthError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(AuthError::config(format!(
                "JWT secret must be at least {MIN_SECRET_BYTES} bytes, got {}",
                secret.len()
            )));
        }

        Ok(Self {
            algorithm: algorithm_for(secret.len()),
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self, AuthError> {
        Self::from_secret(config.secret.expose_secret().as_bytes())
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

fn algorithm_for(secret_len: usize) -> Algorithm {
    match secret_len {
        n if n >= 64 => Algorithm::HS512,
        n if n >= 48 => Algorithm::HS384,
        _ => Algorithm::HS256,
    }
}
