use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use tracing::debug;

use crate::error::{AuthError, InvalidTokenReason};
use crate::jwt::claims::Claims;
use crate::jwt::key::SigningKey;

/// Signs claim sets into compact JWS strings and verifies them back.
///
/// Verification checks the signature and the expiry in a single call; no
/// method hands out claims of an unsigned or expired token.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: Arc<SigningKey>,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(key: Arc<SigningKey>) -> Self {
        let mut validation = Validation::new(key.algorithm());
        // exp is checked against the caller's clock reading in verify_and_decode_at
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        TokenCodec { key, validation }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.key.algorithm()
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let header = Header::new(self.key.algorithm());
        encode(&header, claims, self.key.encoding_key())
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    pub fn verify_and_decode(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_and_decode_at(token, Utc::now())
    }

    pub fn verify_and_decode_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, self.key.decoding_key(), &self.validation)
            .map_err(|e| {
                let err = AuthError::from(e);
                debug!(error = %err, "Token verification failed");
                err
            })?;

        let claims = token_data.claims;
        if claims.is_expired_at(now) {
            debug!(exp = claims.exp, "Token expired");
            return Err(AuthError::TokenInvalid {
                reason: InvalidTokenReason::Expired,
            });
        }

        Ok(claims)
    }
}
