//! Token issuance, verification and classification.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::JwtConfig;
use crate::error::AuthError;
use crate::jwt::{Claims, ClaimsBuilder, SigningKey, TokenCodec, TokenKind};
use crate::principal::{JwtUser, UserInfo};

/// Token lifecycle operations.
///
/// Implementors provide decoding, minting and the two lifetimes; the
/// classification and rotation operations are derived from those.
/// Classification is total: a token that fails verification is neither an
/// access nor a refresh token, so no call order is required of callers.
pub trait TokenService: Send + Sync {
    /// Verifies `token` against `now` and returns its claims.
    fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError>;

    /// Mints a signed token of `kind` for `principal`, issued at `issued_at`.
    fn issue(
        &self,
        kind: TokenKind,
        principal: &dyn JwtUser,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError>;

    fn access_token_ttl(&self) -> Duration;

    fn refresh_token_ttl(&self) -> Duration;

    fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode_at(token, Utc::now())
    }

    /// Verifies then projects the identity claims.
    fn extract_principal(&self, token: &str) -> Result<UserInfo, AuthError> {
        self.decode(token)?.principal()
    }

    /// True iff verification fails for any reason.
    fn is_invalid(&self, token: &str) -> bool {
        self.decode(token).is_err()
    }

    /// Kind of a verified token, `None` when the `type` claim is unknown.
    fn token_kind(&self, token: &str) -> Result<Option<TokenKind>, AuthError> {
        Ok(self.decode(token)?.kind())
    }

    fn is_access_token(&self, token: &str) -> bool {
        self.decode(token)
            .map(|claims| claims.is_kind(TokenKind::Access))
            .unwrap_or(false)
    }

    fn is_refresh_token(&self, token: &str) -> bool {
        self.decode(token)
            .map(|claims| claims.is_kind(TokenKind::Refresh))
            .unwrap_or(false)
    }

    fn issue_access(
        &self,
        principal: &dyn JwtUser,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        self.issue(TokenKind::Access, principal, issued_at)
    }

    fn issue_refresh(
        &self,
        principal: &dyn JwtUser,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        self.issue(TokenKind::Refresh, principal, issued_at)
    }

    /// Verifies `token`, requires the `type` claim to be `kind` and returns
    /// the principal it carries.
    fn require_kind_at(
        &self,
        token: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<UserInfo, AuthError> {
        let claims = self.decode_at(token, now)?;

        if !claims.is_kind(kind) {
            warn!(
                expected = %kind,
                found = claims.token_type.as_deref().unwrap_or("none"),
                "Token presented with wrong type"
            );
            return Err(AuthError::WrongTokenType {
                expected: kind,
                found: claims.token_type,
            });
        }

        claims.principal()
    }

    /// Exchanges a refresh token for a fresh access token.
    fn rotate_access_from_refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let principal = self.require_kind_at(refresh_token, TokenKind::Refresh, now)?;
        self.issue_access(&principal, now)
    }

    /// Exchanges a refresh token for a fresh refresh token.
    fn rotate_refresh_from_refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let principal = self.require_kind_at(refresh_token, TokenKind::Refresh, now)?;
        self.issue_refresh(&principal, now)
    }
}

/// HMAC-signed JWT implementation of [`TokenService`].
#[derive(Debug, Clone)]
pub struct JwtTokenService {
    codec: TokenCodec,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl JwtTokenService {
    pub fn new(codec: TokenCodec, access_token_ttl: Duration, refresh_token_ttl: Duration) -> Self {
        JwtTokenService {
            codec,
            access_token_ttl,
            refresh_token_ttl,
        }
    }

    /// Validates the configuration and derives the signing key from it.
    pub fn from_config(config: &JwtConfig) -> Result<Self, AuthError> {
        config.validate()?;
        let key = SigningKey::from_config(config)?;

        Ok(Self::new(
            TokenCodec::new(Arc::new(key)),
            config.access_token_ttl,
            config.refresh_token_ttl,
        ))
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_token_ttl,
            TokenKind::Refresh => self.refresh_token_ttl,
        }
    }
}

impl TokenService for JwtTokenService {
    fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        self.codec.verify_and_decode_at(token, now)
    }

    fn issue(
        &self,
        kind: TokenKind,
        principal: &dyn JwtUser,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = ClaimsBuilder::new(kind)
            .principal(principal)
            .issued_at(issued_at)
            .ttl(self.ttl(kind))
            .build()?;

        let token = self.codec.sign(&claims)?;

        debug!(
            kind = %kind,
            subject = %claims.sub,
            exp = claims.exp,
            "Issued token"
        );

        Ok(token)
    }

    fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }
}
