//! Credential and refresh-token exchange.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AuthError;
use crate::jwt::TokenKind;
use crate::password::PasswordEncoder;
use crate::principal::{JwtUser, UserInfo};
use crate::service::token::TokenService;

/// `token_type` of every [`AuthResponse`].
pub const BEARER: &str = "Bearer";

/// Token pair handed back by a successful login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token expiry, epoch milliseconds: issue time plus the access
    /// TTL. The token's own `exp` is truncated to whole seconds, so it can
    /// fall up to 999 ms before this value.
    pub expires_at: i64,
    pub user_info: UserInfo,
}

/// Verifies credentials and refresh tokens, minting a new pair for each
/// success.
///
/// Every successful call reads the clock once; the access and the refresh
/// token of a pair share their issued-at.
#[derive(Clone)]
pub struct AuthenticationService {
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordEncoder>,
}

impl AuthenticationService {
    pub fn new(tokens: Arc<dyn TokenService>, passwords: Arc<dyn PasswordEncoder>) -> Self {
        Self { tokens, passwords }
    }

    /// Hashes a password with the configured encoder.
    pub fn hash(&self, raw_password: &str) -> Result<String, AuthError> {
        self.passwords.encode(raw_password)
    }

    pub fn authenticate(
        &self,
        raw_password: &str,
        stored_hash: &str,
        principal: &dyn JwtUser,
    ) -> Result<AuthResponse, AuthError> {
        self.authenticate_at(raw_password, stored_hash, principal, Utc::now())
    }

    /// Checks the password and mints a pair issued at `now`.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` when the password does not match or the stored
    /// hash cannot be read. No token is minted in that case.
    pub fn authenticate_at(
        &self,
        raw_password: &str,
        stored_hash: &str,
        principal: &dyn JwtUser,
        now: DateTime<Utc>,
    ) -> Result<AuthResponse, AuthError> {
        match self.passwords.matches(raw_password, stored_hash) {
            Ok(true) => {}
            Ok(false) => {
                warn!(user_id = principal.id(), "Password rejected");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                warn!(user_id = principal.id(), error = %e, "Stored password hash unusable");
                return Err(AuthError::InvalidCredentials);
            }
        }

        let response = self.issue_pair(UserInfo::snapshot(principal), now)?;
        info!(user_id = response.user_info.id, "Authenticated with password");
        Ok(response)
    }

    pub fn authenticate_with_refresh(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        self.authenticate_with_refresh_at(refresh_token, Utc::now())
    }

    /// Exchanges a refresh token for a brand-new pair issued at `now`.
    ///
    /// The presented token is neither reused nor revoked; it keeps working
    /// until it expires.
    ///
    /// # Errors
    ///
    /// `TokenInvalid` if the token does not verify at `now`,
    /// `WrongTokenType` if it verifies but is not a refresh token.
    pub fn authenticate_with_refresh_at(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthResponse, AuthError> {
        let principal = self
            .tokens
            .require_kind_at(refresh_token, TokenKind::Refresh, now)?;

        let response = self.issue_pair(principal, now)?;
        info!(user_id = response.user_info.id, "Rotated token pair");
        Ok(response)
    }

    fn issue_pair(&self, user_info: UserInfo, now: DateTime<Utc>) -> Result<AuthResponse, AuthError> {
        let access_token = self.tokens.issue_access(&user_info, now)?;
        let refresh_token = self.tokens.issue_refresh(&user_info, now)?;

        let ttl_ms = i64::try_from(self.tokens.access_token_ttl().as_millis())
            .map_err(|_| AuthError::Encoding("Access token TTL overflows".to_string()))?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            token_type: BEARER.to_string(),
            expires_at: now.timestamp_millis() + ttl_ms,
            user_info,
        })
    }
}
