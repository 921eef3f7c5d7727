//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use auth_token::error::AuthError;
use auth_token::jwt::{Claims, TokenKind};
use auth_token::principal::JwtUser;
use auth_token::service::{JwtTokenService, TokenService};
use auth_token::{JwtConfig, PasswordEncoder, UserInfo};
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;

/// 36 bytes, signs with HS256.
pub const SECRET: &str = "test-secret-key-12345678901234567890";
pub const ACCESS_TTL_MS: u64 = 3_600_000;
pub const REFRESH_TTL_MS: u64 = 7_200_000;

pub fn config() -> JwtConfig {
    JwtConfig::new(SECRET, ACCESS_TTL_MS, REFRESH_TTL_MS)
}

pub fn token_service() -> JwtTokenService {
    JwtTokenService::from_config(&config()).unwrap()
}

pub fn user() -> UserInfo {
    UserInfo::new(1, "Teste", "teste@email.com", "ADMIN")
}

/// Signs an arbitrary claim object with [`SECRET`], bypassing the builder.
pub fn forge(claims: &Value) -> String {
    forge_with(claims, SECRET.as_bytes())
}

pub fn forge_with(claims: &Value, secret: &[u8]) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

/// Application-side user record.
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl Account {
    pub fn teste() -> Self {
        Self {
            id: 1,
            name: "Teste".to_string(),
            email: "teste@email.com".to_string(),
            role: "ADMIN".to_string(),
        }
    }
}

impl JwtUser for Account {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn role(&self) -> &str {
        &self.role
    }
}

/// Stores passwords as `plain:<raw>`.
pub struct PlainEncoder;

impl PasswordEncoder for PlainEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{raw_password}"))
    }

    fn matches(&self, raw_password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        Ok(stored_hash == format!("plain:{raw_password}"))
    }
}

/// Token service that counts every signing call.
pub struct CountingTokenService {
    inner: JwtTokenService,
    issued: AtomicUsize,
}

impl CountingTokenService {
    pub fn new(inner: JwtTokenService) -> Arc<Self> {
        Arc::new(Self {
            inner,
            issued: AtomicUsize::new(0),
        })
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }
}

impl TokenService for CountingTokenService {
    fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        self.inner.decode_at(token, now)
    }

    fn issue(
        &self,
        kind: TokenKind,
        principal: &dyn JwtUser,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        self.issued.fetch_add(1, Ordering::SeqCst);
        self.inner.issue(kind, principal, issued_at)
    }

    fn access_token_ttl(&self) -> Duration {
        self.inner.access_token_ttl()
    }

    fn refresh_token_ttl(&self) -> Duration {
        self.inner.refresh_token_ttl()
    }
}
