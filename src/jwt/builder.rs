use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::AuthError;
use crate::jwt::claims::{Claims, TokenKind, ISSUER};
use crate::principal::JwtUser;

/// Builds the claim set for one token kind.
pub struct ClaimsBuilder {
    kind: TokenKind,
    subject: Option<String>,
    name: Option<String>,
    email: Option<String>,
    role: Option<String>,
    issued_at: Option<DateTime<Utc>>,
    ttl: Duration,
}

impl ClaimsBuilder {
    /// Starts a claim set of `kind`, issued by [`ISSUER`].
    pub fn new(kind: TokenKind) -> Self {
        ClaimsBuilder {
            kind,
            subject: None,
            name: None,
            email: None,
            role: None,
            issued_at: None,
            ttl: Duration::from_secs(900), // 15 minutes default
        }
    }

    /// Copies subject and identity claims from the principal.
    pub fn principal(mut self, user: &(impl JwtUser + ?Sized)) -> Self {
        self.subject = Some(user.id().to_string());
        self.name = Some(user.name().to_string());
        self.email = Some(user.email().to_string());
        self.role = Some(user.role().to_string());
        self
    }

    pub fn issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    /// Lifetime added to the issue time; below one second `build` fails.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn build(self) -> Result<Claims, AuthError> {
        let subject = self
            .subject
            .ok_or_else(|| AuthError::Encoding("Subject is required".to_string()))?;
        let issued_at = self.issued_at.unwrap_or_else(Utc::now);

        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AuthError::Encoding(format!("TTL out of range: {e}")))?;
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Encoding("Expiration overflows".to_string()))?;

        let iat = issued_at.timestamp();
        let exp = expires_at.timestamp();
        if exp <= iat {
            return Err(AuthError::Encoding(
                "Expiration must be strictly after issued-at".to_string(),
            ));
        }

        Ok(Claims {
            sub: subject,
            name: self.name,
            email: self.email,
            role: self.role,
            token_type: Some(self.kind.as_str().to_string()),
            iat: Some(iat),
            exp,
            iss: Some(ISSUER.to_string()),
        })
    }
}
