use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::principal::UserInfo;

/// Fixed `iss` claim of every minted token.
pub const ISSUER: &str = "auth-service";

/// Discriminates access tokens from refresh tokens via the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived token that authenticates requests.
    Access,
    /// Long-lived token that can only be exchanged for a new pair.
    Refresh,
}

impl TokenKind {
    /// Wire value of the `type` claim.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "ACCESS",
            Self::Refresh => "REFRESH",
        }
    }

    /// Strict match against a raw `type` claim. Anything else, absent
    /// included, is not this kind.
    pub fn matches(&self, raw: Option<&str>) -> bool {
        raw == Some(self.as_str())
    }

    /// Parses a raw `type` claim, `None` for unknown values.
    pub fn from_claim(raw: Option<&str>) -> Option<Self> {
        match raw {
            Some("ACCESS") => Some(Self::Access),
            Some("REFRESH") => Some(Self::Refresh),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim set carried by every token.
///
/// Identity claims and `type` are optional on the way in so that foreign
/// or partial tokens decode and then fail classification or projection
/// instead of failing parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// Parsed `type` claim.
    pub fn kind(&self) -> Option<TokenKind> {
        TokenKind::from_claim(self.token_type.as_deref())
    }

    /// Strict match of the `type` claim against `kind`.
    pub fn is_kind(&self, kind: TokenKind) -> bool {
        kind.matches(self.token_type.as_deref())
    }

    /// A token is expired once `exp` is reached, no leeway.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    /// Projects the identity claims onto a principal.
    pub fn principal(&self) -> Result<UserInfo, AuthError> {
        let id = self
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::malformed("subject is not a numeric id"))?;

        Ok(UserInfo {
            id,
            name: required(&self.name, "name")?,
            email: required(&self.email, "email")?,
            role: required(&self.role, "role")?,
        })
    }
}

fn required(value: &Option<String>, claim: &str) -> Result<String, AuthError> {
    value
        .clone()
        .ok_or_else(|| AuthError::malformed(format!("missing claim `{claim}`")))
}
