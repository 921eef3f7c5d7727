//! Error handling for the token lifecycle.
//!
//! Callers branch on the variant instead of catching by type:
//! - `TokenInvalid` for anything that fails verification
//! - `WrongTokenType` for a verified token of the wrong kind
//! - `InvalidCredentials` for a rejected password

use std::fmt;

use thiserror::Error;

use crate::jwt::TokenKind;

/// Why a token failed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidTokenReason {
    /// `exp` is at or before the verification time.
    Expired,
    /// The integrity tag does not match the signing key.
    SignatureMismatch,
    /// The compact encoding or a claim could not be parsed.
    Malformed(String),
}

impl fmt::Display for InvalidTokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => f.write_str("token expired"),
            Self::SignatureMismatch => f.write_str("signature mismatch"),
            Self::Malformed(detail) => write!(f, "malformed token: {detail}"),
        }
    }
}

/// Errors raised by the codec, token service and authentication service.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Signature mismatch, structural corruption or expiry.
    #[error("Token invalid: {reason}")]
    TokenInvalid {
        /// What made the token unusable
        reason: InvalidTokenReason,
    },

    /// The token verified but carries another `type` claim.
    #[error("Wrong token type: expected {expected}, found {}", found.as_deref().unwrap_or("none"))]
    WrongTokenType {
        /// Kind the operation required
        expected: TokenKind,
        /// Raw `type` claim carried by the token, if any
        found: Option<String>,
    },

    /// Password comparison failed.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Configuration is missing or out of range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Claims could not be signed.
    #[error("JWT encoding error: {0}")]
    Encoding(String),

    /// The password hashing collaborator failed.
    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

/// Stable error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    TokenInvalid,
    WrongTokenType,
    InvalidCredentials,
    Config,
    Encoding,
    PasswordHash,
}

impl ErrorCode {
    /// Get the string representation of the error code
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TokenInvalid => "AUTH_TOKEN_INVALID",
            Self::WrongTokenType => "AUTH_WRONG_TOKEN_TYPE",
            Self::InvalidCredentials => "AUTH_INVALID_CREDENTIALS",
            Self::Config => "AUTH_CONFIG_ERROR",
            Self::Encoding => "AUTH_ENCODING_ERROR",
            Self::PasswordHash => "AUTH_PASSWORD_HASH_ERROR",
        }
    }
}

impl AuthError {
    /// Shorthand for a malformed-token error.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::TokenInvalid {
            reason: InvalidTokenReason::Malformed(detail.into()),
        }
    }

    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Get the error code for this error
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::TokenInvalid { .. } => ErrorCode::TokenInvalid,
            Self::WrongTokenType { .. } => ErrorCode::WrongTokenType,
            Self::InvalidCredentials => ErrorCode::InvalidCredentials,
            Self::Config(_) => ErrorCode::Config,
            Self::Encoding(_) => ErrorCode::Encoding,
            Self::PasswordHash(_) => ErrorCode::PasswordHash,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        let reason = match err.kind() {
            ErrorKind::ExpiredSignature => InvalidTokenReason::Expired,
            ErrorKind::InvalidSignature => InvalidTokenReason::SignatureMismatch,
            ErrorKind::MissingRequiredClaim(claim) => {
                InvalidTokenReason::Malformed(format!("missing claim `{claim}`"))
            }
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                InvalidTokenReason::Malformed("unexpected signing algorithm".to_string())
            }
            _ => InvalidTokenReason::Malformed(err.to_string()),
        };

        AuthError::TokenInvalid { reason }
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AuthError::PasswordHash(err.to_string())
    }
}
