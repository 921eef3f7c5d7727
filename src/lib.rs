//! Stateless JWT session library.
//!
//! Issues access/refresh token pairs, verifies and classifies tokens, and
//! authenticates requests from a `Bearer` header. Nothing is stored: a
//! token stays valid until its `exp`, rotation always mints new tokens.

#![forbid(unsafe_code)]

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod principal;
pub mod service;

// Re-exports for convenience
pub use bootstrap::AuthComponents;
pub use config::JwtConfig;
pub use error::{AuthError, ErrorCode, InvalidTokenReason};
pub use jwt::{Claims, TokenKind};
pub use middleware::{Authentication, BearerAuthLayer};
pub use password::{Argon2PasswordEncoder, PasswordEncoder};
pub use principal::{JwtUser, UserInfo};
pub use service::{AuthResponse, AuthenticationService, JwtTokenService, TokenService};
