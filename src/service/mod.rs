//! Token and authentication services.

pub mod authentication;
pub mod token;

pub use authentication::{AuthResponse, AuthenticationService, BEARER};
pub use token::{JwtTokenService, TokenService};
