//! JWT claim sets, signing key and codec.

pub mod builder;
pub mod claims;
pub mod codec;
pub mod key;

pub use builder::ClaimsBuilder;
pub use claims::{Claims, TokenKind, ISSUER};
pub use codec::TokenCodec;
pub use key::SigningKey;
