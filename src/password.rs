//! Password hashing collaborator.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};

use crate::error::AuthError;

/// One-way hash-and-compare capability.
pub trait PasswordEncoder: Send + Sync {
    /// Hashes a plaintext password.
    fn encode(&self, raw_password: &str) -> Result<String, AuthError>;

    /// Compares a plaintext password with a stored hash in constant time.
    ///
    /// `Ok(false)` on mismatch, `Err` when the stored hash is unusable.
    fn matches(&self, raw_password: &str, stored_hash: &str) -> Result<bool, AuthError>;
}

/// Argon2id with a random salt per hash, stored as a PHC string.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordEncoder;

impl Argon2PasswordEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(raw_password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn matches(&self, raw_password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(stored_hash)?;

        match Argon2::default().verify_password(raw_password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
