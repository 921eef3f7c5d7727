//! Wiring of the services from a single configuration.

use std::sync::Arc;

use tracing::info;

use crate::config::JwtConfig;
use crate::error::AuthError;
use crate::middleware::{BearerAuthLayer, BearerAuthenticator};
use crate::password::{Argon2PasswordEncoder, PasswordEncoder};
use crate::service::{AuthenticationService, JwtTokenService, TokenService};

/// One token service, one authentication service and the layers built on
/// them, all sharing the signing key derived at startup.
#[derive(Clone)]
pub struct AuthComponents {
    tokens: Arc<JwtTokenService>,
    passwords: Arc<dyn PasswordEncoder>,
}

impl AuthComponents {
    /// Validates `config` and builds the components with the Argon2
    /// password encoder.
    pub fn from_config(config: &JwtConfig) -> Result<Self, AuthError> {
        let tokens = JwtTokenService::from_config(config)?;

        info!(
            algorithm = ?tokens.codec().algorithm(),
            access_ttl = ?config.access_token_ttl,
            refresh_ttl = ?config.refresh_token_ttl,
            "JWT components initialized"
        );

        Ok(Self {
            tokens: Arc::new(tokens),
            passwords: Arc::new(Argon2PasswordEncoder::new()),
        })
    }

    /// Loads the configuration from the environment first.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_config(&JwtConfig::from_env()?)
    }

    /// Replaces the password encoder.
    #[must_use]
    pub fn with_password_encoder(mut self, passwords: Arc<dyn PasswordEncoder>) -> Self {
        self.passwords = passwords;
        self
    }

    pub fn token_service(&self) -> Arc<JwtTokenService> {
        Arc::clone(&self.tokens)
    }

    pub fn authentication_service(&self) -> AuthenticationService {
        AuthenticationService::new(self.shared_tokens(), Arc::clone(&self.passwords))
    }

    pub fn authenticator(&self) -> BearerAuthenticator {
        BearerAuthenticator::new(self.shared_tokens())
    }

    pub fn bearer_layer(&self) -> BearerAuthLayer {
        BearerAuthLayer::new(self.shared_tokens())
    }

    fn shared_tokens(&self) -> Arc<dyn TokenService> {
        self.tokens.clone()
    }
}
