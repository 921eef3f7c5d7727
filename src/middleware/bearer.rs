//! Bearer token authentication layer.
//!
//! Reads `Authorization: Bearer <token>`, and when the token is a valid
//! access token attaches an [`Authentication`] to the request extensions.
//! Every other case proceeds anonymously; the layer never rejects a
//! request, authorization is left to downstream handlers.

use std::sync::Arc;
use std::task::{Context, Poll};

use http::header::AUTHORIZATION;
use http::{HeaderMap, Request};
use tower::{Layer, Service};
use tracing::debug;

use crate::jwt::TokenKind;
use crate::principal::UserInfo;
use crate::service::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity established for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    principal: UserInfo,
    authorities: Vec<String>,
}

impl Authentication {
    /// Grants the single `ROLE_<role>` authority of the principal.
    pub fn new(principal: UserInfo) -> Self {
        let authorities = vec![principal.authority()];
        Self {
            principal,
            authorities,
        }
    }

    pub fn principal(&self) -> &UserInfo {
        &self.principal
    }

    pub fn authorities(&self) -> &[String] {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

/// Returns the credential of a `Bearer` authorization header.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

/// Authentication attached to a request by [`BearerAuthLayer`], if any.
pub fn authentication<B>(request: &Request<B>) -> Option<&Authentication> {
    request.extensions().get::<Authentication>()
}

/// Resolves request headers to an optional identity.
#[derive(Clone)]
pub struct BearerAuthenticator {
    tokens: Arc<dyn TokenService>,
}

impl BearerAuthenticator {
    pub fn new(tokens: Arc<dyn TokenService>) -> Self {
        Self { tokens }
    }

    /// `None` for a missing, non-Bearer, invalid, expired or non-access
    /// credential.
    pub fn authenticate(&self, headers: &HeaderMap) -> Option<Authentication> {
        let token = extract_bearer(headers)?;

        let claims = match self.tokens.decode(token) {
            Ok(claims) => claims,
            Err(err) => {
                debug!(error = %err, "Ignoring invalid bearer token");
                return None;
            }
        };

        if !claims.is_kind(TokenKind::Access) {
            debug!(
                found = claims.token_type.as_deref().unwrap_or("none"),
                "Ignoring bearer token that is not an access token"
            );
            return None;
        }

        match claims.principal() {
            Ok(principal) => Some(Authentication::new(principal)),
            Err(err) => {
                debug!(error = %err, "Ignoring bearer token without a usable principal");
                None
            }
        }
    }
}

/// Tower layer installing [`BearerAuthService`].
#[derive(Clone)]
pub struct BearerAuthLayer {
    authenticator: BearerAuthenticator,
}

impl BearerAuthLayer {
    pub fn new(tokens: Arc<dyn TokenService>) -> Self {
        Self {
            authenticator: BearerAuthenticator::new(tokens),
        }
    }
}

impl<S> Layer<S> for BearerAuthLayer {
    type Service = BearerAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerAuthService {
            inner,
            authenticator: self.authenticator.clone(),
        }
    }
}

/// Service wrapper that authenticates each request before passing it on.
#[derive(Clone)]
pub struct BearerAuthService<S> {
    inner: S,
    authenticator: BearerAuthenticator,
}

impl<S, B> Service<Request<B>> for BearerAuthService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        // An identity can only come from this layer, never from the caller.
        req.extensions_mut().remove::<Authentication>();

        if let Some(authentication) = self.authenticator.authenticate(req.headers()) {
            debug!(
                user_id = authentication.principal().id,
                "Request authenticated"
            );
            req.extensions_mut().insert(authentication);
        }

        self.inner.call(req)
    }
}
