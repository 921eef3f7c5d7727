//! Tower middleware.

pub mod bearer;

pub use bearer::{
    authentication, extract_bearer, Authentication, BearerAuthLayer, BearerAuthService,
    BearerAuthenticator,
};
