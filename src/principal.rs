//! The authenticated user as seen by the token lifecycle.

use serde::{Deserialize, Serialize};

/// Anything that can be turned into a token subject.
///
/// Implement this on your own user type; the library only reads the four
/// fields and never holds on to the value.
pub trait JwtUser {
    /// Numeric user identifier, stored as the `sub` claim.
    fn id(&self) -> i64;

    /// Display name.
    fn name(&self) -> &str;

    /// Email address.
    fn email(&self) -> &str;

    /// Role name, e.g. `ADMIN`.
    fn role(&self) -> &str;
}

/// Owned snapshot of a principal's public fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl UserInfo {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: role.into(),
        }
    }

    /// Copies the fields of any principal.
    pub fn snapshot(user: &(impl JwtUser + ?Sized)) -> Self {
        Self::new(user.id(), user.name(), user.email(), user.role())
    }

    /// Authority string derived from the role.
    pub fn authority(&self) -> String {
        format!("ROLE_{}", self.role)
    }
}

impl JwtUser for UserInfo {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn role(&self) -> &str {
        &self.role
    }
}
