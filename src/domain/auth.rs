//! Authenticated user claims shared by services and access checks.

use serde::{Deserialize, Serialize};

/// Claims describing the signed-in user, decoded from the identity token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject, the user id in the identity provider.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

impl AuthenticatedUser {
    /// True when the user carries the given role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
