use serde::{Deserialize, Serialize};

/// Custom claims carried by every identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub email: String,
}

/// Decoded identity attached to authenticated requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub email: String,
}

impl From<IdentityClaims> for AuthContext {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            email: claims.email,
        }
    }
}
