use std::fmt;

use jwt_simple::prelude::*;

use super::IdentityClaims;
use crate::error::{AppError, Result};

/// How long an issued token stays valid. There is no refresh; callers
/// re-authenticate after expiry.
pub const TOKEN_VALIDITY_HOURS: u64 = 5;

/// Issues and verifies HS256 identity tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    key: HS256Key,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            key: HS256Key::from_bytes(secret.as_bytes()),
        }
    }

    /// Sign a token for `email`, valid for [`TOKEN_VALIDITY_HOURS`].
    pub fn issue(&self, email: &str) -> Result<String> {
        let claims = Claims::with_custom_claims(
            IdentityClaims {
                email: email.to_string(),
            },
            Duration::from_hours(TOKEN_VALIDITY_HOURS),
        );
        self.sign(claims)
    }

    pub(crate) fn sign(&self, claims: JWTClaims<IdentityClaims>) -> Result<String> {
        self.key
            .authenticate(claims)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature and expiry. Any failure is `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<IdentityClaims> {
        // No clock tolerance: a token is dead the moment its expiry passes.
        let options = VerificationOptions {
            time_tolerance: Some(Duration::from_secs(0)),
            ..Default::default()
        };
        let claims = self
            .key
            .verify_token::<IdentityClaims>(token, Some(options))
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                AppError::Unauthorized
            })?;
        Ok(claims.custom)
    }
}
