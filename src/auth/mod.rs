//! Identity resolution: bearer credential to profile identity.
//!
//! The rest of the crate depends only on [`IdentityResolver`]; the
//! concrete [`JwtIdentityResolver`] verifies tokens minted by the
//! identity provider.

pub mod jwt;

use async_trait::async_trait;
use uuid::Uuid;

pub use jwt::JwtIdentityResolver;

use crate::error::AppError;

/// An authenticated caller as vouched for by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Profile identifier (the provider's subject).
    pub profile_id: Uuid,
    /// Email known to the provider, if any.
    pub email: Option<String>,
}

/// Turns an opaque bearer credential into an [`Identity`].
#[async_trait]
pub trait IdentityResolver: std::fmt::Debug + Send + Sync {
    /// Resolves `credential`, which may still carry a `Bearer ` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] when the credential is
    /// missing, malformed, expired or not signed by the provider.
    async fn resolve(&self, credential: &str) -> Result<Identity, AppError>;
}

/// Strips an optional `Bearer ` scheme prefix and surrounding whitespace.
#[must_use]
pub fn strip_bearer(credential: &str) -> &str {
    let trimmed = credential.trim();
    trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))
        .map_or(trimmed, str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_optional() {
        assert_eq!(strip_bearer("Bearer abc.def"), "abc.def");
        assert_eq!(strip_bearer("bearer   abc"), "abc");
        assert_eq!(strip_bearer("abc"), "abc");
        assert_eq!(strip_bearer("  "), "");
    }
}
