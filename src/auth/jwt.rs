//! HS256 JWT verification against the identity provider's shared secret.

use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identity, IdentityResolver, strip_bearer};
use crate::error::AppError;

/// Claims carried by identity provider tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the profile id.
    pub sub: String,
    /// Email of the authenticated user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration, seconds since the epoch.
    pub exp: i64,
    /// Audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Verifies bearer tokens signed with HS256.
#[derive(Clone)]
pub struct JwtIdentityResolver {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    audience: Option<String>,
}

impl fmt::Debug for JwtIdentityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtIdentityResolver")
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl JwtIdentityResolver {
    /// Creates a resolver for `secret`. When `audience` is set, tokens must
    /// carry a matching `aud` claim.
    #[must_use]
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            audience: audience.map(str::to_string),
        }
    }

    /// Mints a token for `profile_id`, valid for `ttl`.
    ///
    /// The service itself never issues tokens; this exists for local
    /// development and tests.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if encoding fails.
    pub fn issue(
        &self,
        profile_id: Uuid,
        email: Option<&str>,
        ttl: chrono::Duration,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: profile_id.to_string(),
            email: email.map(str::to_string),
            exp: (Utc::now() + ttl).timestamp(),
            aud: self.audience.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to encode token: {e}")))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        match &self.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        validation
    }
}

#[async_trait]
impl IdentityResolver for JwtIdentityResolver {
    async fn resolve(&self, credential: &str) -> Result<Identity, AppError> {
        let token = strip_bearer(credential);
        if token.is_empty() {
            return Err(AppError::Unauthenticated(
                "Missing bearer token".to_string(),
            ));
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| AppError::Unauthenticated(format!("Invalid token: {e}")))?;

        let profile_id = Uuid::parse_str(&data.claims.sub).map_err(|_| {
            AppError::Unauthenticated("Invalid token: subject is not a UUID".to_string())
        })?;

        Ok(Identity {
            profile_id,
            email: data.claims.email,
        })
    }
}
