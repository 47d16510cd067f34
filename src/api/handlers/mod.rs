//! REST endpoint handlers organized by resource.
//!
//! Extractors are taken as `Result<_, Rejection>` so malformed paths,
//! queries and bodies surface through [`crate::error::AppError`] with the
//! shared `{error}` body.

pub mod buildings;
pub mod events;
pub mod memberships;
pub mod organizations;
pub mod profiles;
pub mod system;

use axum::Router;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use crate::app_state::AppState;
use crate::error::AppError;

/// Composes all resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(buildings::routes())
        .merge(events::routes())
        .merge(organizations::routes())
        .merge(memberships::routes())
        .merge(profiles::routes())
}

/// Raw `Authorization` header value, empty when absent or not ASCII.
pub(crate) fn credential(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Rejects an unresolvable credential before the request body is examined,
/// so unauthenticated callers get 401 whatever they send.
///
/// # Errors
///
/// Returns [`AppError::Unauthenticated`] when the credential is missing,
/// malformed or expired.
pub(crate) async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    state.identity.resolve(credential(headers)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn credential_is_empty_without_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(credential(&headers), "");
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(credential(&headers), "Bearer abc");
    }
}
