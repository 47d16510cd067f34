//! Membership handlers. Both operations require an admin of the target
//! organization.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::{authenticate, credential};
use crate::api::dto::{ActionResponse, AddMemberRequest};
use crate::app_state::AppState;
use crate::error::{AppError, ErrorResponse};

/// `POST /profiles-organizations/add-member`: Add a member or change a role.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] unless the caller is an admin of the
/// organization.
#[utoipa::path(
    post,
    path = "/profiles-organizations/add-member",
    tag = "Memberships",
    summary = "Add a member",
    description = "Adds the profile to the organization with the given role (default `member`). Re-adding an existing member changes its role.",
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added", body = ActionResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse),
        (status = 409, description = "Unknown profile or organization", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn add_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<AddMemberRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    authenticate(&state, &headers).await?;
    let Json(req) = body?;
    let membership = req.into_membership()?;
    state
        .memberships
        .add(credential(&headers), membership)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok("User successfully added to organization")),
    ))
}

/// `DELETE /profiles-organizations/{organizationId}/members/{profileId}`: Remove a member.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] unless the caller is an admin, and
/// [`AppError::NotFound`] if the profile is not a member.
#[utoipa::path(
    delete,
    path = "/profiles-organizations/{organizationId}/members/{profileId}",
    tag = "Memberships",
    summary = "Remove a member",
    description = "Removes the profile from the organization.",
    params(
        ("organizationId" = uuid::Uuid, Path, description = "Organization UUID"),
        ("profileId" = uuid::Uuid, Path, description = "Profile UUID"),
    ),
    responses(
        (status = 200, description = "Member removed", body = ActionResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse),
        (status = 404, description = "Membership not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn remove_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path((organization_id, profile_id)) = path?;
    state
        .memberships
        .remove(credential(&headers), organization_id, profile_id)
        .await?;
    Ok(Json(ActionResponse::ok(
        "User successfully removed from organization",
    )))
}

/// Membership routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profiles-organizations/add-member", post(add_member))
        .route(
            "/profiles-organizations/{organizationId}/members/{profileId}",
            delete(remove_member),
        )
}
