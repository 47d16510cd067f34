//! Organization handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::{authenticate, credential};
use crate::api::dto::{
    CreateOrganizationRequest, EventLogListResponse, OrganizationCreatedResponse,
    PaginationParams,
};
use crate::app_state::AppState;
use crate::domain::{OrganizationDetails, OrganizationSummary};
use crate::error::{AppError, ErrorResponse};

/// `POST /organizations`: Create an organization.
///
/// # Errors
///
/// Returns [`AppError::Unauthenticated`] without a valid credential,
/// [`AppError::NotFound`] if the caller has no profile, or
/// [`AppError::Conflict`] if the email is taken.
#[utoipa::path(
    post,
    path = "/organizations",
    tag = "Organizations",
    summary = "Create an organization",
    description = "Creates an organization and makes the caller its admin in the same transaction. The caller must already have a profile.",
    request_body = CreateOrganizationRequest,
    responses(
        (status = 201, description = "Organization created", body = OrganizationCreatedResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 404, description = "Caller has no profile", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn create_organization(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateOrganizationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    authenticate(&state, &headers).await?;
    let Json(req) = body?;
    let new = req.into_new()?;
    let organization = state
        .organizations
        .create(credential(&headers), new)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(OrganizationCreatedResponse {
            success: true,
            message: "Organization successfully created".to_string(),
            organization_id: organization.id,
        }),
    ))
}

/// `GET /organizations/profile/{profileId}`: Organizations of a profile.
///
/// # Errors
///
/// Returns [`AppError`] on malformed path or store failure.
#[utoipa::path(
    get,
    path = "/organizations/profile/{profileId}",
    tag = "Organizations",
    summary = "List a profile's organizations",
    description = "Returns every organization the profile is a member or admin of.",
    params(
        ("profileId" = uuid::Uuid, Path, description = "Profile UUID"),
    ),
    responses(
        (status = 200, description = "Organizations", body = Vec<OrganizationSummary>),
        (status = 400, description = "Malformed id", body = ErrorResponse),
    )
)]
pub async fn profile_organizations(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(profile_id) = path?;
    Ok(Json(state.organizations.for_profile(profile_id).await?))
}

/// `GET /organizations/{id}/details`: Organization with its members.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if the organization does not exist.
#[utoipa::path(
    get,
    path = "/organizations/{id}/details",
    tag = "Organizations",
    summary = "Get organization details",
    description = "Returns the organization with one page of its members and their roles.",
    params(
        ("id" = uuid::Uuid, Path, description = "Organization UUID"),
        PaginationParams,
    ),
    responses(
        (status = 200, description = "Organization details", body = OrganizationDetails),
        (status = 404, description = "Organization not found", body = ErrorResponse),
    )
)]
pub async fn organization_details(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path?;
    let Query(params) = query?;
    Ok(Json(state.organizations.details(id, params.page()).await?))
}

/// `GET /organizations/{id}/logs`: Audit trail of an organization's events.
///
/// # Errors
///
/// Returns [`AppError`] on malformed input or store failure.
#[utoipa::path(
    get,
    path = "/organizations/{id}/logs",
    tag = "Organizations",
    summary = "List an organization's audit entries",
    description = "Returns one page of audit entries for events the organization hosts, newest first.",
    params(
        ("id" = uuid::Uuid, Path, description = "Organization UUID"),
        PaginationParams,
    ),
    responses(
        (status = 200, description = "Page of audit entries", body = EventLogListResponse),
        (status = 400, description = "Malformed input", body = ErrorResponse),
    )
)]
pub async fn organization_logs(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path?;
    let Query(params) = query?;
    let page = state.organizations.logs(id, params.page()).await?;
    Ok(Json(EventLogListResponse {
        data: page.data,
        total: page.total,
    }))
}

/// Organization routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations", post(create_organization))
        .route(
            "/organizations/profile/{profileId}",
            get(profile_organizations),
        )
        .route("/organizations/{id}/details", get(organization_details))
        .route("/organizations/{id}/logs", get(organization_logs))
}
