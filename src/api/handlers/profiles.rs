//! Profile handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::{authenticate, credential};
use crate::api::dto::{
    ActionResponse, CreateProfileRequest, EventLogListResponse, ExistsResponse,
    PaginationParams, SearchParams,
};
use crate::app_state::AppState;
use crate::domain::ProfileSummary;
use crate::error::{AppError, ErrorResponse};

/// `POST /profiles`: Create the caller's profile.
///
/// # Errors
///
/// Returns [`AppError::Unauthenticated`] without a valid credential and
/// [`AppError::Conflict`] if the profile already exists.
#[utoipa::path(
    post,
    path = "/profiles",
    tag = "Profiles",
    summary = "Create own profile",
    description = "Creates a profile for the caller. Id and email come from the bearer credential.",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ActionResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 409, description = "Profile or email already exists", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn create_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    authenticate(&state, &headers).await?;
    let Json(req) = body?;
    let (first_name, last_name) = req.into_names()?;
    state
        .profiles
        .create(credential(&headers), first_name, last_name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok("Profile successfully created")),
    ))
}

/// `DELETE /profiles`: Delete the caller's profile.
///
/// # Errors
///
/// Returns [`AppError::Unauthenticated`] without a valid credential and
/// [`AppError::NotFound`] if the caller has no profile.
#[utoipa::path(
    delete,
    path = "/profiles",
    tag = "Profiles",
    summary = "Delete own profile",
    description = "Deletes the caller's profile together with its memberships and authored audit entries.",
    responses(
        (status = 200, description = "Profile deleted", body = ActionResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn delete_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    state.profiles.delete_own(credential(&headers)).await?;
    Ok(Json(ActionResponse::ok("Profile successfully deleted")))
}

/// `GET /profiles/exists/{id}`: Whether a profile exists.
///
/// # Errors
///
/// Returns [`AppError`] on malformed path or store failure.
#[utoipa::path(
    get,
    path = "/profiles/exists/{id}",
    tag = "Profiles",
    summary = "Check profile existence",
    params(
        ("id" = uuid::Uuid, Path, description = "Profile UUID"),
    ),
    responses(
        (status = 200, description = "Existence flag", body = ExistsResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
    )
)]
pub async fn profile_exists(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path?;
    let exists = state.profiles.exists(id).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// `GET /profiles/search`: Search profiles by email.
///
/// # Errors
///
/// Returns [`AppError`] on malformed query or store failure.
#[utoipa::path(
    get,
    path = "/profiles/search",
    tag = "Profiles",
    summary = "Search profiles",
    description = "Returns profiles whose email contains the query, ignoring case. A blank query returns an empty list.",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching profiles", body = Vec<ProfileSummary>),
    )
)]
pub async fn search_profiles(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = query?;
    let needle = params.query.unwrap_or_default();
    Ok(Json(state.profiles.search(&needle).await?))
}

/// `GET /profiles/{id}/logs`: Audit entries authored by a profile.
///
/// # Errors
///
/// Returns [`AppError`] on malformed input or store failure.
#[utoipa::path(
    get,
    path = "/profiles/{id}/logs",
    tag = "Profiles",
    summary = "List a profile's audit entries",
    description = "Returns one page of audit entries the profile authored, newest first.",
    params(
        ("id" = uuid::Uuid, Path, description = "Profile UUID"),
        PaginationParams,
    ),
    responses(
        (status = 200, description = "Page of audit entries", body = EventLogListResponse),
        (status = 400, description = "Malformed input", body = ErrorResponse),
    )
)]
pub async fn profile_logs(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path?;
    let Query(params) = query?;
    let page = state.profiles.logs(id, params.page()).await?;
    Ok(Json(EventLogListResponse {
        data: page.data,
        total: page.total,
    }))
}

/// Profile routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profiles", post(create_profile).delete(delete_profile))
        .route("/profiles/exists/{id}", get(profile_exists))
        .route("/profiles/search", get(search_profiles))
        .route("/profiles/{id}/logs", get(profile_logs))
}
