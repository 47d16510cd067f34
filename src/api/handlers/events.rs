//! Event handlers: reads, guarded mutations and the audit trail.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::{authenticate, credential};
use crate::api::dto::{
    ActionResponse, CreateEventRequest, EventCreatedResponse, EventIdsResponse,
    EventListResponse, EventLogListResponse, EventUpdatedResponse, PaginationParams,
    UpdateEventRequest,
};
use crate::app_state::AppState;
use crate::domain::EventDetails;
use crate::error::{AppError, ErrorResponse};

/// `GET /events/ids`: Page through event ids.
///
/// # Errors
///
/// Returns [`AppError`] on malformed query or store failure.
#[utoipa::path(
    get,
    path = "/events/ids",
    tag = "Events",
    summary = "List event ids",
    description = "Returns one page of event ids, newest first, with the total count.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of ids", body = EventIdsResponse),
        (status = 400, description = "Malformed query", body = ErrorResponse),
    )
)]
pub async fn event_ids(
    State(state): State<AppState>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = query?;
    let page = state.events.ids(params.page()).await?;
    Ok(Json(EventIdsResponse {
        ids: page.data,
        total: page.total,
    }))
}

/// `GET /events/{id}`: Event with building, organization and logs.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Events",
    summary = "Get an event",
    description = "Returns the event with its building, hosting organization and audit entries.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Event details", body = EventDetails),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path?;
    Ok(Json(state.events.get(id).await?))
}

/// `POST /events/organization/{organizationId}`: Create an event.
///
/// # Errors
///
/// Returns [`AppError::Unauthenticated`] without a valid credential and
/// [`AppError::Forbidden`] unless the caller belongs to the organization.
#[utoipa::path(
    post,
    path = "/events/organization/{organizationId}",
    tag = "Events",
    summary = "Create an event",
    description = "Creates an event hosted by the organization in the path. The caller must be a member or admin of it. One `event.created` audit entry is written with the event.",
    params(
        ("organizationId" = uuid::Uuid, Path, description = "Hosting organization UUID"),
    ),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventCreatedResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 403, description = "Not a member of the organization", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    authenticate(&state, &headers).await?;
    let Path(organization_id) = path?;
    let Json(req) = body?;
    let new = req.into_new(organization_id)?;
    let event = state
        .events
        .create(credential(&headers), organization_id, new)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(EventCreatedResponse {
            success: true,
            message: "Event successfully created".to_string(),
            event_id: event.id,
        }),
    ))
}

/// `PATCH /events/{id}`: Update an event.
///
/// # Errors
///
/// Returns [`AppError::NotFound`], [`AppError::Unauthenticated`] or
/// [`AppError::Forbidden`].
#[utoipa::path(
    patch,
    path = "/events/{id}",
    tag = "Events",
    summary = "Update an event",
    description = "Applies a partial update. The caller must be a member or admin of the hosting organization. One `event.updated` audit entry is written with the change.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventUpdatedResponse),
        (status = 400, description = "Invalid or empty update", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 403, description = "Not a member of the organization", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn update_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    authenticate(&state, &headers).await?;
    let Path(id) = path?;
    let Json(req) = body?;
    let patch = req.into_patch()?;
    let data = state.events.update(credential(&headers), id, patch).await?;
    Ok(Json(EventUpdatedResponse {
        success: true,
        message: "Event successfully updated".to_string(),
        data,
    }))
}

/// `DELETE /events/{id}`: Delete an event.
///
/// # Errors
///
/// Returns [`AppError::NotFound`], [`AppError::Unauthenticated`] or
/// [`AppError::Forbidden`].
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    description = "Deletes the event. The caller must be a member or admin of the hosting organization. The audit trail, including the `event.deleted` entry, outlives the event and stays listed under its id.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Event deleted", body = ActionResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 403, description = "Not a member of the organization", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn delete_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path?;
    state.events.delete(credential(&headers), id).await?;
    Ok(Json(ActionResponse::ok("Event successfully deleted")))
}

/// `GET /events/organization/{organizationId}/events`: Events of an organization.
///
/// # Errors
///
/// Returns [`AppError`] on malformed input or store failure.
#[utoipa::path(
    get,
    path = "/events/organization/{organizationId}/events",
    tag = "Events",
    summary = "List an organization's events",
    description = "Returns one page of the organization's events ordered by date and time, buildings nested.",
    params(
        ("organizationId" = uuid::Uuid, Path, description = "Organization UUID"),
        PaginationParams,
    ),
    responses(
        (status = 200, description = "Page of events", body = EventListResponse),
        (status = 400, description = "Malformed input", body = ErrorResponse),
    )
)]
pub async fn organization_events(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(organization_id) = path?;
    let Query(params) = query?;
    let page = state
        .events
        .by_organization(organization_id, params.page())
        .await?;
    Ok(Json(EventListResponse {
        data: page.data,
        total: page.total,
    }))
}

/// `GET /events/{id}/logs`: Audit trail of an event.
///
/// # Errors
///
/// Returns [`AppError`] on malformed input or store failure.
#[utoipa::path(
    get,
    path = "/events/{id}/logs",
    tag = "Events",
    summary = "List an event's audit entries",
    description = "Returns one page of audit entries for the event, newest first, with actor and event projections.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
        PaginationParams,
    ),
    responses(
        (status = 200, description = "Page of audit entries", body = EventLogListResponse),
        (status = 400, description = "Malformed input", body = ErrorResponse),
    )
)]
pub async fn event_logs(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path?;
    let Query(params) = query?;
    let page = state.events.logs(id, params.page()).await?;
    Ok(Json(EventLogListResponse {
        data: page.data,
        total: page.total,
    }))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/ids", get(event_ids))
        .route(
            "/events/{id}",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/events/{id}/logs", get(event_logs))
        .route("/events/organization/{organizationId}", post(create_event))
        .route(
            "/events/organization/{organizationId}/events",
            get(organization_events),
        )
}
