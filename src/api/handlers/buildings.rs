//! Building handlers: list, create, cascade delete, events at a building.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{
    ActionResponse, BuildingListResponse, CreateBuildingRequest, PaginationParams,
};
use crate::app_state::AppState;
use crate::domain::{Building, EventWithBuilding};
use crate::error::{AppError, ErrorResponse};

/// `GET /buildings`: Page through buildings.
///
/// # Errors
///
/// Returns [`AppError`] on malformed query or store failure.
#[utoipa::path(
    get,
    path = "/buildings",
    tag = "Buildings",
    summary = "List buildings",
    description = "Returns one page of buildings, newest first, with the total count.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of buildings", body = BuildingListResponse),
        (status = 400, description = "Malformed query", body = ErrorResponse),
    )
)]
pub async fn list_buildings(
    State(state): State<AppState>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = query?;
    let page = state.buildings.list(params.page()).await?;
    Ok(Json(BuildingListResponse {
        data: page.data,
        total: page.total,
    }))
}

/// `POST /buildings`: Create a building.
///
/// # Errors
///
/// Returns [`AppError::InvalidRequest`] on validation failure.
#[utoipa::path(
    post,
    path = "/buildings",
    tag = "Buildings",
    summary = "Create a building",
    description = "Creates a building. Latitude must lie in [-90, 90] and longitude in [-180, 180].",
    request_body = CreateBuildingRequest,
    responses(
        (status = 201, description = "Building created", body = Building),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    )
)]
pub async fn create_building(
    State(state): State<AppState>,
    body: Result<Json<CreateBuildingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    let building = state.buildings.create(req.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(building)))
}

/// `DELETE /buildings/{id}`: Delete a building with its events and logs.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if the building does not exist.
#[utoipa::path(
    delete,
    path = "/buildings/{id}",
    tag = "Buildings",
    summary = "Delete a building",
    description = "Deletes the building, every event held there and every log of those events in one transaction. Nothing is deleted if any step fails.",
    params(
        ("id" = uuid::Uuid, Path, description = "Building UUID"),
    ),
    responses(
        (status = 200, description = "Building deleted", body = ActionResponse),
        (status = 404, description = "Building not found", body = ErrorResponse),
    )
)]
pub async fn delete_building(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path?;
    state.buildings.delete(id).await?;
    Ok(Json(ActionResponse::ok(
        "Building and associated data successfully deleted",
    )))
}

/// `GET /buildings/{id}/events`: Events held at a building.
///
/// # Errors
///
/// Returns [`AppError`] on malformed path or store failure.
#[utoipa::path(
    get,
    path = "/buildings/{id}/events",
    tag = "Buildings",
    summary = "List events at a building",
    description = "Returns every event held at the building with the building nested. Unknown buildings yield an empty list.",
    params(
        ("id" = uuid::Uuid, Path, description = "Building UUID"),
    ),
    responses(
        (status = 200, description = "Events at the building", body = Vec<EventWithBuilding>),
        (status = 400, description = "Malformed id", body = ErrorResponse),
    )
)]
pub async fn building_events(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path?;
    Ok(Json(state.buildings.events(id).await?))
}

/// Building routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/buildings", get(list_buildings).post(create_building))
        .route("/buildings/{id}", delete(delete_building))
        .route("/buildings/{id}/events", get(building_events))
}
