//! Building management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        building::{BuildingPage, BuildingQuery, CreateBuilding},
        Building, Pitch, SlotAvailability,
    },
};

use super::AuthenticatedUser;

/// List buildings
#[utoipa::path(
    get,
    path = "/buildings",
    tag = "buildings",
    params(BuildingQuery),
    responses(
        (status = 200, description = "Page of buildings", body = BuildingPage)
    )
)]
pub async fn list_buildings(
    State(state): State<crate::AppState>,
    Query(query): Query<BuildingQuery>,
) -> AppResult<Json<BuildingPage>> {
    let page = state.services.buildings.list_buildings(&query).await?;
    Ok(Json(page))
}

/// Get building details by ID
#[utoipa::path(
    get,
    path = "/buildings/{id}",
    tag = "buildings",
    params(
        ("id" = i32, Path, description = "Building ID")
    ),
    responses(
        (status = 200, description = "Building details", body = Building),
        (status = 404, description = "Building not found")
    )
)]
pub async fn get_building(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Building>> {
    let building = state.services.buildings.get_building(id).await?;
    Ok(Json(building))
}

/// Create a building and generate its half-hour slot grid
#[utoipa::path(
    post,
    path = "/buildings",
    tag = "buildings",
    security(("bearer_auth" = [])),
    request_body = CreateBuilding,
    responses(
        (status = 201, description = "Building created", body = Building),
        (status = 400, description = "Invalid operating window"),
        (status = 403, description = "Manager privileges required")
    )
)]
pub async fn create_building(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBuilding>,
) -> AppResult<(StatusCode, Json<Building>)> {
    let building = state.services.buildings.create_building(&claims, data).await?;
    Ok((StatusCode::CREATED, Json(building)))
}

/// Delete a building with its slots, pitches and orders
#[utoipa::path(
    delete,
    path = "/buildings/{id}",
    tag = "buildings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Building ID")
    ),
    responses(
        (status = 204, description = "Building deleted"),
        (status = 403, description = "Not the building manager"),
        (status = 404, description = "Building not found")
    )
)]
pub async fn delete_building(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.buildings.delete_building(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Slot grid of a building
#[utoipa::path(
    get,
    path = "/buildings/{id}/slots",
    tag = "buildings",
    params(
        ("id" = i32, Path, description = "Building ID")
    ),
    responses(
        (status = 200, description = "Slots in time-of-day order", body = Vec<SlotAvailability>),
        (status = 404, description = "Building not found")
    )
)]
pub async fn list_slots(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<SlotAvailability>>> {
    let slots = state.services.orders.availability(id, None, None).await?;
    Ok(Json(slots))
}

/// Pitches of a building
#[utoipa::path(
    get,
    path = "/buildings/{id}/pitches",
    tag = "buildings",
    params(
        ("id" = i32, Path, description = "Building ID")
    ),
    responses(
        (status = 200, description = "Pitches of the building", body = Vec<Pitch>),
        (status = 404, description = "Building not found")
    )
)]
pub async fn list_pitches(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Pitch>>> {
    let pitches = state.services.buildings.list_pitches(id).await?;
    Ok(Json(pitches))
}
