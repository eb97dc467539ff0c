//! Pitch endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{pitch::CreatePitch, Pitch},
};

use super::AuthenticatedUser;

/// Add a pitch to a building
#[utoipa::path(
    post,
    path = "/pitches",
    tag = "pitches",
    security(("bearer_auth" = [])),
    request_body = CreatePitch,
    responses(
        (status = 201, description = "Pitch created", body = Pitch),
        (status = 403, description = "Not the building manager"),
        (status = 404, description = "Building not found")
    )
)]
pub async fn create_pitch(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreatePitch>,
) -> AppResult<(StatusCode, Json<Pitch>)> {
    let pitch = state.services.catalog.create_pitch(&claims, data).await?;
    Ok((StatusCode::CREATED, Json(pitch)))
}

/// Get pitch details by ID
#[utoipa::path(
    get,
    path = "/pitches/{id}",
    tag = "pitches",
    params(
        ("id" = i32, Path, description = "Pitch ID")
    ),
    responses(
        (status = 200, description = "Pitch details", body = Pitch),
        (status = 404, description = "Pitch not found")
    )
)]
pub async fn get_pitch(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Pitch>> {
    let pitch = state.services.catalog.get_pitch(id).await?;
    Ok(Json(pitch))
}
