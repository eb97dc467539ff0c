//! Add-on services endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{addon::CreateAddOn, AddOn},
};

use super::AuthenticatedUser;

/// List the add-on services catalog
#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    responses(
        (status = 200, description = "Add-on services", body = Vec<AddOn>)
    )
)]
pub async fn list_addons(State(state): State<crate::AppState>) -> AppResult<Json<Vec<AddOn>>> {
    let addons = state.services.catalog.list_addons().await?;
    Ok(Json(addons))
}

/// Add a service to the catalog
#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    security(("bearer_auth" = [])),
    request_body = CreateAddOn,
    responses(
        (status = 201, description = "Service created", body = AddOn),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Manager privileges required")
    )
)]
pub async fn create_addon(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateAddOn>,
) -> AppResult<(StatusCode, Json<AddOn>)> {
    let addon = state.services.catalog.create_addon(&claims, data).await?;
    Ok((StatusCode::CREATED, Json(addon)))
}
