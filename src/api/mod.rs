//! API handlers for Washbay REST endpoints

pub mod addons;
pub mod buildings;
pub mod health;
pub mod openapi;
pub mod orders;
pub mod pitches;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// API v1 routes plus the OpenAPI documentation, without middleware
pub fn router(state: AppState) -> Router {
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Buildings
        .route("/buildings", get(buildings::list_buildings).post(buildings::create_building))
        .route("/buildings/:id", get(buildings::get_building).delete(buildings::delete_building))
        .route("/buildings/:id/slots", get(buildings::list_slots))
        .route("/buildings/:id/pitches", get(buildings::list_pitches))
        // Pitches
        .route("/pitches", post(pitches::create_pitch))
        .route("/pitches/:id", get(pitches::get_pitch))
        // Add-on services
        .route("/services", get(addons::list_addons).post(addons::create_addon))
        // Orders
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route("/orders/times", get(orders::list_availability))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
}
