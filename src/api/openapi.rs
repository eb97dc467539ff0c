//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{addons, buildings, health, orders, pitches};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Washbay API",
        version = "1.0.0",
        description = "Car-wash slot booking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Buildings
        buildings::list_buildings,
        buildings::get_building,
        buildings::create_building,
        buildings::delete_building,
        buildings::list_slots,
        buildings::list_pitches,
        // Pitches
        pitches::create_pitch,
        pitches::get_pitch,
        // Services
        addons::list_addons,
        addons::create_addon,
        // Orders
        orders::create_order,
        orders::list_orders,
        orders::list_availability,
    ),
    components(
        schemas(
            // Buildings
            crate::models::building::Building,
            crate::models::building::CreateBuilding,
            crate::models::building::BuildingPage,
            crate::models::slot::SlotAvailability,
            // Pitches
            crate::models::pitch::Pitch,
            crate::models::pitch::CreatePitch,
            // Services
            crate::models::addon::AddOn,
            crate::models::addon::CreateAddOn,
            // Orders
            crate::models::order::CreateOrder,
            crate::models::order::CreateOrderResponse,
            crate::models::order::OrderSummary,
            crate::models::order::OrderStatus,
            crate::models::order::OrderPage,
            crate::models::pagination::PageInfo,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "buildings", description = "Buildings and their slot grid"),
        (name = "pitches", description = "Washing pitches"),
        (name = "services", description = "Add-on services catalog"),
        (name = "orders", description = "Slot booking")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
