//! Order booking endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        order::{CreateOrder, CreateOrderResponse, OrderPage, OrderQuery},
        slot::AvailabilityQuery,
        SlotAvailability,
    },
};

use super::AuthenticatedUser;

/// Book contiguous slots on a pitch
#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order created", body = CreateOrderResponse),
        (status = 400, description = "Invalid slots or request"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Pitch or service not found"),
        (status = 409, description = "A requested slot is already booked"),
        (status = 504, description = "Booking did not finish in time")
    )
)]
pub async fn create_order(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateOrder>,
) -> AppResult<(StatusCode, Json<CreateOrderResponse>)> {
    let id = state.services.orders.create_order(&claims, request).await?;
    Ok((StatusCode::CREATED, Json(CreateOrderResponse { id })))
}

/// List orders visible to the requester
#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    security(("bearer_auth" = [])),
    params(OrderQuery),
    responses(
        (status = 200, description = "Page of orders", body = OrderPage),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_orders(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<OrderPage>> {
    let page = state.services.orders.list_orders(&claims, &query).await?;
    Ok(Json(page))
}

/// Slot grid of a building, flagged with bookings on the given day
#[utoipa::path(
    get,
    path = "/orders/times",
    tag = "orders",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Slots in time-of-day order", body = Vec<SlotAvailability>),
        (status = 404, description = "Building not found")
    )
)]
pub async fn list_availability(
    State(state): State<crate::AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<SlotAvailability>>> {
    let slots = state
        .services
        .orders
        .availability(query.building_id, query.order_date, query.pitch_id)
        .await?;
    Ok(Json(slots))
}
