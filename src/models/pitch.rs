//! Pitch (washing bay) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Pitch {
    pub id: i32,
    pub building_id: i32,
    /// Price per half-hour slot
    pub price: i32,
    pub pitch_type: i32,
    pub crea_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePitch {
    pub building_id: i32,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: i32,
    #[serde(default)]
    pub pitch_type: i32,
}
