//! Slot grid rows and availability views

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// A persisted grid slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Slot {
    pub id: i32,
    pub building_id: i32,
    /// "HH:MM" label
    pub work_time: String,
    pub start_offset: i32,
}

/// A grid slot with its booking state for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SlotAvailability {
    pub id: i32,
    pub work_time: String,
    /// Absent when no date was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_booked: Option<bool>,
}

impl From<Slot> for SlotAvailability {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id,
            work_time: slot.work_time,
            is_booked: None,
        }
    }
}

/// Availability query parameters
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct AvailabilityQuery {
    pub building_id: i32,
    /// Unix timestamp of the day to inspect (truncated to midnight UTC)
    pub order_date: Option<i64>,
    /// Only bookings on this pitch count as taken
    pub pitch_id: Option<i32>,
}
