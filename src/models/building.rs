//! Building model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::pagination::PageInfo;

/// A car-wash building with its operating window
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Building {
    pub id: i32,
    #[serde(rename = "name")]
    pub building_name: String,
    pub address: String,
    pub description: Option<String>,
    pub manager_id: i32,
    /// Opening offset, seconds from midnight
    pub start_time: i32,
    /// Last slot offset, seconds from midnight
    pub end_time: i32,
    pub crea_date: DateTime<Utc>,
}

/// Create building request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBuilding {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub description: Option<String>,
    /// Opening offset in seconds from midnight (multiple of 1800)
    pub start_time: i32,
    /// Closing offset in seconds from midnight (multiple of 1800, inclusive)
    pub end_time: i32,
}

/// Building list query
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct BuildingQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
    /// Only buildings run by this manager
    pub manager_id: Option<i32>,
}

/// One page of buildings
#[derive(Debug, Serialize, ToSchema)]
pub struct BuildingPage {
    pub data: Vec<Building>,
    pub page_info: PageInfo,
}
