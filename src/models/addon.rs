//! Service add-ons sold together with an order

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AddOn {
    pub id: i32,
    pub service_name: String,
    pub price: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAddOn {
    #[validate(length(min = 1, max = 200, message = "Service name must be 1-200 characters"))]
    pub service_name: String,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: i32,
}
