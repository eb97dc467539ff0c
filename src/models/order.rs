//! Order (reservation) model and related types

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{addon::AddOn, pagination::PageInfo};
use crate::{
    error::{AppError, AppResult},
    scheduling::{format_clock, parse_clock, SECONDS_PER_DAY, SLOT_DURATION_SECS},
};

/// Order lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Reserved,
    Finished,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Reserved => "reserved",
            OrderStatus::Finished => "finished",
        }
    }

    /// Status as seen at `now`: an order whose last slot has started is finished
    pub fn at(end_order_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if end_order_date < now {
            OrderStatus::Finished
        } else {
            OrderStatus::Reserved
        }
    }
}

/// Truncate a Unix timestamp to midnight UTC of the same day
pub fn midnight_utc(timestamp: i64) -> AppResult<DateTime<Utc>> {
    let day = SECONDS_PER_DAY as i64;
    timestamp
        .div_euclid(day)
        .checked_mul(day)
        .and_then(|day_start| DateTime::from_timestamp(day_start, 0))
        .ok_or_else(|| AppError::Validation(format!("Invalid order_date {}", timestamp)))
}

/// Create order request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    pub pitch_id: i32,
    /// Unix timestamp of the reserved day
    pub order_date: i64,
    /// Contiguous slot labels ("HH:MM"), in ascending order
    #[validate(length(min = 1, message = "At least one time slot is required"))]
    pub times: Vec<String>,
    #[serde(default)]
    pub service_ids: Vec<i32>,
    pub card_id: Option<i32>,
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 32, message = "Phone number is required"))]
    pub phone_number: String,
    pub extra_info: Option<String>,
}

/// A validated order, ready for the booking store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub pitch_id: i32,
    pub user_id: i32,
    pub order_date: DateTime<Utc>,
    pub end_order_date: DateTime<Utc>,
    /// Normalised "HH:MM" labels
    pub slot_labels: Vec<String>,
    pub service_ids: Vec<i32>,
    pub card_id: Option<i32>,
    pub first_name: Option<String>,
    pub phone_number: String,
    pub extra_info: Option<String>,
}

impl NewOrder {
    /// Validate a request and compute the order's end timestamp
    pub fn from_request(request: CreateOrder, user_id: i32) -> AppResult<Self> {
        request.validate()?;

        let offsets = request
            .times
            .iter()
            .map(|label| parse_clock(label))
            .collect::<AppResult<Vec<i32>>>()?;

        for pair in offsets.windows(2) {
            if pair[1] - pair[0] != SLOT_DURATION_SECS {
                return Err(AppError::Validation(format!(
                    "Time slots must be contiguous and ascending ({} then {})",
                    format_clock(pair[0]),
                    format_clock(pair[1])
                )));
            }
        }

        let mut seen = HashSet::new();
        if let Some(dup) = request.service_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(AppError::Validation(format!("Service {} listed twice", dup)));
        }

        let order_date = midnight_utc(request.order_date)?;
        let last = offsets.last().copied().unwrap_or_default();
        let end_order_date = order_date + Duration::seconds(last as i64);

        Ok(Self {
            pitch_id: request.pitch_id,
            user_id,
            order_date,
            end_order_date,
            slot_labels: offsets.into_iter().map(format_clock).collect(),
            service_ids: request.service_ids,
            card_id: request.card_id,
            first_name: request.first_name,
            phone_number: request.phone_number,
            extra_info: request.extra_info,
        })
    }
}

/// Created order id
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderResponse {
    pub id: i32,
}

/// Order status filter: 1 = finished, 2 = still active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatusFilter {
    Finished,
    Active,
}

impl OrderStatusFilter {
    pub fn from_code(code: i32) -> AppResult<Option<Self>> {
        match code {
            0 => Ok(None),
            1 => Ok(Some(OrderStatusFilter::Finished)),
            2 => Ok(Some(OrderStatusFilter::Active)),
            other => Err(AppError::Validation(format!(
                "Invalid order_status {} (expected 1 or 2)",
                other
            ))),
        }
    }
}

/// Order list query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct OrderQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
    /// Unix timestamp; only orders on that day
    pub order_date: Option<i64>,
    /// 1 = finished, 2 = active
    pub order_status: Option<i32>,
}

/// Resolved list filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub order_date: Option<DateTime<Utc>>,
    pub status: Option<OrderStatusFilter>,
}

impl OrderFilter {
    pub fn from_query(query: &OrderQuery) -> AppResult<Self> {
        let order_date = query.order_date.map(midnight_utc).transpose()?;
        let status = match query.order_status {
            Some(code) => OrderStatusFilter::from_code(code)?,
            None => None,
        };
        Ok(Self { order_date, status })
    }
}

/// An order with its pitch, building, slots and add-ons
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderSummary {
    pub id: i32,
    pub pitch_id: i32,
    pub user_id: i32,
    pub order_date: DateTime<Utc>,
    pub end_order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub first_name: Option<String>,
    pub phone_number: String,
    pub card_id: Option<i32>,
    pub extra_info: Option<String>,
    pub pitch_price: i32,
    pub total_price: i32,
    pub pitch_type: i32,
    pub building_id: i32,
    pub building_name: String,
    pub address: String,
    pub times: Vec<String>,
    pub services: Vec<AddOn>,
}

/// One page of orders
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderPage {
    pub data: Vec<OrderSummary>,
    pub page_info: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(times: &[&str]) -> CreateOrder {
        CreateOrder {
            pitch_id: 1,
            order_date: 1_704_067_200, // 2024-01-01T00:00:00Z
            times: times.iter().map(|t| t.to_string()).collect(),
            service_ids: vec![],
            card_id: None,
            first_name: Some("Alice".to_string()),
            phone_number: "+99890000000".to_string(),
            extra_info: None,
        }
    }

    #[test]
    fn test_end_order_date_uses_last_slot() {
        let order = NewOrder::from_request(request(&["09:00", "09:30"]), 3).unwrap();
        assert_eq!(order.order_date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(order.end_order_date, Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap());
        assert_eq!(order.user_id, 3);
    }

    #[test]
    fn test_order_date_is_truncated_to_midnight() {
        let mut req = request(&["10:00"]);
        req.order_date = 1_704_067_200 + 13 * 3600 + 17;
        let order = NewOrder::from_request(req, 1).unwrap();
        assert_eq!(order.order_date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(order.end_order_date, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_out_of_range_dates_are_rejected() {
        for timestamp in [i64::MIN, i64::MIN + 1, i64::MAX] {
            assert!(matches!(midnight_utc(timestamp), Err(AppError::Validation(_))));
        }

        let mut req = request(&["09:00"]);
        req.order_date = i64::MIN;
        assert!(matches!(
            NewOrder::from_request(req, 1),
            Err(AppError::Validation(_))
        ));

        let query = OrderQuery {
            order_date: Some(i64::MIN),
            ..Default::default()
        };
        assert!(OrderFilter::from_query(&query).is_err());
    }

    #[test]
    fn test_labels_are_normalised() {
        let order = NewOrder::from_request(request(&["9:00", "9:30", "10:00"]), 1).unwrap();
        assert_eq!(order.slot_labels, vec!["09:00", "09:30", "10:00"]);
    }

    #[test]
    fn test_rejects_empty_slot_list() {
        assert!(matches!(
            NewOrder::from_request(request(&[]), 1),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_label() {
        assert!(matches!(
            NewOrder::from_request(request(&["09:00", "9h30"]), 1),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_gaps_and_disorder() {
        assert!(NewOrder::from_request(request(&["09:00", "10:00"]), 1).is_err());
        assert!(NewOrder::from_request(request(&["09:30", "09:00"]), 1).is_err());
        assert!(NewOrder::from_request(request(&["09:00", "09:00"]), 1).is_err());
    }

    #[test]
    fn test_rejects_duplicate_services() {
        let mut req = request(&["09:00"]);
        req.service_ids = vec![1, 2, 1];
        assert!(matches!(
            NewOrder::from_request(req, 1),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_status_filter_codes() {
        assert_eq!(OrderStatusFilter::from_code(0).unwrap(), None);
        assert_eq!(OrderStatusFilter::from_code(1).unwrap(), Some(OrderStatusFilter::Finished));
        assert_eq!(OrderStatusFilter::from_code(2).unwrap(), Some(OrderStatusFilter::Active));
        assert!(OrderStatusFilter::from_code(3).is_err());
    }

    #[test]
    fn test_status_at() {
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        assert_eq!(OrderStatus::at(end, end + Duration::minutes(1)), OrderStatus::Finished);
        assert_eq!(OrderStatus::at(end, end), OrderStatus::Reserved);
    }
}
