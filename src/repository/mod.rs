//! Repository layer for database operations

pub mod addons;
pub mod buildings;
pub mod orders;
pub mod pitches;

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        order::OrderFilter, NewOrder, OrderScope, OrderSummary, PageInfo, Pagination, Slot,
        SlotAvailability,
    },
};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub buildings: buildings::BuildingsRepository,
    pub pitches: pitches::PitchesRepository,
    pub addons: addons::AddOnsRepository,
    pub orders: orders::OrdersRepository,
    timeout: Duration,
}

impl Repository {
    /// Create a new repository; every operation is bounded by `timeout`
    pub fn new(pool: Pool<Postgres>, timeout: Duration) -> Self {
        Self {
            buildings: buildings::BuildingsRepository::new(pool.clone(), timeout),
            pitches: pitches::PitchesRepository::new(pool.clone(), timeout),
            addons: addons::AddOnsRepository::new(pool.clone(), timeout),
            orders: orders::OrdersRepository::new(pool.clone(), timeout),
            pool,
            timeout,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        with_timeout(self.timeout, "ping", async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
        .await
    }
}

/// Run `operation` under a deadline; no retry on expiry
pub(crate) async fn with_timeout<T, F>(timeout: Duration, operation: &str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(format!(
            "{} did not finish within {} ms",
            operation,
            timeout.as_millis()
        ))),
    }
}

/// Commit on success, roll back on failure.
///
/// A failed rollback is reported together with the error that caused it.
pub(crate) async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    result: AppResult<T>,
) -> AppResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(cause) => match tx.rollback().await {
            Ok(()) => {
                tracing::warn!(error = %cause, "Transaction rolled back");
                Err(cause)
            }
            Err(rollback) => Err(AppError::Rollback {
                cause: Box::new(cause),
                rollback,
            }),
        },
    }
}

/// Storage operations behind order creation, listing and availability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persist the order header with its add-on and slot rows atomically
    async fn create_order(&self, order: NewOrder) -> AppResult<i32>;

    async fn list_orders(
        &self,
        scope: OrderScope,
        filter: OrderFilter,
        pagination: Pagination,
    ) -> AppResult<(Vec<OrderSummary>, PageInfo)>;

    /// Full grid of the building annotated with bookings on `date`
    async fn availability(
        &self,
        building_id: i32,
        date: DateTime<Utc>,
        pitch_id: Option<i32>,
    ) -> AppResult<Vec<SlotAvailability>>;

    /// Bare grid of the building, ordered by time of day
    async fn slot_grid(&self, building_id: i32) -> AppResult<Vec<Slot>>;
}
