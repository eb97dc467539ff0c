//! Add-on services catalog repository

use std::time::Duration;

use sqlx::{Pool, Postgres};

use super::with_timeout;
use crate::{
    error::{AppError, AppResult},
    models::{addon::CreateAddOn, AddOn},
};

#[derive(Clone)]
pub struct AddOnsRepository {
    pool: Pool<Postgres>,
    timeout: Duration,
}

impl AddOnsRepository {
    pub fn new(pool: Pool<Postgres>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub async fn create(&self, data: &CreateAddOn) -> AppResult<AddOn> {
        with_timeout(self.timeout, "create service", async {
            sqlx::query_as::<_, AddOn>(
                "INSERT INTO services (service_name, price) VALUES ($1, $2) RETURNING id, service_name, price",
            )
            .bind(&data.service_name)
            .bind(data.price)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
        })
        .await
    }

    pub async fn list(&self) -> AppResult<Vec<AddOn>> {
        with_timeout(self.timeout, "list services", async {
            let addons = sqlx::query_as::<_, AddOn>(
                "SELECT id, service_name, price FROM services ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(addons)
        })
        .await
    }
}
