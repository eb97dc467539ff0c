//! Pitches repository

use std::time::Duration;

use sqlx::{Pool, Postgres};

use super::with_timeout;
use crate::{
    error::{AppError, AppResult},
    models::{pitch::CreatePitch, Pitch},
};

#[derive(Clone)]
pub struct PitchesRepository {
    pool: Pool<Postgres>,
    timeout: Duration,
}

impl PitchesRepository {
    pub fn new(pool: Pool<Postgres>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub async fn create(&self, data: &CreatePitch) -> AppResult<Pitch> {
        with_timeout(self.timeout, "create pitch", async {
            let pitch = sqlx::query_as::<_, Pitch>(
                r#"
                INSERT INTO pitches (building_id, price, pitch_type)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
            )
            .bind(data.building_id)
            .bind(data.price)
            .bind(data.pitch_type)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let err = AppError::from(e);
                if err.is_foreign_key_violation() {
                    AppError::NotFound(format!("Building {} not found", data.building_id))
                } else {
                    err
                }
            })?;
            Ok(pitch)
        })
        .await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Pitch> {
        with_timeout(self.timeout, "get pitch", async {
            sqlx::query_as::<_, Pitch>("SELECT * FROM pitches WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Pitch {} not found", id)))
        })
        .await
    }

    pub async fn list_for_building(&self, building_id: i32) -> AppResult<Vec<Pitch>> {
        with_timeout(self.timeout, "list pitches", async {
            let pitches = sqlx::query_as::<_, Pitch>(
                "SELECT * FROM pitches WHERE building_id = $1 ORDER BY id",
            )
            .bind(building_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(pitches)
        })
        .await
    }
}
