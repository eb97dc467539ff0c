//! Buildings repository: buildings and their slot grid

use std::time::Duration;

use sqlx::{Pool, Postgres, QueryBuilder, Transaction};

use super::{finish, with_timeout};
use crate::{
    error::{AppError, AppResult},
    models::{
        building::{Building, BuildingQuery, CreateBuilding},
        PageInfo, Pagination, Slot,
    },
    scheduling::GridSlot,
};

#[derive(Clone)]
pub struct BuildingsRepository {
    pool: Pool<Postgres>,
    timeout: Duration,
}

impl BuildingsRepository {
    pub fn new(pool: Pool<Postgres>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Insert a building and its whole slot grid in one transaction
    pub async fn create(
        &self,
        data: &CreateBuilding,
        manager_id: i32,
        grid: &[GridSlot],
    ) -> AppResult<(Building, Vec<Slot>)> {
        with_timeout(self.timeout, "create building", async {
            let mut tx = self.pool.begin().await?;
            let result = Self::insert_with_grid(&mut tx, data, manager_id, grid).await;
            finish(tx, result).await
        })
        .await
    }

    async fn insert_with_grid(
        tx: &mut Transaction<'_, Postgres>,
        data: &CreateBuilding,
        manager_id: i32,
        grid: &[GridSlot],
    ) -> AppResult<(Building, Vec<Slot>)> {
        let building = sqlx::query_as::<_, Building>(
            r#"
            INSERT INTO buildings (building_name, address, description, manager_id, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.description)
        .bind(manager_id)
        .bind(data.start_time)
        .bind(data.end_time)
        .fetch_one(&mut **tx)
        .await?;

        let mut slots = Vec::with_capacity(grid.len());
        for entry in grid {
            let slot = sqlx::query_as::<_, Slot>(
                r#"
                INSERT INTO times (building_id, work_time, start_offset)
                VALUES ($1, $2, $3)
                RETURNING id, building_id, work_time, start_offset
                "#,
            )
            .bind(building.id)
            .bind(&entry.label)
            .bind(entry.offset)
            .fetch_one(&mut **tx)
            .await?;
            slots.push(slot);
        }

        Ok((building, slots))
    }

    /// Get building by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Building> {
        with_timeout(self.timeout, "get building", async {
            sqlx::query_as::<_, Building>("SELECT * FROM buildings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Building {} not found", id)))
        })
        .await
    }

    /// List buildings, optionally restricted to one manager
    pub async fn list(&self, query: &BuildingQuery) -> AppResult<(Vec<Building>, PageInfo)> {
        with_timeout(self.timeout, "list buildings", async {
            let mut count_q = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM buildings");
            if let Some(manager_id) = query.manager_id {
                count_q.push(" WHERE manager_id = ").push_bind(manager_id);
            }
            let count: i64 = count_q.build_query_scalar().fetch_one(&self.pool).await?;

            let window = Pagination {
                limit: query.limit,
                page: query.page,
            }
            .window(count)?;

            let mut select_q = QueryBuilder::<Postgres>::new("SELECT * FROM buildings");
            if let Some(manager_id) = query.manager_id {
                select_q.push(" WHERE manager_id = ").push_bind(manager_id);
            }
            select_q
                .push(" ORDER BY id ASC LIMIT ")
                .push_bind(window.limit)
                .push(" OFFSET ")
                .push_bind(window.offset);

            let rows = select_q
                .build_query_as::<Building>()
                .fetch_all(&self.pool)
                .await?;

            Ok((rows, PageInfo::new(&window, count)))
        })
        .await
    }

    /// Delete a building (cascades to slots, pitches and their orders)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        with_timeout(self.timeout, "delete building", async {
            let result = sqlx::query("DELETE FROM buildings WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(AppError::NotFound(format!("Building {} not found", id)));
            }
            Ok(())
        })
        .await
    }

    /// Slot grid of a building, in time-of-day order
    pub async fn slot_grid(&self, building_id: i32) -> AppResult<Vec<Slot>> {
        with_timeout(self.timeout, "list slots", fetch_grid(&self.pool, building_id)).await
    }
}

/// Grid rows of a building; an existing building always has at least two
pub(crate) async fn fetch_grid(pool: &Pool<Postgres>, building_id: i32) -> AppResult<Vec<Slot>> {
    let slots = sqlx::query_as::<_, Slot>(
        r#"
        SELECT id, building_id, work_time, start_offset
        FROM times
        WHERE building_id = $1
        ORDER BY start_offset
        "#,
    )
    .bind(building_id)
    .fetch_all(pool)
    .await?;

    if slots.is_empty() {
        return Err(AppError::NotFound(format!("Building {} not found", building_id)));
    }
    Ok(slots)
}
