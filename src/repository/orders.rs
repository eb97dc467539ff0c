//! Orders repository: atomic multi-slot booking, listing and availability

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres, QueryBuilder, Transaction};

use super::{buildings::fetch_grid, finish, with_timeout, BookingStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        order::{OrderFilter, OrderStatus, OrderStatusFilter},
        AddOn, NewOrder, OrderScope, OrderSummary, PageInfo, Pagination, Slot, SlotAvailability,
    },
};

const ORDER_FROM: &str = r#"
    FROM orders o
    JOIN pitches p ON p.id = o.pitch_id
    JOIN buildings b ON b.id = p.building_id
    WHERE TRUE"#;

#[derive(Clone)]
pub struct OrdersRepository {
    pool: Pool<Postgres>,
    timeout: Duration,
}

#[derive(FromRow)]
struct OrderRow {
    id: i32,
    pitch_id: i32,
    user_id: i32,
    order_date: DateTime<Utc>,
    end_order_date: DateTime<Utc>,
    first_name: Option<String>,
    phone_number: String,
    card_id: Option<i32>,
    extra_info: Option<String>,
    pitch_price: i32,
    total_price: i32,
    pitch_type: i32,
    building_id: i32,
    building_name: String,
    address: String,
}

impl OrderRow {
    fn into_summary(self, now: DateTime<Utc>, times: Vec<String>, services: Vec<AddOn>) -> OrderSummary {
        OrderSummary {
            id: self.id,
            pitch_id: self.pitch_id,
            user_id: self.user_id,
            order_date: self.order_date,
            end_order_date: self.end_order_date,
            status: OrderStatus::at(self.end_order_date, now),
            first_name: self.first_name,
            phone_number: self.phone_number,
            card_id: self.card_id,
            extra_info: self.extra_info,
            pitch_price: self.pitch_price,
            total_price: self.total_price,
            pitch_type: self.pitch_type,
            building_id: self.building_id,
            building_name: self.building_name,
            address: self.address,
            times,
            services,
        }
    }
}

impl OrdersRepository {
    pub fn new(pool: Pool<Postgres>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Book every requested slot or none of them
    pub async fn create(&self, order: &NewOrder) -> AppResult<i32> {
        with_timeout(self.timeout, "create order", async {
            let mut tx = self.pool.begin().await?;
            let result = Self::insert_order(&mut tx, order).await;
            finish(tx, result).await
        })
        .await
    }

    async fn insert_order(tx: &mut Transaction<'_, Postgres>, order: &NewOrder) -> AppResult<i32> {
        // Serialises bookings on the same pitch until commit
        let (building_id, pitch_price): (i32, i32) =
            sqlx::query_as("SELECT building_id, price FROM pitches WHERE id = $1 FOR UPDATE")
                .bind(order.pitch_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Pitch {} not found", order.pitch_id)))?;

        let slots: Vec<(i32, String)> = sqlx::query_as(
            r#"
            SELECT id, work_time FROM times
            WHERE building_id = $1 AND work_time = ANY($2)
            ORDER BY start_offset
            "#,
        )
        .bind(building_id)
        .bind(order.slot_labels.as_slice())
        .fetch_all(&mut **tx)
        .await?;

        if slots.len() != order.slot_labels.len() {
            let missing = order
                .slot_labels
                .iter()
                .find(|label| !slots.iter().any(|(_, work_time)| work_time == *label))
                .cloned()
                .unwrap_or_default();
            return Err(AppError::Validation(format!(
                "Time {} is outside the building's working hours",
                missing
            )));
        }
        let time_ids: Vec<i32> = slots.iter().map(|(id, _)| *id).collect();

        let addon_total: i64 = if order.service_ids.is_empty() {
            0
        } else {
            let addons: Vec<(i32, i32)> =
                sqlx::query_as("SELECT id, price FROM services WHERE id = ANY($1)")
                    .bind(order.service_ids.as_slice())
                    .fetch_all(&mut **tx)
                    .await?;
            if let Some(missing) = order
                .service_ids
                .iter()
                .find(|id| !addons.iter().any(|(found, _)| found == *id))
            {
                return Err(AppError::NotFound(format!("Service {} not found", missing)));
            }
            addons.iter().map(|(_, price)| *price as i64).sum()
        };

        let taken: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT t.work_time
            FROM order_times ot
            JOIN times t ON t.id = ot.time_id
            WHERE ot.pitch_id = $1 AND ot.order_date = $2 AND ot.time_id = ANY($3)
            ORDER BY t.start_offset
            "#,
        )
        .bind(order.pitch_id)
        .bind(order.order_date)
        .bind(time_ids.as_slice())
        .fetch_all(&mut **tx)
        .await?;

        if !taken.is_empty() {
            return Err(AppError::Conflict(format!(
                "Slot {} already booked",
                taken.join(", ")
            )));
        }

        let total = pitch_price as i64 * time_ids.len() as i64 + addon_total;
        let total_price = i32::try_from(total)
            .map_err(|_| AppError::Validation(format!("Order total {} is too large", total)))?;

        let order_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (pitch_id, user_id, order_date, end_order_date, status,
                                pitch_price, total_price, first_name, phone_number, card_id, extra_info)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(order.pitch_id)
        .bind(order.user_id)
        .bind(order.order_date)
        .bind(order.end_order_date)
        .bind(OrderStatus::Reserved.as_str())
        .bind(pitch_price)
        .bind(total_price)
        .bind(&order.first_name)
        .bind(&order.phone_number)
        .bind(order.card_id)
        .bind(&order.extra_info)
        .fetch_one(&mut **tx)
        .await?;

        for service_id in &order.service_ids {
            sqlx::query("INSERT INTO order_services (order_id, service_id) VALUES ($1, $2)")
                .bind(order_id)
                .bind(service_id)
                .execute(&mut **tx)
                .await?;
        }

        for (time_id, label) in &slots {
            sqlx::query(
                "INSERT INTO order_times (order_id, time_id, pitch_id, order_date) VALUES ($1, $2, $3, $4)",
            )
            .bind(order_id)
            .bind(time_id)
            .bind(order.pitch_id)
            .bind(order.order_date)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                let err = AppError::from(e);
                if err.is_unique_violation() {
                    AppError::Conflict(format!("Slot {} already booked", label))
                } else {
                    err
                }
            })?;
        }

        tracing::info!(
            order_id,
            pitch_id = order.pitch_id,
            slots = slots.len(),
            total_price,
            "Order created"
        );
        Ok(order_id)
    }

    /// Orders visible in `scope`, by day, with their slots and add-ons
    pub async fn list(
        &self,
        scope: OrderScope,
        filter: OrderFilter,
        pagination: Pagination,
    ) -> AppResult<(Vec<OrderSummary>, PageInfo)> {
        with_timeout(self.timeout, "list orders", async {
            let now = Utc::now();

            let mut count_q = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
            count_q.push(ORDER_FROM);
            push_order_filters(&mut count_q, scope, filter, now);
            let count: i64 = count_q.build_query_scalar().fetch_one(&self.pool).await?;

            let window = pagination.window(count)?;

            let mut select_q = QueryBuilder::<Postgres>::new(
                r#"
                SELECT o.id, o.pitch_id, o.user_id, o.order_date, o.end_order_date,
                       o.first_name, o.phone_number, o.card_id, o.extra_info,
                       o.pitch_price, o.total_price, p.pitch_type,
                       b.id AS building_id, b.building_name, b.address"#,
            );
            select_q.push(ORDER_FROM);
            push_order_filters(&mut select_q, scope, filter, now);
            select_q
                .push(" ORDER BY o.order_date ASC, o.id ASC LIMIT ")
                .push_bind(window.limit)
                .push(" OFFSET ")
                .push_bind(window.offset);

            let rows = select_q
                .build_query_as::<OrderRow>()
                .fetch_all(&self.pool)
                .await?;

            let order_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
            let mut times = self.times_by_order(&order_ids).await?;
            let mut services = self.services_by_order(&order_ids).await?;

            let orders = rows
                .into_iter()
                .map(|row| {
                    let id = row.id;
                    row.into_summary(
                        now,
                        times.remove(&id).unwrap_or_default(),
                        services.remove(&id).unwrap_or_default(),
                    )
                })
                .collect();

            Ok((orders, PageInfo::new(&window, count)))
        })
        .await
    }

    async fn times_by_order(&self, order_ids: &[i32]) -> AppResult<HashMap<i32, Vec<String>>> {
        let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();
        if order_ids.is_empty() {
            return Ok(grouped);
        }

        let rows: Vec<(i32, String)> = sqlx::query_as(
            r#"
            SELECT ot.order_id, t.work_time
            FROM order_times ot
            JOIN times t ON t.id = ot.time_id
            WHERE ot.order_id = ANY($1)
            ORDER BY ot.order_id, t.start_offset
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        for (order_id, label) in rows {
            grouped.entry(order_id).or_default().push(label);
        }
        Ok(grouped)
    }

    async fn services_by_order(&self, order_ids: &[i32]) -> AppResult<HashMap<i32, Vec<AddOn>>> {
        let mut grouped: HashMap<i32, Vec<AddOn>> = HashMap::new();
        if order_ids.is_empty() {
            return Ok(grouped);
        }

        let rows: Vec<(i32, i32, String, i32)> = sqlx::query_as(
            r#"
            SELECT os.order_id, s.id, s.service_name, s.price
            FROM order_services os
            JOIN services s ON s.id = os.service_id
            WHERE os.order_id = ANY($1)
            ORDER BY os.order_id, s.id
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        for (order_id, id, service_name, price) in rows {
            grouped.entry(order_id).or_default().push(AddOn {
                id,
                service_name,
                price,
            });
        }
        Ok(grouped)
    }

    /// The building's grid with each slot flagged if booked on `date`.
    ///
    /// A `pitch_id` outside the building is `NotFound`.
    pub async fn availability(
        &self,
        building_id: i32,
        date: DateTime<Utc>,
        pitch_id: Option<i32>,
    ) -> AppResult<Vec<SlotAvailability>> {
        with_timeout(self.timeout, "slot availability", async {
            if let Some(pitch_id) = pitch_id {
                let on_building: bool = sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM pitches WHERE id = $1 AND building_id = $2)",
                )
                .bind(pitch_id)
                .bind(building_id)
                .fetch_one(&self.pool)
                .await?;
                if !on_building {
                    return Err(AppError::NotFound(format!(
                        "Pitch {} not found in building {}",
                        pitch_id, building_id
                    )));
                }
            }

            let slots = sqlx::query_as::<_, SlotAvailability>(
                r#"
                SELECT t.id, t.work_time, COUNT(ot.id) > 0 AS is_booked
                FROM times t
                LEFT JOIN order_times ot
                    ON ot.time_id = t.id
                   AND ot.order_date = $2
                   AND ($3::INTEGER IS NULL OR ot.pitch_id = $3)
                WHERE t.building_id = $1
                GROUP BY t.id, t.work_time, t.start_offset
                ORDER BY t.start_offset
                "#,
            )
            .bind(building_id)
            .bind(date)
            .bind(pitch_id)
            .fetch_all(&self.pool)
            .await?;

            if slots.is_empty() {
                return Err(AppError::NotFound(format!("Building {} not found", building_id)));
            }
            Ok(slots)
        })
        .await
    }
}

fn push_order_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    scope: OrderScope,
    filter: OrderFilter,
    now: DateTime<Utc>,
) {
    match scope {
        OrderScope::All => {}
        OrderScope::Manager(manager_id) => {
            qb.push(" AND b.manager_id = ").push_bind(manager_id);
        }
        OrderScope::Owner(user_id) => {
            qb.push(" AND o.user_id = ").push_bind(user_id);
        }
    }

    if let Some(order_date) = filter.order_date {
        qb.push(" AND o.order_date = ").push_bind(order_date);
    }

    match filter.status {
        Some(OrderStatusFilter::Finished) => {
            qb.push(" AND o.end_order_date < ").push_bind(now);
        }
        Some(OrderStatusFilter::Active) => {
            qb.push(" AND o.end_order_date >= ").push_bind(now);
        }
        None => {}
    }
}

#[async_trait]
impl BookingStore for OrdersRepository {
    async fn create_order(&self, order: NewOrder) -> AppResult<i32> {
        self.create(&order).await
    }

    async fn list_orders(
        &self,
        scope: OrderScope,
        filter: OrderFilter,
        pagination: Pagination,
    ) -> AppResult<(Vec<OrderSummary>, PageInfo)> {
        self.list(scope, filter, pagination).await
    }

    async fn availability(
        &self,
        building_id: i32,
        date: DateTime<Utc>,
        pitch_id: Option<i32>,
    ) -> AppResult<Vec<SlotAvailability>> {
        OrdersRepository::availability(self, building_id, date, pitch_id).await
    }

    async fn slot_grid(&self, building_id: i32) -> AppResult<Vec<Slot>> {
        with_timeout(self.timeout, "list slots", fetch_grid(&self.pool, building_id)).await
    }
}
