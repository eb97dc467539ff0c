//! Order booking, listing and slot availability

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{
        order::{midnight_utc, CreateOrder, OrderFilter, OrderPage, OrderQuery},
        NewOrder, Pagination, Slot, SlotAvailability, UserClaims,
    },
    repository::BookingStore,
    services::redis::GridCache,
};

#[derive(Clone)]
pub struct OrdersService {
    store: Arc<dyn BookingStore>,
    cache: Arc<dyn GridCache>,
}

impl OrdersService {
    pub fn new(store: Arc<dyn BookingStore>, cache: Arc<dyn GridCache>) -> Self {
        Self { store, cache }
    }

    /// Book a run of contiguous slots on one pitch for the requester
    pub async fn create_order(&self, claims: &UserClaims, request: CreateOrder) -> AppResult<i32> {
        let order = NewOrder::from_request(request, claims.user_id)?;
        self.store.create_order(order).await
    }

    /// Orders visible to the requester
    pub async fn list_orders(&self, claims: &UserClaims, query: &OrderQuery) -> AppResult<OrderPage> {
        let filter = OrderFilter::from_query(query)?;
        let pagination = Pagination {
            limit: query.limit,
            page: query.page,
        };
        let (data, page_info) = self
            .store
            .list_orders(claims.order_scope(), filter, pagination)
            .await?;
        Ok(OrderPage { data, page_info })
    }

    /// Slot grid of a building; flagged with bookings when a day is given
    pub async fn availability(
        &self,
        building_id: i32,
        order_date: Option<i64>,
        pitch_id: Option<i32>,
    ) -> AppResult<Vec<SlotAvailability>> {
        match order_date {
            Some(timestamp) => {
                let date = midnight_utc(timestamp)?;
                self.store.availability(building_id, date, pitch_id).await
            }
            None => Ok(self
                .grid(building_id)
                .await?
                .into_iter()
                .map(SlotAvailability::from)
                .collect()),
        }
    }

    /// Grid from cache, falling back to the store. Cache errors are not fatal.
    pub async fn grid(&self, building_id: i32) -> AppResult<Vec<Slot>> {
        match self.cache.get_grid(building_id).await {
            Ok(Some(slots)) => return Ok(slots),
            Ok(None) => {}
            Err(e) => tracing::warn!(building_id, error = %e, "Slot grid cache read failed"),
        }

        let slots = self.store.slot_grid(building_id).await?;
        if let Err(e) = self.cache.put_grid(building_id, slots.clone()).await {
            tracing::warn!(building_id, error = %e, "Slot grid cache write failed");
        }
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{order::OrderStatusFilter, OrderScope, PageInfo, Role},
        repository::MockBookingStore,
        services::redis::MockGridCache,
    };
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    const JAN_1_2024: i64 = 1_704_067_200;

    fn claims(role: Role, user_id: i32) -> UserClaims {
        UserClaims {
            sub: format!("user-{}", user_id),
            user_id,
            role,
            exp: 0,
            iat: 0,
        }
    }

    fn slot(id: i32, label: &str, offset: i32) -> Slot {
        Slot {
            id,
            building_id: 1,
            work_time: label.to_string(),
            start_offset: offset,
        }
    }

    fn request(times: &[&str]) -> CreateOrder {
        CreateOrder {
            pitch_id: 5,
            order_date: JAN_1_2024 + 600,
            times: times.iter().map(|t| t.to_string()).collect(),
            service_ids: vec![2],
            card_id: None,
            first_name: None,
            phone_number: "555-0100".to_string(),
            extra_info: None,
        }
    }

    fn service(store: MockBookingStore, cache: MockGridCache) -> OrdersService {
        OrdersService::new(Arc::new(store), Arc::new(cache))
    }

    #[tokio::test]
    async fn test_create_order_passes_validated_order() {
        let mut store = MockBookingStore::new();
        store
            .expect_create_order()
            .withf(|order| {
                order.user_id == 9
                    && order.slot_labels == vec!["09:00", "09:30"]
                    && order.order_date == Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    && order.end_order_date == Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap()
            })
            .times(1)
            .returning(|_| Ok(17));

        let svc = service(store, MockGridCache::new());
        let id = assert_ok!(svc.create_order(&claims(Role::User, 9), request(&["9:00", "9:30"])).await);
        assert_eq!(id, 17);
    }

    #[tokio::test]
    async fn test_invalid_order_never_reaches_store() {
        let mut store = MockBookingStore::new();
        store.expect_create_order().never();

        let svc = service(store, MockGridCache::new());
        let user = claims(Role::User, 9);
        assert_err!(svc.create_order(&user, request(&[])).await);
        assert_err!(svc.create_order(&user, request(&["09:00", "10:00"])).await);
    }

    #[tokio::test]
    async fn test_store_conflict_is_propagated() {
        let mut store = MockBookingStore::new();
        store
            .expect_create_order()
            .returning(|_| Err(AppError::Conflict("Slot 09:00 already booked".to_string())));

        let svc = service(store, MockGridCache::new());
        let result = svc.create_order(&claims(Role::User, 1), request(&["09:00"])).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_grid_served_from_cache() {
        let mut store = MockBookingStore::new();
        store.expect_slot_grid().never();
        let mut cache = MockGridCache::new();
        cache
            .expect_get_grid()
            .with(eq(1))
            .returning(|_| Ok(Some(vec![slot(1, "08:00", 28_800), slot(2, "08:30", 30_600)])));
        cache.expect_put_grid().never();

        let svc = service(store, cache);
        let slots = assert_ok!(svc.availability(1, None, None).await);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].work_time, "08:00");
        assert_eq!(slots[0].is_booked, None);
    }

    #[tokio::test]
    async fn test_grid_cache_miss_loads_and_stores() {
        let mut store = MockBookingStore::new();
        store
            .expect_slot_grid()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(vec![slot(1, "08:00", 28_800)]));
        let mut cache = MockGridCache::new();
        cache.expect_get_grid().returning(|_| Ok(None));
        cache
            .expect_put_grid()
            .withf(|id, slots| *id == 1 && slots.len() == 1)
            .times(1)
            .returning(|_, _| Ok(()));

        let svc = service(store, cache);
        assert_ok!(svc.availability(1, None, None).await);
    }

    #[tokio::test]
    async fn test_grid_survives_cache_outage() {
        let mut store = MockBookingStore::new();
        store
            .expect_slot_grid()
            .returning(|_| Ok(vec![slot(1, "08:00", 28_800)]));
        let mut cache = MockGridCache::new();
        cache
            .expect_get_grid()
            .returning(|_| Err(AppError::Internal("connection refused".to_string())));
        cache
            .expect_put_grid()
            .returning(|_, _| Err(AppError::Internal("connection refused".to_string())));

        let svc = service(store, cache);
        let slots = assert_ok!(svc.grid(1).await);
        assert_eq!(slots.len(), 1);
    }

    #[tokio::test]
    async fn test_dated_availability_uses_midnight() {
        let mut store = MockBookingStore::new();
        store
            .expect_availability()
            .with(
                eq(3),
                eq(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                eq(Some(5)),
            )
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![SlotAvailability {
                    id: 1,
                    work_time: "08:00".to_string(),
                    is_booked: Some(true),
                }])
            });
        let mut cache = MockGridCache::new();
        cache.expect_get_grid().never();

        let svc = service(store, cache);
        let slots = assert_ok!(svc.availability(3, Some(JAN_1_2024 + 45_000), Some(5)).await);
        assert_eq!(slots[0].is_booked, Some(true));
    }

    #[tokio::test]
    async fn test_out_of_range_date_never_reaches_store() {
        let mut store = MockBookingStore::new();
        store.expect_availability().never();
        let mut cache = MockGridCache::new();
        cache.expect_get_grid().never();

        let svc = service(store, cache);
        let result = svc.availability(1, Some(i64::MIN), None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_orders_scoped_to_requester() {
        let mut store = MockBookingStore::new();
        store
            .expect_list_orders()
            .withf(|scope, filter, _| {
                *scope == OrderScope::Owner(4) && filter.status == Some(OrderStatusFilter::Active)
            })
            .returning(|_, _, _| {
                Ok((
                    vec![],
                    PageInfo {
                        page: 1,
                        pages: 1,
                        count: 0,
                    },
                ))
            });

        let svc = service(store, MockGridCache::new());
        let query = OrderQuery {
            order_status: Some(2),
            ..Default::default()
        };
        let page = assert_ok!(svc.list_orders(&claims(Role::User, 4), &query).await);
        assert_eq!(page.page_info.count, 0);
    }

    #[tokio::test]
    async fn test_list_orders_rejects_unknown_status() {
        let mut store = MockBookingStore::new();
        store.expect_list_orders().never();

        let svc = service(store, MockGridCache::new());
        let query = OrderQuery {
            order_status: Some(7),
            ..Default::default()
        };
        let result = svc.list_orders(&claims(Role::Admin, 1), &query).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
