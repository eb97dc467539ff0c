//! Business logic services

pub mod buildings;
pub mod catalog;
pub mod orders;
pub mod redis;

use std::sync::Arc;

use crate::{error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub buildings: buildings::BuildingsService,
    pub catalog: catalog::CatalogService,
    pub orders: orders::OrdersService,
    pub redis: redis::RedisService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, redis_service: redis::RedisService) -> Self {
        let cache: Arc<dyn redis::GridCache> = Arc::new(redis_service.clone());
        Self {
            buildings: buildings::BuildingsService::new(repository.clone(), cache.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            orders: orders::OrdersService::new(Arc::new(repository.orders.clone()), cache),
            redis: redis_service,
            repository,
        }
    }

    /// Both backing stores answer
    pub async fn ready(&self) -> AppResult<()> {
        self.repository.ping().await?;
        self.redis.ping().await
    }
}
