//! Redis service caching building slot grids

use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use crate::{
    config::RedisConfig,
    error::{AppError, AppResult},
    models::Slot,
};

/// Read-through cache for the immutable slot grid of a building
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GridCache: Send + Sync {
    async fn get_grid(&self, building_id: i32) -> AppResult<Option<Vec<Slot>>>;

    async fn put_grid(&self, building_id: i32, slots: Vec<Slot>) -> AppResult<()>;

    async fn evict_grid(&self, building_id: i32) -> AppResult<()>;
}

#[derive(Clone)]
pub struct RedisService {
    client: Client,
    grid_ttl_secs: u64,
}

impl RedisService {
    /// Create a new Redis service and check the server answers
    pub async fn new(config: &RedisConfig) -> AppResult<Self> {
        let service = Self::from_client(
            Client::open(config.url.as_str())
                .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?,
            config.grid_ttl_secs,
        );
        service.ping().await?;
        Ok(service)
    }

    /// Wrap a client without connecting
    pub fn from_client(client: Client, grid_ttl_secs: u64) -> Self {
        Self {
            client,
            grid_ttl_secs,
        }
    }

    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;
        Ok(())
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))
    }
}

fn grid_key(building_id: i32) -> String {
    format!("grid:building:{}", building_id)
}

#[async_trait]
impl GridCache for RedisService {
    async fn get_grid(&self, building_id: i32) -> AppResult<Option<Vec<Slot>>> {
        let mut conn = self.connection().await?;
        let cached: Option<String> = conn
            .get(grid_key(building_id))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read slot grid from Redis: {}", e)))?;

        match cached {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| AppError::Internal(format!("Corrupt slot grid in Redis: {}", e))),
            None => Ok(None),
        }
    }

    async fn put_grid(&self, building_id: i32, slots: Vec<Slot>) -> AppResult<()> {
        let json = serde_json::to_string(&slots)
            .map_err(|e| AppError::Internal(format!("Failed to encode slot grid: {}", e)))?;
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(grid_key(building_id), json, self.grid_ttl_secs)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store slot grid in Redis: {}", e)))?;
        Ok(())
    }

    async fn evict_grid(&self, building_id: i32) -> AppResult<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(grid_key(building_id))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete slot grid from Redis: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_key() {
        assert_eq!(grid_key(42), "grid:building:42");
    }
}
