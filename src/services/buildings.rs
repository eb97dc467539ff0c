//! Building management service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        building::{BuildingPage, BuildingQuery, CreateBuilding},
        Building, Pitch, UserClaims,
    },
    repository::Repository,
    scheduling::{generate_slots, SLOT_DURATION_SECS},
    services::redis::GridCache,
};

#[derive(Clone)]
pub struct BuildingsService {
    repository: Repository,
    cache: Arc<dyn GridCache>,
}

impl BuildingsService {
    pub fn new(repository: Repository, cache: Arc<dyn GridCache>) -> Self {
        Self { repository, cache }
    }

    /// Create a building managed by the requester, with its slot grid
    pub async fn create_building(&self, claims: &UserClaims, data: CreateBuilding) -> AppResult<Building> {
        claims.require_manager()?;
        data.validate()?;
        let grid = generate_slots(data.start_time, data.end_time, SLOT_DURATION_SECS)?;

        let (building, slots) = self
            .repository
            .buildings
            .create(&data, claims.user_id, &grid)
            .await?;

        tracing::info!(
            building_id = building.id,
            manager_id = building.manager_id,
            slots = slots.len(),
            "Building created"
        );

        if let Err(e) = self.cache.put_grid(building.id, slots).await {
            tracing::warn!(building_id = building.id, error = %e, "Slot grid cache write failed");
        }
        Ok(building)
    }

    pub async fn get_building(&self, id: i32) -> AppResult<Building> {
        self.repository.buildings.get_by_id(id).await
    }

    pub async fn list_buildings(&self, query: &BuildingQuery) -> AppResult<BuildingPage> {
        let (data, page_info) = self.repository.buildings.list(query).await?;
        Ok(BuildingPage { data, page_info })
    }

    /// Delete a building; only its manager or an admin may do so.
    ///
    /// The cached grid is evicted first; the building is kept if that fails.
    pub async fn delete_building(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        let building = self.repository.buildings.get_by_id(id).await?;
        claims.require_building_owner(building.manager_id)?;

        self.cache.evict_grid(id).await?;
        self.repository.buildings.delete(id).await?;
        tracing::info!(building_id = id, "Building deleted");

        // A concurrent grid read may have refilled the entry in between
        if let Err(e) = self.cache.evict_grid(id).await {
            tracing::warn!(building_id = id, error = %e, "Slot grid cache eviction failed");
        }
        Ok(())
    }

    /// Pitches of an existing building
    pub async fn list_pitches(&self, building_id: i32) -> AppResult<Vec<Pitch>> {
        self.repository.buildings.get_by_id(building_id).await?;
        self.repository.pitches.list_for_building(building_id).await
    }
}
