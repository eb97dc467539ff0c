//! Pitches and add-on services catalog

use validator::Validate;

use crate::{
    error::AppResult,
    models::{addon::CreateAddOn, pitch::CreatePitch, AddOn, Pitch, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a pitch to a building run by the requester
    pub async fn create_pitch(&self, claims: &UserClaims, data: CreatePitch) -> AppResult<Pitch> {
        data.validate()?;
        let building = self.repository.buildings.get_by_id(data.building_id).await?;
        claims.require_building_owner(building.manager_id)?;
        self.repository.pitches.create(&data).await
    }

    pub async fn get_pitch(&self, id: i32) -> AppResult<Pitch> {
        self.repository.pitches.get_by_id(id).await
    }

    pub async fn create_addon(&self, claims: &UserClaims, data: CreateAddOn) -> AppResult<AddOn> {
        claims.require_manager()?;
        data.validate()?;
        self.repository.addons.create(&data).await
    }

    pub async fn list_addons(&self) -> AppResult<Vec<AddOn>> {
        self.repository.addons.list().await
    }
}
