//! Catalog service for equipment models and spare parts

use crate::{
    error::AppResult,
    models::equipment_model::{
        CreateEquipmentModel, EquipmentModel, EquipmentModelQuery, UpdateEquipmentModel,
    },
    models::spare_part::{CreateSparePart, SparePart, SparePartQuery},
    repository::Repository,
    services::integrity::IntegrityGuard,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    integrity: IntegrityGuard,
}

impl CatalogService {
    pub fn new(repository: Repository, integrity: IntegrityGuard) -> Self {
        Self {
            repository,
            integrity,
        }
    }

    // =========================================================================
    // EQUIPMENT MODELS
    // =========================================================================

    /// Get model by ID
    pub async fn get_model(&self, id: i32) -> AppResult<EquipmentModel> {
        self.repository.equipment_models.get_by_id(id).await
    }

    /// Search models
    pub async fn search_models(
        &self,
        query: &EquipmentModelQuery,
    ) -> AppResult<(Vec<EquipmentModel>, i64)> {
        self.repository.equipment_models.search(query).await
    }

    /// Create model
    pub async fn create_model(&self, data: &CreateEquipmentModel) -> AppResult<EquipmentModel> {
        self.repository.equipment_models.create(data).await
    }

    /// Update model (partial)
    pub async fn update_model(
        &self,
        id: i32,
        data: &UpdateEquipmentModel,
    ) -> AppResult<EquipmentModel> {
        self.repository.equipment_models.update(id, data).await
    }

    /// Delete model, guarded against equipment references
    pub async fn delete_model(&self, id: i32) -> AppResult<()> {
        self.integrity.check_model_deletable(id).await?;
        self.repository.equipment_models.delete(id).await
    }

    // =========================================================================
    // SPARE PARTS
    // =========================================================================

    /// Get spare part by ID
    pub async fn get_spare_part(&self, id: i32) -> AppResult<SparePart> {
        self.repository.spare_parts.get_by_id(id).await
    }

    /// Search spare parts
    pub async fn search_spare_parts(
        &self,
        query: &SparePartQuery,
    ) -> AppResult<(Vec<SparePart>, i64)> {
        self.repository.spare_parts.search(query).await
    }

    /// Create spare part
    pub async fn create_spare_part(&self, data: &CreateSparePart) -> AppResult<SparePart> {
        self.repository.spare_parts.create(data).await
    }

    /// Delete spare part, guarded against usage references
    pub async fn delete_spare_part(&self, id: i32) -> AppResult<()> {
        self.integrity.check_spare_part_deletable(id).await?;
        self.repository.spare_parts.delete(id).await
    }
}
