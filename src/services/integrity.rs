//! Referential integrity guard
//!
//! The sole decision point for delete preconditions. Every check is an
//! explicit count query run before the delete statement, so callers get a
//! conflict error naming the references instead of a database error. The
//! schema's foreign keys only backstop races that slip past these checks.

use crate::{
    error::{AppError, AppResult},
    repository::Repository,
};

#[derive(Clone)]
pub struct IntegrityGuard {
    repository: Repository,
}

impl IntegrityGuard {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// A client can go only when nothing references it
    pub async fn check_client_deletable(&self, client_id: i32) -> AppResult<()> {
        // Missing entities report NotFound, not a reference conflict
        self.repository.clients.get_by_id(client_id).await?;

        let equipment = self.repository.equipment.count_for_client(client_id).await?;
        if equipment > 0 {
            return Err(AppError::InUse(format!(
                "Client {} still owns {} equipment unit(s)",
                client_id, equipment
            )));
        }

        let activities = self.repository.activities.count_for_client(client_id).await?;
        if activities > 0 {
            return Err(AppError::InUse(format!(
                "Client {} still has {} activity(ies)",
                client_id, activities
            )));
        }

        Ok(())
    }

    /// A model can go only when no equipment references it
    pub async fn check_model_deletable(&self, model_id: i32) -> AppResult<()> {
        self.repository.equipment_models.get_by_id(model_id).await?;

        let references = self.repository.equipment.count_for_model(model_id).await?;
        if references > 0 {
            return Err(AppError::InUse(format!(
                "Model {} is referenced by {} equipment unit(s)",
                model_id, references
            )));
        }

        Ok(())
    }

    /// Equipment can go only when no activity binds or links it
    pub async fn check_equipment_deletable(&self, equipment_id: i32) -> AppResult<()> {
        self.repository.equipment.get_by_id(equipment_id).await?;

        let references = self
            .repository
            .activities
            .count_referencing_equipment(equipment_id)
            .await?;
        if references > 0 {
            return Err(AppError::InUse(format!(
                "Equipment {} is referenced by {} activity(ies)",
                equipment_id, references
            )));
        }

        Ok(())
    }

    /// A spare part can go only when no usage row references it
    pub async fn check_spare_part_deletable(&self, spare_part_id: i32) -> AppResult<()> {
        self.repository.spare_parts.get_by_id(spare_part_id).await?;

        let usages = self.repository.spare_parts.count_usages(spare_part_id).await?;
        if usages > 0 {
            return Err(AppError::InUse(format!(
                "Spare part {} is used by {} activity record(s)",
                spare_part_id, usages
            )));
        }

        Ok(())
    }
}
