//! Business logic services

pub mod activities;
pub mod attachments;
pub mod catalog;
pub mod clients;
pub mod equipment;
pub mod hierarchy;
pub mod integrity;
pub mod locks;
pub mod storage;

use std::sync::Arc;

use crate::error::AppResult;
use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub activities: activities::ActivitiesService,
    pub attachments: attachments::AttachmentsService,
    pub catalog: catalog::CatalogService,
    pub clients: clients::ClientsService,
    pub equipment: equipment::EquipmentService,
    pub hierarchy: hierarchy::HierarchyService,
    pub integrity: integrity::IntegrityGuard,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository and storage backend
    pub fn new(repository: Repository, storage: Arc<dyn storage::ObjectStorage>) -> Self {
        let integrity = integrity::IntegrityGuard::new(repository.clone());
        let equipment =
            equipment::EquipmentService::new(repository.clone(), integrity.clone());

        Self {
            activities: activities::ActivitiesService::new(
                repository.clone(),
                equipment.clone(),
            ),
            attachments: attachments::AttachmentsService::new(repository.clone(), storage),
            catalog: catalog::CatalogService::new(repository.clone(), integrity.clone()),
            clients: clients::ClientsService::new(repository.clone(), integrity.clone()),
            hierarchy: hierarchy::HierarchyService::new(repository.clone()),
            equipment,
            integrity,
            repository,
        }
    }

    /// Verify the backing store answers. The readiness endpoint gates on
    /// this.
    pub async fn ping_database(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.repository.pool)
            .await?;
        Ok(())
    }
}
