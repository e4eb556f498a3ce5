//! Repository layer for database operations

pub mod activities;
pub mod attachments;
pub mod clients;
pub mod equipment;
pub mod equipment_models;
pub mod hierarchy;
pub mod spare_parts;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub activities: activities::ActivitiesRepository,
    pub clients: clients::ClientsRepository,
    pub equipment: equipment::EquipmentRepository,
    pub equipment_models: equipment_models::EquipmentModelsRepository,
    pub spare_parts: spare_parts::SparePartsRepository,
    pub attachments: attachments::AttachmentsRepository,
    pub hierarchy: hierarchy::HierarchyRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            activities: activities::ActivitiesRepository::new(pool.clone()),
            clients: clients::ClientsRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            equipment_models: equipment_models::EquipmentModelsRepository::new(pool.clone()),
            spare_parts: spare_parts::SparePartsRepository::new(pool.clone()),
            attachments: attachments::AttachmentsRepository::new(pool.clone()),
            hierarchy: hierarchy::HierarchyRepository::new(pool.clone()),
            pool,
        }
    }
}
