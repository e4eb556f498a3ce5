//! Equipment management service
//!
//! Carries the linkage resolver: find-or-create of an equipment row for a
//! (client, model, serial) triple, serialized per triple by a keyed lock.
//! The unique index on the same triple backstops the race across processes.

use crate::{
    error::AppResult,
    models::equipment::{CreateEquipment, Equipment, EquipmentDetails, EquipmentQuery, UpdateEquipment},
    repository::Repository,
    services::integrity::IntegrityGuard,
    services::locks::KeyedLocks,
};

type ResolveKey = (i32, i32, Option<String>);

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    integrity: IntegrityGuard,
    resolve_locks: KeyedLocks<ResolveKey>,
}

impl EquipmentService {
    pub fn new(repository: Repository, integrity: IntegrityGuard) -> Self {
        Self {
            repository,
            integrity,
            resolve_locks: KeyedLocks::new(),
        }
    }

    /// Get equipment by ID with client and model names for display
    pub async fn get_details(&self, id: i32) -> AppResult<EquipmentDetails> {
        self.repository.equipment.get_details_by_id(id).await
    }

    /// Search equipment
    pub async fn search(&self, query: &EquipmentQuery) -> AppResult<(Vec<EquipmentDetails>, i64)> {
        self.repository.equipment.search(query).await
    }

    /// Create equipment explicitly
    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        // Verify referenced entities exist
        self.repository.clients.get_by_id(data.client_id).await?;
        self.repository.equipment_models.get_by_id(data.model_id).await?;

        let mut data = data.clone();
        data.serial = normalize_serial(data.serial.as_deref());
        self.repository.equipment.create(&data).await
    }

    /// Update equipment (partial)
    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        if let Some(model_id) = data.model_id {
            self.repository.equipment_models.get_by_id(model_id).await?;
        }

        let mut data = data.clone();
        data.serial = normalize_serial(data.serial.as_deref());
        self.repository.equipment.update(id, &data).await
    }

    /// Delete equipment, guarded against live activity references
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.integrity.check_equipment_deletable(id).await?;
        self.repository.equipment.delete(id).await
    }

    /// Resolve the equipment of `client_id` matching `model_id` and
    /// `serial`, creating the row when none matches.
    ///
    /// A missing serial matches only the client's no-serial row for that
    /// model, so repeated "same model, no serial yet" requests converge on
    /// one row instead of multiplying blanks.
    pub async fn resolve_or_create(
        &self,
        client_id: i32,
        model_id: i32,
        serial: Option<&str>,
    ) -> AppResult<Equipment> {
        // Verify the model exists before taking the lock
        self.repository.equipment_models.get_by_id(model_id).await?;

        let serial = normalize_serial(serial);

        let key = (client_id, model_id, serial.clone());
        let _guard = self.resolve_locks.acquire(key).await;

        if let Some(found) = self
            .repository
            .equipment
            .find_by_client_model_serial(client_id, model_id, serial.as_deref())
            .await?
        {
            return Ok(found);
        }

        let data = CreateEquipment {
            client_id,
            model_id,
            serial,
            functional_test_date: None,
            electrical_test_date: None,
            notes: None,
        };
        self.repository.equipment.create(&data).await
    }
}

/// Blank and whitespace-only serials count as absent; real serials are
/// stored trimmed.
fn normalize_serial(serial: Option<&str>) -> Option<String> {
    serial
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_serial_counts_as_absent() {
        assert_eq!(normalize_serial(None), None);
        assert_eq!(normalize_serial(Some("")), None);
        assert_eq!(normalize_serial(Some("   ")), None);
    }

    #[test]
    fn test_serial_is_trimmed() {
        assert_eq!(normalize_serial(Some(" SN-1 ")), Some("SN-1".to_string()));
        assert_eq!(normalize_serial(Some("SN-2")), Some("SN-2".to_string()));
    }
}
