//! Activity lifecycle engine
//!
//! Owns every mutation of the activity aggregate. State changes are
//! validated against the transition table and the role policy before any
//! write; mutations of one activity are serialized by a keyed lock.

use crate::{
    error::{AppError, AppResult},
    models::activity::{
        Activity, ActivityQuery, ActivitySummary, AddSparePartUsage, AllowedTransitions,
        CreateActivity, LinkEquipment, LinkedEquipment, SparePartUsage, TransitionRequest,
        TransitionResponse, UpdateActivity,
    },
    models::identity::Identity,
    models::intervention::{CreateIntervention, Intervention},
    repository::Repository,
    services::equipment::EquipmentService,
    services::locks::KeyedLocks,
    workflow,
};

#[derive(Clone)]
pub struct ActivitiesService {
    repository: Repository,
    equipment: EquipmentService,
    write_locks: KeyedLocks<i32>,
}

impl ActivitiesService {
    pub fn new(repository: Repository, equipment: EquipmentService) -> Self {
        Self {
            repository,
            equipment,
            write_locks: KeyedLocks::new(),
        }
    }

    // =========================================================================
    // ACTIVITY CRUD
    // =========================================================================

    /// Get activity by ID
    pub async fn get(&self, id: i32) -> AppResult<Activity> {
        self.repository.activities.get_by_id(id).await
    }

    /// Search activities
    pub async fn search(&self, query: &ActivityQuery) -> AppResult<(Vec<ActivitySummary>, i64)> {
        self.repository.activities.search(query).await
    }

    /// Create activity. Always starts open.
    pub async fn create(&self, data: &CreateActivity) -> AppResult<Activity> {
        // Verify client exists
        self.repository.clients.get_by_id(data.client_id).await?;
        if let Some(equipment_id) = data.equipment_id {
            let equipment = self.repository.equipment.get_by_id(equipment_id).await?;
            if equipment.client_id != data.client_id {
                return Err(AppError::invalid_field(
                    "equipment_id",
                    "Equipment belongs to another client",
                ));
            }
        }
        self.repository.activities.create(data).await
    }

    /// Update activity fields (partial). The state never changes here.
    ///
    /// An explicit `equipment_id` wins; otherwise a supplied `model_id`
    /// (plus optional `serial`) goes through the linkage resolver against
    /// the activity's client.
    pub async fn update(&self, id: i32, data: &UpdateActivity) -> AppResult<Activity> {
        let _guard = self.write_locks.acquire(id).await;

        let activity = self.repository.activities.get_by_id(id).await?;

        let equipment_id = match (data.equipment_id, data.model_id) {
            (Some(equipment_id), _) => {
                let equipment = self.repository.equipment.get_by_id(equipment_id).await?;
                if equipment.client_id != activity.client_id {
                    return Err(AppError::invalid_field(
                        "equipment_id",
                        "Equipment belongs to another client",
                    ));
                }
                Some(equipment_id)
            }
            (None, Some(model_id)) => {
                let resolved = self
                    .equipment
                    .resolve_or_create(activity.client_id, model_id, data.serial.as_deref())
                    .await?;
                Some(resolved.id)
            }
            (None, None) => {
                if data.serial.is_some() {
                    return Err(AppError::invalid_field(
                        "serial",
                        "A serial can only be supplied together with model_id",
                    ));
                }
                None
            }
        };

        self.repository.activities.update(id, data, equipment_id).await
    }

    /// Delete an activity and its owned rows. Attachments stay.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let _guard = self.write_locks.acquire(id).await;
        self.repository.activities.delete(id).await
    }

    // =========================================================================
    // STATE TRANSITIONS
    // =========================================================================

    /// Drive an activity across one edge of the state graph.
    ///
    /// Failure order is fixed: missing activity, illegal edge, missing
    /// closing date, role denial. Nothing is written unless every check
    /// passes.
    pub async fn transition(
        &self,
        id: i32,
        request: &TransitionRequest,
        identity: &Identity,
    ) -> AppResult<TransitionResponse> {
        let _guard = self.write_locks.acquire(id).await;

        let activity = self.repository.activities.get_by_id(id).await?;
        let rule = workflow::evaluate(
            activity.state,
            request.target_state,
            request.closing_date.is_some(),
            identity.role,
        )?;

        // closed_at moves only on edges into closed; a stray closing date
        // on a reopen request is ignored
        let closing_date = if rule.requires_closing_date {
            request.closing_date
        } else {
            None
        };

        let updated = self
            .repository
            .activities
            .apply_transition(id, rule.to, closing_date, request.note.as_deref())
            .await?;

        tracing::info!(
            "Activity {} moved from {} to {} by {} ({})",
            id,
            activity.state,
            updated.state,
            identity.sub,
            identity.role
        );

        Ok(TransitionResponse {
            description: format!("state changed from {} to {}", activity.state, updated.state),
            activity: updated,
        })
    }

    /// Targets the caller may transition an activity to, given its current
    /// state and the caller's role. Pure read.
    pub async fn allowed_transitions(
        &self,
        id: i32,
        identity: &Identity,
    ) -> AppResult<AllowedTransitions> {
        let activity = self.repository.activities.get_by_id(id).await?;
        Ok(AllowedTransitions {
            current_state: activity.state,
            allowed_targets: workflow::transitions::allowed_targets(activity.state, identity.role),
        })
    }

    // =========================================================================
    // EQUIPMENT LINKS
    // =========================================================================

    /// Link an equipment unit to an activity
    pub async fn link_equipment(&self, activity_id: i32, data: &LinkEquipment) -> AppResult<()> {
        // Verify both sides exist
        self.repository.activities.get_by_id(activity_id).await?;
        self.repository.equipment.get_by_id(data.equipment_id).await?;

        self.repository
            .activities
            .link_equipment(activity_id, data.equipment_id, data.note.as_deref())
            .await
    }

    /// Unlink an equipment unit. Absent links unlink silently.
    pub async fn unlink_equipment(&self, activity_id: i32, equipment_id: i32) -> AppResult<()> {
        self.repository
            .activities
            .unlink_equipment(activity_id, equipment_id)
            .await
    }

    /// List equipment linked to an activity
    pub async fn list_linked_equipment(&self, activity_id: i32) -> AppResult<Vec<LinkedEquipment>> {
        self.repository.activities.get_by_id(activity_id).await?;
        self.repository.activities.list_linked_equipment(activity_id).await
    }

    // =========================================================================
    // SPARE PART USAGE
    // =========================================================================

    /// Record a spare part applied to an activity
    pub async fn add_spare_part_usage(
        &self,
        activity_id: i32,
        data: &AddSparePartUsage,
    ) -> AppResult<SparePartUsage> {
        // Verify both sides exist
        self.repository.activities.get_by_id(activity_id).await?;
        self.repository.spare_parts.get_by_id(data.spare_part_id).await?;

        self.repository
            .activities
            .add_spare_part_usage(activity_id, data)
            .await
    }

    /// Remove a usage row. Absent rows remove silently.
    pub async fn remove_spare_part_usage(&self, activity_id: i32, usage_id: i32) -> AppResult<()> {
        self.repository
            .activities
            .remove_spare_part_usage(activity_id, usage_id)
            .await
    }

    /// List spare part usage rows of an activity
    pub async fn list_spare_part_usages(&self, activity_id: i32) -> AppResult<Vec<SparePartUsage>> {
        self.repository.activities.get_by_id(activity_id).await?;
        self.repository.activities.list_spare_part_usages(activity_id).await
    }

    // =========================================================================
    // INTERVENTIONS
    // =========================================================================

    /// Append an intervention log entry
    pub async fn add_intervention(
        &self,
        activity_id: i32,
        data: &CreateIntervention,
    ) -> AppResult<Intervention> {
        self.repository.activities.get_by_id(activity_id).await?;
        self.repository.activities.add_intervention(activity_id, data).await
    }

    /// List interventions of an activity
    pub async fn list_interventions(&self, activity_id: i32) -> AppResult<Vec<Intervention>> {
        self.repository.activities.get_by_id(activity_id).await?;
        self.repository.activities.list_interventions(activity_id).await
    }

    /// Delete an intervention entry
    pub async fn delete_intervention(
        &self,
        activity_id: i32,
        intervention_id: i32,
    ) -> AppResult<()> {
        self.repository
            .activities
            .delete_intervention(activity_id, intervention_id)
            .await
    }
}
