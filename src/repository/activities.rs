//! Activities repository for database operations
//!
//! The activity aggregate owns its equipment links, spare part usage rows
//! and intervention entries; attachments are deliberately left out of the
//! delete path and live under their own repository.

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::activity::{
        Activity, ActivityQuery, ActivitySummary, AddSparePartUsage, CreateActivity,
        LinkedEquipment, SparePartUsage, UpdateActivity,
    },
    models::enums::ActivityState,
    models::intervention::{CreateIntervention, Intervention},
};

#[derive(Clone)]
pub struct ActivitiesRepository {
    pool: Pool<Postgres>,
}

impl ActivitiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // ACTIVITY CRUD
    // =========================================================================

    /// Get activity by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Activity> {
        sqlx::query_as::<_, Activity>("SELECT * FROM activities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))
    }

    /// Search activities with the client name joined in, paginated
    pub async fn search(&self, query: &ActivityQuery) -> AppResult<(Vec<ActivitySummary>, i64)> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.client_id.is_some() {
            conditions.push(format!("a.client_id = ${}", idx));
            idx += 1;
        }
        if query.state.is_some() {
            conditions.push(format!("a.state = ${}", idx));
            idx += 1;
        }
        if query.urgency.is_some() {
            conditions.push(format!("a.urgency = ${}", idx));
            idx += 1;
        }
        if query.assigned_technician_id.is_some() {
            conditions.push(format!("a.assigned_technician_id = ${}", idx));
            idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM activities a {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(v) = query.client_id {
            count_builder = count_builder.bind(v);
        }
        if let Some(v) = query.state {
            count_builder = count_builder.bind(v);
        }
        if let Some(v) = query.urgency {
            count_builder = count_builder.bind(v);
        }
        if let Some(v) = query.assigned_technician_id {
            count_builder = count_builder.bind(v);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

        let select_query = format!(
            r#"
            SELECT a.id, a.client_id, c.name AS client_name, a.state, a.urgency,
                   a.opened_at, a.closed_at, a.assigned_technician_id
            FROM activities a
            JOIN clients c ON c.id = a.client_id
            {}
            ORDER BY a.id DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            idx,
            idx + 1
        );
        let mut select_builder = sqlx::query_as::<_, ActivitySummary>(&select_query);
        if let Some(v) = query.client_id {
            select_builder = select_builder.bind(v);
        }
        if let Some(v) = query.state {
            select_builder = select_builder.bind(v);
        }
        if let Some(v) = query.urgency {
            select_builder = select_builder.bind(v);
        }
        if let Some(v) = query.assigned_technician_id {
            select_builder = select_builder.bind(v);
        }
        let rows = select_builder
            .bind(per_page)
            .bind((page - 1) * per_page)
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Create activity. New activities always start open.
    pub async fn create(&self, data: &CreateActivity) -> AppResult<Activity> {
        let row = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (client_id, equipment_id, state, opened_at,
                                    assigned_technician_id, urgency, quote_amount, notes)
            VALUES ($1, $2, 'open', COALESCE($3, CURRENT_DATE), $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(data.client_id)
        .bind(data.equipment_id)
        .bind(data.opened_at)
        .bind(data.assigned_technician_id)
        .bind(data.urgency)
        .bind(data.quote_amount)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update activity fields (partial). The state never changes here.
    ///
    /// `equipment_id` is the binding resolved by the linkage resolver;
    /// `data.equipment_id` / `data.model_id` / `data.serial` are its inputs
    /// and are not bound directly.
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateActivity,
        equipment_id: Option<i32>,
    ) -> AppResult<Activity> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(equipment_id, "equipment_id");
        add_field!(data.opened_at, "opened_at");
        add_field!(data.assigned_technician_id, "assigned_technician_id");
        add_field!(data.urgency, "urgency");
        add_field!(data.quote_amount, "quote_amount");
        add_field!(data.quote_approved, "quote_approved");
        add_field!(data.notes, "notes");

        let query = format!(
            "UPDATE activities SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, Activity>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(equipment_id);
        bind_field!(data.opened_at);
        bind_field!(data.assigned_technician_id);
        bind_field!(data.urgency);
        bind_field!(data.quote_amount);
        bind_field!(data.quote_approved);
        bind_field!(data.notes);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))
    }

    /// Apply a validated state transition in a single statement.
    ///
    /// `closed_at` is only written when a closing date is supplied; a
    /// reopened activity keeps its previous closing date. A note is
    /// appended to the activity notes.
    pub async fn apply_transition(
        &self,
        id: i32,
        new_state: ActivityState,
        closing_date: Option<NaiveDate>,
        note: Option<&str>,
    ) -> AppResult<Activity> {
        sqlx::query_as::<_, Activity>(
            r#"
            UPDATE activities
            SET state = $1,
                closed_at = COALESCE($2::date, closed_at),
                notes = CASE
                    WHEN $3::text IS NULL THEN notes
                    WHEN notes IS NULL OR notes = '' THEN $3
                    ELSE notes || E'\n' || $3
                END,
                updated_at = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(new_state)
        .bind(closing_date)
        .bind(note)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))
    }

    /// Delete an activity together with its owned rows in one statement.
    /// Attachments stay; they are removed only through their own delete.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            WITH deleted_links AS (
                DELETE FROM activity_equipment WHERE activity_id = $1
            ), deleted_parts AS (
                DELETE FROM activity_spare_parts WHERE activity_id = $1
            ), deleted_interventions AS (
                DELETE FROM interventions WHERE activity_id = $1
            )
            DELETE FROM activities WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Activity {} not found", id)));
        }
        Ok(())
    }

    // =========================================================================
    // EQUIPMENT LINKS
    // =========================================================================

    /// Link equipment to an activity. Fails Conflict when already linked.
    pub async fn link_equipment(
        &self,
        activity_id: i32,
        equipment_id: i32,
        note: Option<&str>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO activity_equipment (activity_id, equipment_id, note)
            VALUES ($1, $2, $3)
            ON CONFLICT (activity_id, equipment_id) DO NOTHING
            "#,
        )
        .bind(activity_id)
        .bind(equipment_id)
        .bind(note)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "Equipment {} is already linked to activity {}",
                equipment_id, activity_id
            )));
        }
        Ok(())
    }

    /// Unlink equipment from an activity. Removing an absent link is not
    /// an error.
    pub async fn unlink_equipment(&self, activity_id: i32, equipment_id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM activity_equipment WHERE activity_id = $1 AND equipment_id = $2")
            .bind(activity_id)
            .bind(equipment_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// List equipment linked to an activity
    pub async fn list_linked_equipment(&self, activity_id: i32) -> AppResult<Vec<LinkedEquipment>> {
        let rows = sqlx::query_as::<_, LinkedEquipment>(
            r#"
            SELECT ae.equipment_id, e.model_id, m.name AS model_name, e.serial, ae.note
            FROM activity_equipment ae
            JOIN equipment e ON e.id = ae.equipment_id
            JOIN equipment_models m ON m.id = e.model_id
            WHERE ae.activity_id = $1
            ORDER BY ae.id
            "#,
        )
        .bind(activity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
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
        let usage_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO activity_spare_parts (activity_id, spare_part_id, quantity, serial)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(activity_id)
        .bind(data.spare_part_id)
        .bind(data.quantity)
        .bind(&data.serial)
        .fetch_one(&self.pool)
        .await?;

        self.get_spare_part_usage(usage_id).await
    }

    /// Remove a usage row. Removing an absent row is not an error.
    pub async fn remove_spare_part_usage(&self, activity_id: i32, usage_id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM activity_spare_parts WHERE id = $1 AND activity_id = $2")
            .bind(usage_id)
            .bind(activity_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// List spare part usage rows of an activity
    pub async fn list_spare_part_usages(&self, activity_id: i32) -> AppResult<Vec<SparePartUsage>> {
        let rows = sqlx::query_as::<_, SparePartUsage>(
            r#"
            SELECT u.id, u.activity_id, u.spare_part_id, p.name AS part_name,
                   p.code AS part_code, u.quantity, u.serial
            FROM activity_spare_parts u
            JOIN spare_parts p ON p.id = u.spare_part_id
            WHERE u.activity_id = $1
            ORDER BY u.id
            "#,
        )
        .bind(activity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_spare_part_usage(&self, usage_id: i32) -> AppResult<SparePartUsage> {
        sqlx::query_as::<_, SparePartUsage>(
            r#"
            SELECT u.id, u.activity_id, u.spare_part_id, p.name AS part_name,
                   p.code AS part_code, u.quantity, u.serial
            FROM activity_spare_parts u
            JOIN spare_parts p ON p.id = u.spare_part_id
            WHERE u.id = $1
            "#,
        )
        .bind(usage_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Spare part usage {} not found", usage_id)))
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
        let row = sqlx::query_as::<_, Intervention>(
            r#"
            INSERT INTO interventions (activity_id, performed_at, technician_id, report)
            VALUES ($1, COALESCE($2, NOW()), $3, $4)
            RETURNING *
            "#,
        )
        .bind(activity_id)
        .bind(data.performed_at)
        .bind(data.technician_id)
        .bind(&data.report)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// List interventions of an activity, most recent first
    pub async fn list_interventions(&self, activity_id: i32) -> AppResult<Vec<Intervention>> {
        let rows = sqlx::query_as::<_, Intervention>(
            "SELECT * FROM interventions WHERE activity_id = $1 ORDER BY performed_at DESC, id DESC",
        )
        .bind(activity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Delete an intervention entry
    pub async fn delete_intervention(&self, activity_id: i32, intervention_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM interventions WHERE id = $1 AND activity_id = $2")
            .bind(intervention_id)
            .bind(activity_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Intervention {} not found",
                intervention_id
            )));
        }
        Ok(())
    }

    // =========================================================================
    // REFERENCE COUNTS (integrity guard)
    // =========================================================================

    /// Activities belonging to a client
    pub async fn count_for_client(&self, client_id: i32) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM activities WHERE client_id = $1",
        )
        .bind(client_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Activities referencing an equipment unit, through the primary
    /// binding or a link row
    pub async fn count_referencing_equipment(&self, equipment_id: i32) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT (SELECT COUNT(*) FROM activities WHERE equipment_id = $1)
                 + (SELECT COUNT(*) FROM activity_equipment WHERE equipment_id = $1)
            "#,
        )
        .bind(equipment_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
