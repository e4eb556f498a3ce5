//! Hierarchy report row loader
//!
//! Produces the flat (client, equipment, activity) row set the pure fold in
//! `services::hierarchy` consumes. An equipment unit participates in an
//! activity either as its primary binding or through a link row; both count.

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::hierarchy::HierarchyRow};

#[derive(Clone)]
pub struct HierarchyRepository {
    pool: Pool<Postgres>,
}

impl HierarchyRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Fetch one row per (client, equipment, activity), activity optional
    pub async fn fetch_rows(&self) -> AppResult<Vec<HierarchyRow>> {
        let rows = sqlx::query_as::<_, HierarchyRow>(
            r#"
            SELECT c.id AS client_id, c.name AS client_name,
                   e.id AS equipment_id, m.name AS model_name, e.serial,
                   p.activity_id, p.activity_state
            FROM clients c
            JOIN equipment e ON e.client_id = c.id
            LEFT JOIN equipment_models m ON m.id = e.model_id
            LEFT JOIN (
                SELECT equipment_id, id AS activity_id, state AS activity_state
                FROM activities
                WHERE equipment_id IS NOT NULL
                UNION
                SELECT ae.equipment_id, a.id, a.state
                FROM activity_equipment ae
                JOIN activities a ON a.id = ae.activity_id
            ) p ON p.equipment_id = e.id
            ORDER BY c.name, c.id, p.activity_id NULLS FIRST, e.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
