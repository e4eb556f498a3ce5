//! Equipment repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, EquipmentDetails, EquipmentQuery, UpdateEquipment},
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Get equipment by ID with client and model names joined in
    pub async fn get_details_by_id(&self, id: i32) -> AppResult<EquipmentDetails> {
        sqlx::query_as::<_, EquipmentDetails>(
            r#"
            SELECT e.id, e.client_id, c.name AS client_name,
                   e.model_id, m.name AS model_name, e.serial,
                   e.functional_test_date, e.electrical_test_date, e.notes
            FROM equipment e
            JOIN clients c ON c.id = e.client_id
            JOIN equipment_models m ON m.id = e.model_id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Search equipment with client and model names, paginated
    pub async fn search(&self, query: &EquipmentQuery) -> AppResult<(Vec<EquipmentDetails>, i64)> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.client_id.is_some() {
            conditions.push(format!("e.client_id = ${}", idx));
            idx += 1;
        }
        if query.model_id.is_some() {
            conditions.push(format!("e.model_id = ${}", idx));
            idx += 1;
        }
        if query.serial.is_some() {
            conditions.push(format!("e.serial = ${}", idx));
            idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM equipment e {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(v) = query.client_id {
            count_builder = count_builder.bind(v);
        }
        if let Some(v) = query.model_id {
            count_builder = count_builder.bind(v);
        }
        if let Some(ref v) = query.serial {
            count_builder = count_builder.bind(v);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

        let select_query = format!(
            r#"
            SELECT e.id, e.client_id, c.name AS client_name,
                   e.model_id, m.name AS model_name, e.serial,
                   e.functional_test_date, e.electrical_test_date, e.notes
            FROM equipment e
            JOIN clients c ON c.id = e.client_id
            JOIN equipment_models m ON m.id = e.model_id
            {}
            ORDER BY c.name, m.name, e.id
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            idx,
            idx + 1
        );
        let mut select_builder = sqlx::query_as::<_, EquipmentDetails>(&select_query);
        if let Some(v) = query.client_id {
            select_builder = select_builder.bind(v);
        }
        if let Some(v) = query.model_id {
            select_builder = select_builder.bind(v);
        }
        if let Some(ref v) = query.serial {
            select_builder = select_builder.bind(v);
        }
        let rows = select_builder
            .bind(per_page)
            .bind((page - 1) * per_page)
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Find the equipment of a client matching model and serial. A missing
    /// serial matches only rows with no serial.
    pub async fn find_by_client_model_serial(
        &self,
        client_id: i32,
        model_id: i32,
        serial: Option<&str>,
    ) -> AppResult<Option<Equipment>> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            SELECT * FROM equipment
            WHERE client_id = $1 AND model_id = $2 AND serial IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(client_id)
        .bind(model_id)
        .bind(serial)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Create equipment
    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (client_id, model_id, serial, functional_test_date, electrical_test_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.client_id)
        .bind(data.model_id)
        .bind(&data.serial)
        .bind(data.functional_test_date)
        .bind(data.electrical_test_date)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(format!(
                "Equipment with this serial already exists for client {}",
                data.client_id
            )),
            _ => AppError::Database(e),
        })?;
        Ok(row)
    }

    /// Update equipment (partial)
    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
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

        add_field!(data.model_id, "model_id");
        add_field!(data.serial, "serial");
        add_field!(data.functional_test_date, "functional_test_date");
        add_field!(data.electrical_test_date, "electrical_test_date");
        add_field!(data.notes, "notes");

        let query = format!(
            "UPDATE equipment SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, Equipment>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.model_id);
        bind_field!(data.serial);
        bind_field!(data.functional_test_date);
        bind_field!(data.electrical_test_date);
        bind_field!(data.notes);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Delete equipment. The integrity guard checks references first.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    // =========================================================================
    // REFERENCE COUNTS (integrity guard)
    // =========================================================================

    /// Equipment rows belonging to a client
    pub async fn count_for_client(&self, client_id: i32) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM equipment WHERE client_id = $1",
        )
        .bind(client_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Equipment rows referencing a model
    pub async fn count_for_model(&self, model_id: i32) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM equipment WHERE model_id = $1",
        )
        .bind(model_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
