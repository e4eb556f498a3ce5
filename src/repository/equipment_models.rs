//! Equipment model catalog repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::equipment_model::{
        CreateEquipmentModel, EquipmentModel, EquipmentModelQuery, UpdateEquipmentModel,
    },
};

#[derive(Clone)]
pub struct EquipmentModelsRepository {
    pool: Pool<Postgres>,
}

impl EquipmentModelsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get model by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<EquipmentModel> {
        sqlx::query_as::<_, EquipmentModel>("SELECT * FROM equipment_models WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Model {} not found", id)))
    }

    /// Search models with pagination
    pub async fn search(&self, query: &EquipmentModelQuery) -> AppResult<(Vec<EquipmentModel>, i64)> {
        let name_pattern = query
            .name
            .as_ref()
            .map(|n| format!("%{}%", n.to_lowercase()));

        let (where_clause, limit_idx) = if name_pattern.is_some() {
            ("WHERE LOWER(name) LIKE $1".to_string(), 2)
        } else {
            (String::new(), 1)
        };

        let count_query = format!("SELECT COUNT(*) FROM equipment_models {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref pattern) = name_pattern {
            count_builder = count_builder.bind(pattern);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

        let select_query = format!(
            "SELECT * FROM equipment_models {} ORDER BY name, id LIMIT ${} OFFSET ${}",
            where_clause,
            limit_idx,
            limit_idx + 1
        );
        let mut select_builder = sqlx::query_as::<_, EquipmentModel>(&select_query);
        if let Some(ref pattern) = name_pattern {
            select_builder = select_builder.bind(pattern);
        }
        let rows = select_builder
            .bind(per_page)
            .bind((page - 1) * per_page)
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Create model
    pub async fn create(&self, data: &CreateEquipmentModel) -> AppResult<EquipmentModel> {
        let row = sqlx::query_as::<_, EquipmentModel>(
            r#"
            INSERT INTO equipment_models (name, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update model (partial)
    pub async fn update(&self, id: i32, data: &UpdateEquipmentModel) -> AppResult<EquipmentModel> {
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

        add_field!(data.name, "name");
        add_field!(data.description, "description");

        let query = format!(
            "UPDATE equipment_models SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, EquipmentModel>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.description);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Model {} not found", id)))
    }

    /// Delete model. The integrity guard checks references first.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment_models WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Model {} not found", id)));
        }
        Ok(())
    }
}
