//! Spare parts catalog repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::spare_part::{CreateSparePart, SparePart, SparePartQuery},
};

#[derive(Clone)]
pub struct SparePartsRepository {
    pool: Pool<Postgres>,
}

impl SparePartsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get spare part by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<SparePart> {
        sqlx::query_as::<_, SparePart>("SELECT * FROM spare_parts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Spare part {} not found", id)))
    }

    /// Search spare parts with pagination
    pub async fn search(&self, query: &SparePartQuery) -> AppResult<(Vec<SparePart>, i64)> {
        let name_pattern = query
            .name
            .as_ref()
            .map(|n| format!("%{}%", n.to_lowercase()));

        let (where_clause, limit_idx) = if name_pattern.is_some() {
            (
                "WHERE LOWER(name) LIKE $1 OR LOWER(code) LIKE $1".to_string(),
                2,
            )
        } else {
            (String::new(), 1)
        };

        let count_query = format!("SELECT COUNT(*) FROM spare_parts {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref pattern) = name_pattern {
            count_builder = count_builder.bind(pattern);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

        let select_query = format!(
            "SELECT * FROM spare_parts {} ORDER BY name, id LIMIT ${} OFFSET ${}",
            where_clause,
            limit_idx,
            limit_idx + 1
        );
        let mut select_builder = sqlx::query_as::<_, SparePart>(&select_query);
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

    /// Create spare part
    pub async fn create(&self, data: &CreateSparePart) -> AppResult<SparePart> {
        let row = sqlx::query_as::<_, SparePart>(
            r#"
            INSERT INTO spare_parts (name, code)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.code)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete spare part. The integrity guard checks usage rows first.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM spare_parts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Spare part {} not found", id)));
        }
        Ok(())
    }

    /// Usage rows referencing a spare part
    pub async fn count_usages(&self, spare_part_id: i32) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM activity_spare_parts WHERE spare_part_id = $1",
        )
        .bind(spare_part_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
