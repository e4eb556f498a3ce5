//! Attachment metadata repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::attachment::Attachment,
    models::enums::AttachmentOwner,
};

#[derive(Clone)]
pub struct AttachmentsRepository {
    pool: Pool<Postgres>,
}

impl AttachmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get attachment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Attachment> {
        sqlx::query_as::<_, Attachment>("SELECT * FROM attachments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attachment {} not found", id)))
    }

    /// Record uploaded file metadata
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        owner_type: AttachmentOwner,
        owner_id: i32,
        original_name: &str,
        storage_key: &str,
        mime_type: &str,
        size_bytes: i64,
        category: Option<&str>,
    ) -> AppResult<Attachment> {
        let row = sqlx::query_as::<_, Attachment>(
            r#"
            INSERT INTO attachments (owner_type, owner_id, original_name, storage_key,
                                     mime_type, size_bytes, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(owner_type)
        .bind(owner_id)
        .bind(original_name)
        .bind(storage_key)
        .bind(mime_type)
        .bind(size_bytes)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// List attachments of an owner, optionally filtered by category
    pub async fn list_for_owner(
        &self,
        owner_type: AttachmentOwner,
        owner_id: i32,
        category: Option<&str>,
    ) -> AppResult<Vec<Attachment>> {
        let rows = match category {
            Some(category) => {
                sqlx::query_as::<_, Attachment>(
                    r#"
                    SELECT * FROM attachments
                    WHERE owner_type = $1 AND owner_id = $2 AND category = $3
                    ORDER BY created_at DESC, id DESC
                    "#,
                )
                .bind(owner_type)
                .bind(owner_id)
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Attachment>(
                    r#"
                    SELECT * FROM attachments
                    WHERE owner_type = $1 AND owner_id = $2
                    ORDER BY created_at DESC, id DESC
                    "#,
                )
                .bind(owner_type)
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    /// Delete attachment metadata
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM attachments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Attachment {} not found", id)));
        }
        Ok(())
    }
}
