//! Attachment metadata model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::AttachmentOwner;

/// Uploaded file metadata. The bytes live in object storage under
/// `storage_key`; deleting the owner entity does not remove them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attachment {
    pub id: i32,
    pub owner_type: AttachmentOwner,
    pub owner_id: i32,
    pub original_name: String,
    pub storage_key: String,
    pub mime_type: String,
    pub size_bytes: i64,
    /// Category tag, e.g. "test-report" or "photo"
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Attachment query parameters (API)
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AttachmentQuery {
    /// Filter by category tag
    pub category: Option<String>,
}
