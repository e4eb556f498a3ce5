//! Equipment model (catalog entry) types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Catalog entry describing an equipment type, independent of any
/// physical unit
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentModel {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create model request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipmentModel {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    pub description: Option<String>,
}

/// Update model request (partial)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipmentModel {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Model query parameters (API)
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentModelQuery {
    /// Substring match on name
    pub name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
