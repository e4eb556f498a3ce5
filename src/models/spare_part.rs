//! Spare part catalog model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Consumable part that can be applied to an activity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SparePart {
    pub id: i32,
    pub name: String,
    /// Supplier or internal reference code
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create spare part request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSparePart {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(max = 100, message = "Code must be at most 100 characters"))]
    pub code: Option<String>,
}

/// Spare part query parameters (API)
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SparePartQuery {
    /// Substring match on name or code
    pub name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
