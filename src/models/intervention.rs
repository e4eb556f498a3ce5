//! Intervention log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Dated free-text entry describing work performed during an activity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Intervention {
    pub id: i32,
    pub activity_id: i32,
    pub performed_at: DateTime<Utc>,
    pub technician_id: Option<i32>,
    pub report: String,
    pub created_at: DateTime<Utc>,
}

/// Create intervention request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIntervention {
    /// Defaults to now when absent
    pub performed_at: Option<DateTime<Utc>>,
    pub technician_id: Option<i32>,
    #[validate(length(min = 1, max = 8000, message = "Report must be 1-8000 characters"))]
    pub report: String,
}
