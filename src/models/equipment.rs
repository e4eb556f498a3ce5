//! Equipment model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Physical unit owned by a client, tied to a catalog model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub client_id: i32,
    pub model_id: i32,
    /// Serial number; absent while the unit is not yet identified
    pub serial: Option<String>,
    pub functional_test_date: Option<NaiveDate>,
    pub electrical_test_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Equipment with client and model names for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentDetails {
    pub id: i32,
    pub client_id: i32,
    pub client_name: String,
    pub model_id: i32,
    pub model_name: String,
    pub serial: Option<String>,
    pub functional_test_date: Option<NaiveDate>,
    pub electrical_test_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Create equipment request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    pub client_id: i32,
    pub model_id: i32,
    /// Blank serials count as absent
    #[validate(length(max = 100, message = "Serial must be at most 100 characters"))]
    pub serial: Option<String>,
    pub functional_test_date: Option<NaiveDate>,
    pub electrical_test_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Update equipment request (partial)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    pub model_id: Option<i32>,
    /// Blank serials count as absent
    #[validate(length(max = 100, message = "Serial must be at most 100 characters"))]
    pub serial: Option<String>,
    pub functional_test_date: Option<NaiveDate>,
    pub electrical_test_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Equipment query parameters (API)
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    pub client_id: Option<i32>,
    pub model_id: Option<i32>,
    /// Exact serial match
    pub serial: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
