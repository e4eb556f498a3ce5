//! Activity (work order) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{ActivityState, Urgency};

/// Activity record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Activity {
    pub id: i32,
    pub client_id: i32,
    /// Primary equipment binding; more units can be linked separately
    pub equipment_id: Option<i32>,
    pub state: ActivityState,
    pub opened_at: Option<NaiveDate>,
    /// Set exactly when transitioning into closed; a reopened activity
    /// keeps its last closing date
    pub closed_at: Option<NaiveDate>,
    pub assigned_technician_id: Option<i32>,
    pub urgency: Option<Urgency>,
    pub quote_amount: Option<Decimal>,
    pub quote_approved: Option<bool>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Activity list row with the client name joined in
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActivitySummary {
    pub id: i32,
    pub client_id: i32,
    pub client_name: String,
    pub state: ActivityState,
    pub urgency: Option<Urgency>,
    pub opened_at: Option<NaiveDate>,
    pub closed_at: Option<NaiveDate>,
    pub assigned_technician_id: Option<i32>,
}

/// Create activity request. New activities always start open.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateActivity {
    pub client_id: i32,
    pub equipment_id: Option<i32>,
    /// Defaults to today when absent
    pub opened_at: Option<NaiveDate>,
    pub assigned_technician_id: Option<i32>,
    pub urgency: Option<Urgency>,
    pub quote_amount: Option<Decimal>,
    #[validate(length(max = 4000, message = "Notes must be at most 4000 characters"))]
    pub notes: Option<String>,
}

/// Update activity request (partial). State is never updated here;
/// state changes go through the transition endpoint.
///
/// Supplying `model_id` (with an optional `serial`) and no `equipment_id`
/// resolves an equipment row for the activity's client, creating one when
/// none matches, and binds it.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateActivity {
    pub equipment_id: Option<i32>,
    pub model_id: Option<i32>,
    /// Blank serials count as absent
    #[validate(length(max = 100, message = "Serial must be at most 100 characters"))]
    pub serial: Option<String>,
    pub opened_at: Option<NaiveDate>,
    pub assigned_technician_id: Option<i32>,
    pub urgency: Option<Urgency>,
    pub quote_amount: Option<Decimal>,
    pub quote_approved: Option<bool>,
    #[validate(length(max = 4000, message = "Notes must be at most 4000 characters"))]
    pub notes: Option<String>,
}

/// State transition request
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransitionRequest {
    pub target_state: ActivityState,
    /// Required when the target is closed
    pub closing_date: Option<NaiveDate>,
    pub note: Option<String>,
}

/// State transition response
#[derive(Debug, Serialize, ToSchema)]
pub struct TransitionResponse {
    pub activity: Activity,
    /// Human-readable summary, e.g. "state changed from open to closed"
    pub description: String,
}

/// Targets the caller may transition an activity to
#[derive(Debug, Serialize, ToSchema)]
pub struct AllowedTransitions {
    pub current_state: ActivityState,
    pub allowed_targets: Vec<ActivityState>,
}

/// Link an equipment unit to an activity
#[derive(Debug, Deserialize, ToSchema)]
pub struct LinkEquipment {
    pub equipment_id: i32,
    #[serde(default)]
    pub note: Option<String>,
}

/// Equipment linked to an activity, with the per-link note
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LinkedEquipment {
    pub equipment_id: i32,
    pub model_id: i32,
    pub model_name: String,
    pub serial: Option<String>,
    pub note: Option<String>,
}

/// Record a spare part applied to an activity
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddSparePartUsage {
    pub spare_part_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(length(min = 1, max = 100, message = "Serial must be 1-100 characters"))]
    pub serial: Option<String>,
}

/// Spare part usage row with the part's name joined in
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SparePartUsage {
    pub id: i32,
    pub activity_id: i32,
    pub spare_part_id: i32,
    pub part_name: String,
    pub part_code: Option<String>,
    pub quantity: i32,
    pub serial: Option<String>,
}

/// Activity query parameters (API)
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ActivityQuery {
    pub client_id: Option<i32>,
    pub state: Option<ActivityState>,
    pub urgency: Option<Urgency>,
    pub assigned_technician_id: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
