//! Hierarchy report types
//!
//! Read-only nested view Client -> activity group -> Equipment derived from
//! a flat outer-join row set. The fold itself lives in `services::hierarchy`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::ActivityState;

/// One flat input row: a (client, equipment, activity) triple where the
/// activity side of the join may be absent
#[derive(Debug, Clone, FromRow)]
pub struct HierarchyRow {
    pub client_id: i32,
    pub client_name: String,
    pub equipment_id: i32,
    pub model_name: Option<String>,
    pub serial: Option<String>,
    pub activity_id: Option<i32>,
    pub activity_state: Option<ActivityState>,
}

/// Equipment entry inside a hierarchy bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HierarchyEquipment {
    pub id: i32,
    pub model_name: Option<String>,
    pub serial: Option<String>,
}

/// Equipment grouped under one activity, or under the synthetic
/// "unassigned" bucket when `activity_id` is null
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HierarchyGroup {
    pub activity_id: Option<i32>,
    pub state: Option<ActivityState>,
    pub equipment: Vec<HierarchyEquipment>,
}

/// One client aggregate, in first-seen input order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HierarchyClient {
    pub id: i32,
    pub name: String,
    /// Distinct equipment across all buckets of this client
    pub equipment_count: i64,
    /// Distinct non-null activity ids of this client
    pub activities_count: i64,
    pub groups: Vec<HierarchyGroup>,
}

/// Full hierarchy report with global totals
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HierarchyReport {
    pub clients: Vec<HierarchyClient>,
    pub total_clients: i64,
    pub total_equipment: i64,
    pub total_activities: i64,
}
