//! Activity (work order) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::activity::{
        Activity, ActivityQuery, ActivitySummary, AddSparePartUsage, AllowedTransitions,
        CreateActivity, LinkEquipment, LinkedEquipment, SparePartUsage, TransitionRequest,
        TransitionResponse, UpdateActivity,
    },
    models::intervention::{CreateIntervention, Intervention},
};

use super::AuthenticatedUser;

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

/// List activities with filters and pagination
#[utoipa::path(
    get,
    path = "/activities",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("client_id" = Option<i32>, Query, description = "Filter by client"),
        ("state" = Option<String>, Query, description = "Filter by state (open, closed, reopened)"),
        ("urgency" = Option<String>, Query, description = "Filter by urgency (low, medium, high)"),
        ("assigned_technician_id" = Option<i32>, Query, description = "Filter by assigned technician"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Items per page (default: 20)")
    ),
    responses(
        (status = 200, description = "List of activities", body = PaginatedResponse<ActivitySummary>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_activities(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<PaginatedResponse<ActivitySummary>>> {
    let (items, total) = state.services.activities.search(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Create a new activity
#[utoipa::path(
    post,
    path = "/activities",
    tag = "activities",
    security(("bearer_auth" = [])),
    request_body = CreateActivity,
    responses(
        (status = 201, description = "Activity created (state always open)", body = Activity),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Insufficient role"),
        (status = 404, description = "Client or equipment not found")
    )
)]
pub async fn create_activity(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(data): Json<CreateActivity>,
) -> AppResult<(StatusCode, Json<Activity>)> {
    identity.require_operational()?;
    data.validate()?;

    let activity = state.services.activities.create(&data).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

/// Get activity details by ID
#[utoipa::path(
    get,
    path = "/activities/{id}",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Activity details", body = Activity),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn get_activity(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Activity>> {
    let activity = state.services.activities.get(id).await?;
    Ok(Json(activity))
}

/// Update activity fields (partial)
///
/// The state is never updated here; use the transition endpoint.
#[utoipa::path(
    put,
    path = "/activities/{id}",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID")
    ),
    request_body = UpdateActivity,
    responses(
        (status = 200, description = "Updated activity", body = Activity),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Insufficient role"),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn update_activity(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateActivity>,
) -> AppResult<Json<Activity>> {
    identity.require_operational()?;
    data.validate()?;

    let activity = state.services.activities.update(id, &data).await?;
    Ok(Json(activity))
}

/// Delete an activity
///
/// Owned links, spare part usage and interventions go with it;
/// attachments remain.
#[utoipa::path(
    delete,
    path = "/activities/{id}",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 204, description = "Activity deleted"),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn delete_activity(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    identity.require_admin()?;

    state.services.activities.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Request a state transition
///
/// Role policy is applied inside the lifecycle engine, after edge and
/// precondition checks, so callers always hear about the most specific
/// failure.
#[utoipa::path(
    post,
    path = "/activities/{id}/transition",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID")
    ),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Transition applied", body = TransitionResponse),
        (status = 403, description = "Role may not perform this transition"),
        (status = 404, description = "Activity not found"),
        (status = 412, description = "Closing date required"),
        (status = 422, description = "Transition not in the legal table")
    )
)]
pub async fn request_transition(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<TransitionRequest>,
) -> AppResult<Json<TransitionResponse>> {
    let response = state
        .services
        .activities
        .transition(id, &request, &identity)
        .await?;
    Ok(Json(response))
}

/// List the transitions the caller may request for an activity
#[utoipa::path(
    get,
    path = "/activities/{id}/transitions",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Current state and allowed targets", body = AllowedTransitions),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn list_allowed_transitions(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AllowedTransitions>> {
    let allowed = state
        .services
        .activities
        .allowed_transitions(id, &identity)
        .await?;
    Ok(Json(allowed))
}

// =============================================================================
// EQUIPMENT LINKS
// =============================================================================

/// Link an equipment unit to an activity
#[utoipa::path(
    post,
    path = "/activities/{id}/equipment",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID")
    ),
    request_body = LinkEquipment,
    responses(
        (status = 201, description = "Equipment linked"),
        (status = 404, description = "Activity or equipment not found"),
        (status = 409, description = "Already linked")
    )
)]
pub async fn link_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<LinkEquipment>,
) -> AppResult<StatusCode> {
    identity.require_operational()?;

    state.services.activities.link_equipment(id, &data).await?;
    Ok(StatusCode::CREATED)
}

/// Unlink an equipment unit from an activity
#[utoipa::path(
    delete,
    path = "/activities/{id}/equipment/{equipment_id}",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID"),
        ("equipment_id" = i32, Path, description = "Equipment ID")
    ),
    responses(
        (status = 204, description = "Equipment unlinked"),
        (status = 403, description = "Insufficient role")
    )
)]
pub async fn unlink_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path((id, equipment_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    identity.require_operational()?;

    state
        .services
        .activities
        .unlink_equipment(id, equipment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List equipment linked to an activity
#[utoipa::path(
    get,
    path = "/activities/{id}/equipment",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Linked equipment", body = Vec<LinkedEquipment>),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn list_linked_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<LinkedEquipment>>> {
    let linked = state.services.activities.list_linked_equipment(id).await?;
    Ok(Json(linked))
}

// =============================================================================
// SPARE PART USAGE
// =============================================================================

/// Record a spare part applied to an activity
#[utoipa::path(
    post,
    path = "/activities/{id}/spare-parts",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID")
    ),
    request_body = AddSparePartUsage,
    responses(
        (status = 201, description = "Usage recorded", body = SparePartUsage),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Activity or spare part not found")
    )
)]
pub async fn add_spare_part_usage(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<AddSparePartUsage>,
) -> AppResult<(StatusCode, Json<SparePartUsage>)> {
    identity.require_operational()?;
    data.validate()?;

    let usage = state
        .services
        .activities
        .add_spare_part_usage(id, &data)
        .await?;
    Ok((StatusCode::CREATED, Json(usage)))
}

/// Remove a spare part usage row
#[utoipa::path(
    delete,
    path = "/activities/{id}/spare-parts/{usage_id}",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID"),
        ("usage_id" = i32, Path, description = "Usage row ID")
    ),
    responses(
        (status = 204, description = "Usage removed"),
        (status = 403, description = "Insufficient role")
    )
)]
pub async fn remove_spare_part_usage(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path((id, usage_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    identity.require_operational()?;

    state
        .services
        .activities
        .remove_spare_part_usage(id, usage_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List spare part usage of an activity
#[utoipa::path(
    get,
    path = "/activities/{id}/spare-parts",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Usage rows", body = Vec<SparePartUsage>),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn list_spare_part_usages(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<SparePartUsage>>> {
    let usages = state.services.activities.list_spare_part_usages(id).await?;
    Ok(Json(usages))
}

// =============================================================================
// INTERVENTIONS
// =============================================================================

/// Append an intervention log entry to an activity
#[utoipa::path(
    post,
    path = "/activities/{id}/interventions",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID")
    ),
    request_body = CreateIntervention,
    responses(
        (status = 201, description = "Intervention recorded", body = Intervention),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn add_intervention(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<CreateIntervention>,
) -> AppResult<(StatusCode, Json<Intervention>)> {
    identity.require_operational()?;
    data.validate()?;

    let intervention = state.services.activities.add_intervention(id, &data).await?;
    Ok((StatusCode::CREATED, Json(intervention)))
}

/// List interventions of an activity
#[utoipa::path(
    get,
    path = "/activities/{id}/interventions",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Interventions", body = Vec<Intervention>),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn list_interventions(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Intervention>>> {
    let interventions = state.services.activities.list_interventions(id).await?;
    Ok(Json(interventions))
}

/// Delete an intervention entry
#[utoipa::path(
    delete,
    path = "/activities/{id}/interventions/{intervention_id}",
    tag = "activities",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID"),
        ("intervention_id" = i32, Path, description = "Intervention ID")
    ),
    responses(
        (status = 204, description = "Intervention deleted"),
        (status = 404, description = "Intervention not found")
    )
)]
pub async fn delete_intervention(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path((id, intervention_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    identity.require_operational()?;

    state
        .services
        .activities
        .delete_intervention(id, intervention_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
