//! Client / activity / equipment hierarchy endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, models::hierarchy::HierarchyReport};

use super::AuthenticatedUser;

/// Nested view of every client, the activity groups beneath it and the
/// equipment inside each group
#[utoipa::path(
    get,
    path = "/hierarchy",
    tag = "hierarchy",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Full hierarchy with counts", body = HierarchyReport),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_hierarchy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
) -> AppResult<Json<HierarchyReport>> {
    let report = state.services.hierarchy.report().await?;
    Ok(Json(report))
}
