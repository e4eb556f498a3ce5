//! Equipment model and spare part catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::equipment_model::{
        CreateEquipmentModel, EquipmentModel, EquipmentModelQuery, UpdateEquipmentModel,
    },
    models::spare_part::{CreateSparePart, SparePart, SparePartQuery},
};

use super::{activities::PaginatedResponse, AuthenticatedUser};

// =============================================================================
// EQUIPMENT MODELS
// =============================================================================

/// List equipment models with pagination
#[utoipa::path(
    get,
    path = "/models",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("name" = Option<String>, Query, description = "Search by name"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Items per page (default: 20)")
    ),
    responses(
        (status = 200, description = "List of models", body = PaginatedResponse<EquipmentModel>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_models(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Query(query): Query<EquipmentModelQuery>,
) -> AppResult<Json<PaginatedResponse<EquipmentModel>>> {
    let (items, total) = state.services.catalog.search_models(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get an equipment model by ID
#[utoipa::path(
    get,
    path = "/models/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Model ID")
    ),
    responses(
        (status = 200, description = "Model details", body = EquipmentModel),
        (status = 404, description = "Model not found")
    )
)]
pub async fn get_model(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EquipmentModel>> {
    let model = state.services.catalog.get_model(id).await?;
    Ok(Json(model))
}

/// Create an equipment model
#[utoipa::path(
    post,
    path = "/models",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = CreateEquipmentModel,
    responses(
        (status = 201, description = "Model created", body = EquipmentModel),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn create_model(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(data): Json<CreateEquipmentModel>,
) -> AppResult<(StatusCode, Json<EquipmentModel>)> {
    identity.require_admin()?;
    data.validate()?;

    let model = state.services.catalog.create_model(&data).await?;
    Ok((StatusCode::CREATED, Json(model)))
}

/// Update an equipment model (partial)
#[utoipa::path(
    put,
    path = "/models/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Model ID")
    ),
    request_body = UpdateEquipmentModel,
    responses(
        (status = 200, description = "Updated model", body = EquipmentModel),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "Model not found")
    )
)]
pub async fn update_model(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateEquipmentModel>,
) -> AppResult<Json<EquipmentModel>> {
    identity.require_admin()?;
    data.validate()?;

    let model = state.services.catalog.update_model(id, &data).await?;
    Ok(Json(model))
}

/// Delete an equipment model
///
/// Refused while any equipment unit still uses it.
#[utoipa::path(
    delete,
    path = "/models/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Model ID")
    ),
    responses(
        (status = 204, description = "Model deleted"),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "Model not found"),
        (status = 409, description = "Model still referenced")
    )
)]
pub async fn delete_model(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    identity.require_admin()?;

    state.services.catalog.delete_model(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// SPARE PARTS
// =============================================================================

/// List spare parts with pagination
#[utoipa::path(
    get,
    path = "/spare-parts",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("name" = Option<String>, Query, description = "Search by name or code"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Items per page (default: 20)")
    ),
    responses(
        (status = 200, description = "List of spare parts", body = PaginatedResponse<SparePart>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_spare_parts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Query(query): Query<SparePartQuery>,
) -> AppResult<Json<PaginatedResponse<SparePart>>> {
    let (items, total) = state.services.catalog.search_spare_parts(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get a spare part by ID
#[utoipa::path(
    get,
    path = "/spare-parts/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Spare part ID")
    ),
    responses(
        (status = 200, description = "Spare part details", body = SparePart),
        (status = 404, description = "Spare part not found")
    )
)]
pub async fn get_spare_part(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<SparePart>> {
    let part = state.services.catalog.get_spare_part(id).await?;
    Ok(Json(part))
}

/// Create a spare part
#[utoipa::path(
    post,
    path = "/spare-parts",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = CreateSparePart,
    responses(
        (status = 201, description = "Spare part created", body = SparePart),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn create_spare_part(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(data): Json<CreateSparePart>,
) -> AppResult<(StatusCode, Json<SparePart>)> {
    identity.require_admin()?;
    data.validate()?;

    let part = state.services.catalog.create_spare_part(&data).await?;
    Ok((StatusCode::CREATED, Json(part)))
}

/// Delete a spare part
///
/// Refused while any activity records usage of it.
#[utoipa::path(
    delete,
    path = "/spare-parts/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Spare part ID")
    ),
    responses(
        (status = 204, description = "Spare part deleted"),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "Spare part not found"),
        (status = 409, description = "Spare part still referenced")
    )
)]
pub async fn delete_spare_part(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    identity.require_admin()?;

    state.services.catalog.delete_spare_part(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
