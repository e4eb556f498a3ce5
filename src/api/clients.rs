//! Client endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::client::{Client, ClientQuery, CreateClient, UpdateClient},
};

use super::{activities::PaginatedResponse, AuthenticatedUser};

/// List clients with pagination
#[utoipa::path(
    get,
    path = "/clients",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(
        ("name" = Option<String>, Query, description = "Search by name"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Items per page (default: 20)")
    ),
    responses(
        (status = 200, description = "List of clients", body = PaginatedResponse<Client>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_clients(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Query(query): Query<ClientQuery>,
) -> AppResult<Json<PaginatedResponse<Client>>> {
    let (items, total) = state.services.clients.search(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get client by ID
#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client details", body = Client),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_client(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Client>> {
    let client = state.services.clients.get(id).await?;
    Ok(Json(client))
}

/// Create a new client
#[utoipa::path(
    post,
    path = "/clients",
    tag = "clients",
    security(("bearer_auth" = [])),
    request_body = CreateClient,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn create_client(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(data): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    identity.require_admin()?;
    data.validate()?;

    let client = state.services.clients.create(&data).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// Update a client (partial)
#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Client ID")
    ),
    request_body = UpdateClient,
    responses(
        (status = 200, description = "Updated client", body = Client),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn update_client(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateClient>,
) -> AppResult<Json<Client>> {
    identity.require_admin()?;
    data.validate()?;

    let client = state.services.clients.update(id, &data).await?;
    Ok(Json(client))
}

/// Delete a client
///
/// Refused while any equipment or activity still references it.
#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Client ID")
    ),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "Client not found"),
        (status = 409, description = "Client still referenced")
    )
)]
pub async fn delete_client(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    identity.require_admin()?;

    state.services.clients.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
