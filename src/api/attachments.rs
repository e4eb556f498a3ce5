//! Attachment endpoints
//!
//! Uploads arrive as multipart/form-data with a `file` part and an
//! optional `category` text part. Files are listed and uploaded under
//! their owner resource; download and delete address the attachment
//! directly.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::attachment::{Attachment, AttachmentQuery},
    models::enums::AttachmentOwner,
    AppState,
};

use super::AuthenticatedUser;

/// Multipart upload form
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// File content
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Optional category label (e.g. "photo", "report")
    pub category: Option<String>,
}

/// Upload a file for an activity
#[utoipa::path(
    post,
    path = "/activities/{id}/attachments",
    tag = "attachments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID")
    ),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Attachment stored", body = Attachment),
        (status = 400, description = "Missing or malformed file part"),
        (status = 403, description = "Insufficient role"),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn upload_activity_attachment(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Attachment>)> {
    identity.require_operational()?;
    upload(&state, AttachmentOwner::Activity, id, multipart).await
}

/// Upload a file for an equipment unit
#[utoipa::path(
    post,
    path = "/equipment/{id}/attachments",
    tag = "attachments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Equipment ID")
    ),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Attachment stored", body = Attachment),
        (status = 400, description = "Missing or malformed file part"),
        (status = 403, description = "Insufficient role"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn upload_equipment_attachment(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Attachment>)> {
    identity.require_operational()?;
    upload(&state, AttachmentOwner::Equipment, id, multipart).await
}

/// List attachments of an activity
#[utoipa::path(
    get,
    path = "/activities/{id}/attachments",
    tag = "attachments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Activity ID"),
        ("category" = Option<String>, Query, description = "Filter by category")
    ),
    responses(
        (status = 200, description = "Attachments of the activity", body = Vec<Attachment>),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn list_activity_attachments(
    State(state): State<AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(query): Query<AttachmentQuery>,
) -> AppResult<Json<Vec<Attachment>>> {
    let attachments = state
        .services
        .attachments
        .list(AttachmentOwner::Activity, id, query.category.as_deref())
        .await?;
    Ok(Json(attachments))
}

/// List attachments of an equipment unit
#[utoipa::path(
    get,
    path = "/equipment/{id}/attachments",
    tag = "attachments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Equipment ID"),
        ("category" = Option<String>, Query, description = "Filter by category")
    ),
    responses(
        (status = 200, description = "Attachments of the equipment", body = Vec<Attachment>),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn list_equipment_attachments(
    State(state): State<AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(query): Query<AttachmentQuery>,
) -> AppResult<Json<Vec<Attachment>>> {
    let attachments = state
        .services
        .attachments
        .list(AttachmentOwner::Equipment, id, query.category.as_deref())
        .await?;
    Ok(Json(attachments))
}

/// Download attachment content
#[utoipa::path(
    get,
    path = "/attachments/{id}/download",
    tag = "attachments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Attachment ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "Attachment not found")
    )
)]
pub async fn download_attachment(
    State(state): State<AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let (attachment, bytes) = state.services.attachments.download(id).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        attachment.original_name.replace('"', "")
    );

    Ok((
        [
            (header::CONTENT_TYPE, attachment.mime_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// Delete an attachment
#[utoipa::path(
    delete,
    path = "/attachments/{id}",
    tag = "attachments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Attachment ID")
    ),
    responses(
        (status = 204, description = "Attachment deleted"),
        (status = 403, description = "Insufficient role"),
        (status = 404, description = "Attachment not found")
    )
)]
pub async fn delete_attachment(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    identity.require_operational()?;

    state.services.attachments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Read the multipart body and hand the file to the attachment service.
async fn upload(
    state: &AppState,
    owner_type: AttachmentOwner,
    owner_id: i32,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Attachment>)> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut category: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::invalid_field("file", "Malformed multipart request"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::invalid_field("file", "Malformed multipart request"))?;
                file = Some((original_name, mime_type, bytes.to_vec()));
            }
            "category" => {
                let value = field.text().await.map_err(|_| {
                    AppError::invalid_field("category", "Malformed multipart request")
                })?;
                if !value.is_empty() {
                    category = Some(value);
                }
            }
            _ => {}
        }
    }

    let (original_name, mime_type, bytes) =
        file.ok_or_else(|| AppError::invalid_field("file", "A file part is required"))?;

    let attachment = state
        .services
        .attachments
        .upload(
            owner_type,
            owner_id,
            &original_name,
            &mime_type,
            &bytes,
            category.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(attachment)))
}
