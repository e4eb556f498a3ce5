//! Client model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Client record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    /// Contact person or phone/email free text
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create client request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    pub address: Option<String>,
    pub contact: Option<String>,
}

/// Update client request (partial)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClient {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
}

/// Client query parameters (API)
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ClientQuery {
    /// Substring match on name
    pub name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
