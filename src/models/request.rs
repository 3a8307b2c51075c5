//! Item request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::item::ItemResponse;

/// Item request model from database: a want-ad for an item that does not
/// yet exist in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ItemRequest {
    pub id: i64,
    pub description: String,
    pub created: DateTime<Utc>,
    pub user_id: i64,
}

/// Create item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
}

/// Item request view with the items answering it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestResponse {
    pub id: i64,
    pub description: String,
    pub created: DateTime<Utc>,
    pub items: Option<Vec<ItemResponse>>,
}

impl RequestResponse {
    pub fn from_request(request: ItemRequest, items: Option<Vec<ItemResponse>>) -> Self {
        Self {
            id: request.id,
            description: request.description,
            created: request.created,
            items,
        }
    }
}
