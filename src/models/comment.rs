//! Comment model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Comment row joined with the author's name
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
    pub item_id: i64,
    pub author_name: String,
}

/// Create comment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
}

/// Comment response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

impl From<CommentRow> for CommentResponse {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            author_name: row.author_name,
            created: row.created,
        }
    }
}
