//! Comments repository for database operations

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::comment::CommentRow};

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a comment and return it with the author's name
    pub async fn create(&self, item_id: i64, author_id: i64, text: &str) -> AppResult<CommentRow> {
        let comment = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (text, item_id, author_id)
                VALUES ($1, $2, $3)
                RETURNING id, text, created, item_id, author_id
            )
            SELECT c.id, c.text, c.created, c.item_id, u.name AS author_name
            FROM inserted c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(text)
        .bind(item_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Get all comments on one item
    pub async fn find_all_by_item_id(&self, item_id: i64) -> AppResult<Vec<CommentRow>> {
        let comments = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.text, c.created, c.item_id, u.name AS author_name
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.item_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Get all comments on the given items in one query
    pub async fn find_all_by_item_ids(&self, item_ids: &[i64]) -> AppResult<Vec<CommentRow>> {
        let comments = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.text, c.created, c.item_id, u.name AS author_name
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.item_id = ANY($1)
            ORDER BY c.id
            "#,
        )
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
