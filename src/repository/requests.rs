//! Item requests repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::request::{CreateRequest, ItemRequest},
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<ItemRequest> {
        sqlx::query_as::<_, ItemRequest>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("request with id {} not found", id)))
    }

    /// Create a new request
    pub async fn create(&self, user_id: i64, request: &CreateRequest) -> AppResult<ItemRequest> {
        let request = sqlx::query_as::<_, ItemRequest>(
            "INSERT INTO requests (description, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(&request.description)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// Get all of a user's own requests, newest first
    pub async fn find_all_by_user(&self, user_id: i64) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            "SELECT * FROM requests WHERE user_id = $1 ORDER BY created DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Get a page of other users' requests, newest first
    pub async fn find_all_by_other_users(
        &self,
        user_id: i64,
        page: i64,
        size: i64,
    ) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            r#"
            SELECT * FROM requests
            WHERE user_id != $1
            ORDER BY created DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(size)
        .bind(page * size)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}
