//! API handlers for the ShareIt REST endpoints

pub mod bookings;
pub mod health;
pub mod items;
pub mod openapi;
pub mod requests;
pub mod users;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::Deserialize;

use crate::error::AppError;

/// Name of the caller-identity header
pub const SHARER_USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// Extractor for the caller identity carried in the `X-Sharer-User-Id` header
pub struct SharerUserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for SharerUserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SHARER_USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Validation(format!("{} header is missing", SHARER_USER_ID_HEADER))
            })?;

        let user_id = value.trim().parse::<i64>().map_err(|_| {
            AppError::Validation(format!("{} header is not a valid id", SHARER_USER_ID_HEADER))
        })?;

        Ok(SharerUserId(user_id))
    }
}

/// Common pagination query parameters
#[derive(Deserialize)]
pub struct PageParams {
    pub from: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    pub fn from(&self) -> i64 {
        self.from.unwrap_or(0)
    }

    pub fn size(&self) -> i64 {
        self.size.unwrap_or(10)
    }
}
