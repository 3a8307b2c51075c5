//! Item request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::request::{CreateRequest, RequestResponse},
};

use super::{PageParams, SharerUserId};

/// Post a request for an item missing from the catalog
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = RequestResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Json(request): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<RequestResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.requests.create(request, user_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the caller's own requests with matching items, newest first
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    responses(
        (status = 200, description = "Caller's requests", body = Vec<RequestResponse>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_own_requests(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Json<Vec<RequestResponse>>> {
    let requests = state.services.requests.get_all_by_user(user_id).await?;
    Ok(Json(requests))
}

/// List other users' requests, newest first
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    params(
        ("from" = Option<i64>, Query, description = "Offset into the list"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Other users' requests", body = Vec<RequestResponse>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_all_requests(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Vec<RequestResponse>>> {
    let requests = state
        .services
        .requests
        .get_all(user_id, page.from(), page.size())
        .await?;
    Ok(Json(requests))
}

/// Get one request with the items answering it
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i64, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request details", body = RequestResponse),
        (status = 404, description = "Request or user not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<RequestResponse>> {
    let request = state.services.requests.get_request(id, user_id).await?;
    Ok(Json(request))
}
