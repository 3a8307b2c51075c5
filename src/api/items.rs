//! Item catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        comment::{CommentResponse, CreateComment},
        item::{CreateItem, ItemResponse, UpdateItem},
    },
};

use super::{PageParams, SharerUserId};

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub text: String,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// List the caller's items with closest bookings and comments
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        ("from" = Option<i64>, Query, description = "Offset into the list"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Caller's items", body = Vec<ItemResponse>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Vec<ItemResponse>>> {
    let items = state
        .services
        .items
        .get_items(user_id, page.from(), page.size())
        .await?;
    Ok(Json(items))
}

/// Get item by ID; booking summaries are included only for the owner
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemResponse),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemResponse>> {
    let item = state.services.items.get_item(id, user_id).await?;
    Ok(Json(item))
}

/// Create a new item owned by the caller
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User or request not found")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Json(item): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<ItemResponse>)> {
    item.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.items.add_item(item, user_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an item; only the owner may edit, absent fields are preserved
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Json(item): Json<UpdateItem>,
) -> AppResult<Json<ItemResponse>> {
    let updated = state.services.items.update_item(item, user_id, id).await?;
    Ok(Json(updated))
}

/// Search available items by name or description
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(
        ("text" = Option<String>, Query, description = "Search text; empty yields nothing"),
        ("from" = Option<i64>, Query, description = "Offset into the list"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Matching available items", body = Vec<ItemResponse>)
    )
)]
pub async fn search_items(
    State(state): State<crate::AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<ItemResponse>>> {
    let items = state
        .services
        .items
        .search(
            &params.text,
            params.from.unwrap_or(0),
            params.size.unwrap_or(10),
        )
        .await?;
    Ok(Json(items))
}

/// Comment on an item the caller has previously used
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    request_body = CreateComment,
    responses(
        (status = 200, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Caller never used the item"),
        (status = 404, description = "Item or user not found")
    )
)]
pub async fn create_comment(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Json(comment): Json<CreateComment>,
) -> AppResult<Json<CommentResponse>> {
    comment
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state
        .services
        .items
        .create_comment(comment, user_id, id)
        .await?;
    Ok(Json(created))
}
