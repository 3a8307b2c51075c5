//! Booking lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::booking::{BookingResponse, CreateBooking},
};

use super::SharerUserId;

#[derive(Deserialize)]
pub struct ApproveParams {
    pub approved: bool,
}

#[derive(Deserialize)]
pub struct BookingListParams {
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// Book an item on behalf of the caller
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created with status WAITING", body = BookingResponse),
        (status = 400, description = "Invalid time range or item not available"),
        (status = 404, description = "User, item or booking not found")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Json(booking): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    // Request-shape boundary checks; the service re-validates ordering
    let now = Utc::now();
    if booking.start < now {
        return Err(AppError::Validation(
            "booking start must not be in the past".to_string(),
        ));
    }
    if booking.end <= now {
        return Err(AppError::Validation(
            "booking end must be in the future".to_string(),
        ));
    }

    let created = state.services.bookings.create_booking(booking, user_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Approve or reject a booking; only the item's owner may do this
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("approved" = bool, Query, description = "true to approve, false to reject")
    ),
    responses(
        (status = 200, description = "Booking status updated", body = BookingResponse),
        (status = 400, description = "Status already APPROVED"),
        (status = 404, description = "Booking or user not found")
    )
)]
pub async fn approve_booking(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Query(params): Query<ApproveParams>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state
        .services
        .bookings
        .approve_booking(id, user_id, params.approved)
        .await?;
    Ok(Json(booking))
}

/// Get a booking; visible only to the booker and the item's owner
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingResponse),
        (status = 404, description = "Booking or user not found")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state.services.bookings.get_booking(id, user_id).await?;
    Ok(Json(booking))
}

/// List the caller's bookings, filtered by state
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(
        ("state" = Option<String>, Query, description = "ALL, PAST, FUTURE, CURRENT, WAITING or REJECTED"),
        ("from" = Option<i64>, Query, description = "Offset into the list"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Caller's bookings", body = Vec<BookingResponse>),
        (status = 400, description = "Unknown state value"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(params): Query<BookingListParams>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let bookings = state
        .services
        .bookings
        .get_by_booker(
            user_id,
            params.state.as_deref().unwrap_or("ALL"),
            params.from.unwrap_or(0),
            params.size.unwrap_or(10),
        )
        .await?;
    Ok(Json(bookings))
}

/// List the bookings on the caller's items, filtered by state
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(
        ("state" = Option<String>, Query, description = "ALL, PAST, FUTURE, CURRENT, WAITING or REJECTED"),
        ("from" = Option<i64>, Query, description = "Offset into the list"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Bookings on the caller's items", body = Vec<BookingResponse>),
        (status = 400, description = "Unknown state value"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_owner_bookings(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(params): Query<BookingListParams>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let bookings = state
        .services
        .bookings
        .get_by_owner(
            user_id,
            params.state.as_deref().unwrap_or("ALL"),
            params.from.unwrap_or(0),
            params.size.unwrap_or(10),
        )
        .await?;
    Ok(Json(bookings))
}
