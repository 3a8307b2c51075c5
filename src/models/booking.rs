//! Booking model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

use super::item::ItemShort;
use super::user::UserShort;

/// Owner-controlled approval status of a booking record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

/// Listing filter applied to a fetched page of bookings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    All,
    Past,
    Future,
    Current,
    Waiting,
    Rejected,
}

impl BookingState {
    /// Parse the `state` query parameter; any unrecognized value is an error
    /// rather than a silently empty result.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "ALL" => Ok(BookingState::All),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "CURRENT" => Ok(BookingState::Current),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            other => Err(AppError::UnsupportedState(other.to_string())),
        }
    }
}

/// Booking model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub item_id: i64,
    pub booker_id: i64,
}

/// Booking row joined with item name, item owner and booker name
#[derive(Debug, Clone, FromRow)]
pub struct BookingDetailsRow {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub item_id: i64,
    pub item_name: String,
    pub owner_id: i64,
    pub booker_id: i64,
    pub booker_name: String,
}

/// Create booking request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBooking {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item_id: i64,
}

/// Booking response with denormalized item and booker
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingResponse {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub booker: UserShort,
    pub item: ItemShort,
}

impl From<BookingDetailsRow> for BookingResponse {
    fn from(row: BookingDetailsRow) -> Self {
        Self {
            id: row.id,
            start: row.start_date,
            end: row.end_date,
            status: row.status,
            booker: UserShort {
                id: row.booker_id,
                name: row.booker_name,
            },
            item: ItemShort {
                id: row.item_id,
                name: row.item_name,
            },
        }
    }
}

/// Short booking summary used to decorate item views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingShort {
    pub id: i64,
    pub booker_id: i64,
}

impl From<&Booking> for BookingShort {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            booker_id: booking.booker_id,
        }
    }
}

/// Pair of closest-past and closest-future booking summaries for one item
#[derive(Debug, Clone, Default)]
pub struct ClosestBookings {
    pub last: Option<BookingShort>,
    pub next: Option<BookingShort>,
}
