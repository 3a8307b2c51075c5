//! Booking lifecycle service
//!
//! Owns the rules around booking creation and approval, and the temporal
//! classification of bookings into listing states. Ownership and visibility
//! violations are reported as not-found, with the same message as a missing
//! booking, so callers cannot probe who owns or booked what.

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::booking::{
        BookingDetailsRow, BookingResponse, BookingState, BookingStatus, CreateBooking,
    },
    repository::Repository,
};

use super::page_index;

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a WAITING booking on an available item owned by someone else
    pub async fn create_booking(
        &self,
        booking: CreateBooking,
        booker_id: i64,
    ) -> AppResult<BookingResponse> {
        validate_time_range(booking.start, booking.end)?;

        self.repository.users.get_by_id(booker_id).await?;
        let item = self.repository.items.get_by_id(booking.item_id).await?;

        if !item.available {
            return Err(AppError::InvalidState(
                "item is not available for booking".to_string(),
            ));
        }

        if item.owner_id == booker_id {
            // Owners do not get told they own the item
            return Err(AppError::NotFound("booking not found".to_string()));
        }

        let row = self.repository.bookings.create(booker_id, &booking).await?;

        tracing::info!(booking_id = row.id, item_id = row.item_id, "booking created");

        Ok(row.into())
    }

    /// Approve or reject a booking; only the item's owner may do this, and
    /// an APPROVED booking can never change status again
    pub async fn approve_booking(
        &self,
        booking_id: i64,
        user_id: i64,
        approved: bool,
    ) -> AppResult<BookingResponse> {
        // Existence checks in contract order; ownership and status are
        // re-checked under the row lock inside the repository transaction
        self.repository.bookings.get_by_id(booking_id).await?;
        self.repository.users.get_by_id(user_id).await?;

        let row = self
            .repository
            .bookings
            .approve(booking_id, user_id, approved)
            .await?;

        tracing::info!(booking_id, approved, "booking status updated");

        Ok(row.into())
    }

    /// Get a booking; visible only to its booker and the item's owner
    pub async fn get_booking(&self, booking_id: i64, user_id: i64) -> AppResult<BookingResponse> {
        let row = self.repository.bookings.get_details(booking_id).await?;
        self.repository.users.get_by_id(user_id).await?;

        if row.booker_id != user_id && row.owner_id != user_id {
            return Err(AppError::NotFound(format!(
                "booking with id {} not found",
                booking_id
            )));
        }

        Ok(row.into())
    }

    /// List a page of the user's own bookings, filtered by state
    pub async fn get_by_booker(
        &self,
        user_id: i64,
        state: &str,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<BookingResponse>> {
        let state = BookingState::parse(state)?;
        self.repository.users.get_by_id(user_id).await?;

        let page = page_index(from, size)?;
        let bookings = self
            .repository
            .bookings
            .find_all_by_booker(user_id, page, size)
            .await?;

        Ok(filter_by_state(bookings, state, Utc::now())
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// List a page of the bookings on the user's items, filtered by state
    pub async fn get_by_owner(
        &self,
        user_id: i64,
        state: &str,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<BookingResponse>> {
        let state = BookingState::parse(state)?;
        self.repository.users.get_by_id(user_id).await?;

        let page = page_index(from, size)?;
        let bookings = self
            .repository
            .bookings
            .find_all_by_item_owner(user_id, page, size)
            .await?;

        Ok(filter_by_state(bookings, state, Utc::now())
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

/// Strict `start < end`; an equal and an inverted range are distinct errors
fn validate_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if start == end {
        return Err(AppError::InvalidTimeRange(
            "booking start equals booking end".to_string(),
        ));
    }

    if start > end {
        return Err(AppError::InvalidTimeRange(
            "booking end is before booking start".to_string(),
        ));
    }

    Ok(())
}

/// Classify an already-fetched page of bookings.
///
/// The filter runs after pagination, so a page can yield fewer than `size`
/// matches even when more matching bookings exist on other pages. `now` is
/// sampled once by the caller and used for every comparison in the pass.
fn filter_by_state(
    bookings: Vec<BookingDetailsRow>,
    state: BookingState,
    now: DateTime<Utc>,
) -> Vec<BookingDetailsRow> {
    match state {
        BookingState::All => bookings,
        BookingState::Past => bookings.into_iter().filter(|b| b.end_date < now).collect(),
        BookingState::Future => bookings.into_iter().filter(|b| b.start_date > now).collect(),
        BookingState::Current => bookings
            .into_iter()
            .filter(|b| b.start_date < now && b.end_date > now)
            .collect(),
        BookingState::Waiting => bookings
            .into_iter()
            .filter(|b| b.status == BookingStatus::Waiting)
            .collect(),
        BookingState::Rejected => bookings
            .into_iter()
            .filter(|b| b.status == BookingStatus::Rejected)
            .collect(),
    }
}
