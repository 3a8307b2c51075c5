//! Bookings repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, BookingDetailsRow, BookingStatus, CreateBooking},
};

const DETAILS_SELECT: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.status, b.item_id, b.booker_id,
           i.name AS item_name, i.owner_id,
           u.name AS booker_name
    FROM bookings b
    JOIN items i ON i.id = b.item_id
    JOIN users u ON u.id = b.booker_id
"#;

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("booking with id {} not found", id)))
    }

    /// Get booking by ID with item name, item owner and booker name
    pub async fn get_details(&self, id: i64) -> AppResult<BookingDetailsRow> {
        sqlx::query_as::<_, BookingDetailsRow>(&format!("{} WHERE b.id = $1", DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("booking with id {} not found", id)))
    }

    /// Insert a new WAITING booking and return it with details
    pub async fn create(&self, booker_id: i64, booking: &CreateBooking) -> AppResult<BookingDetailsRow> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO bookings (start_date, end_date, status, item_id, booker_id)
            VALUES ($1, $2, 'WAITING', $3, $4)
            RETURNING id
            "#,
        )
        .bind(booking.start)
        .bind(booking.end)
        .bind(booking.item_id)
        .bind(booker_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_details(id).await
    }

    /// Approve or reject a booking on behalf of the item's owner.
    ///
    /// The read-then-write runs in one transaction with a row lock so that
    /// concurrent approval attempts on the same booking serialize. Ownership
    /// failures surface as the same not-found the caller would get for a
    /// missing booking.
    pub async fn approve(
        &self,
        booking_id: i64,
        owner_id: i64,
        approved: bool,
    ) -> AppResult<BookingDetailsRow> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT b.status, i.owner_id
            FROM bookings b
            JOIN items i ON i.id = b.item_id
            WHERE b.id = $1
            FOR UPDATE OF b
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("booking with id {} not found", booking_id)))?;

        if row.get::<i64, _>("owner_id") != owner_id {
            return Err(AppError::NotFound(format!(
                "booking with id {} not found",
                booking_id
            )));
        }

        if row.get::<BookingStatus, _>("status") == BookingStatus::Approved {
            return Err(AppError::InvalidState(
                "cannot change status after approval".to_string(),
            ));
        }

        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };

        sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_details(booking_id).await
    }

    /// Get a page of a user's bookings, newest start first
    pub async fn find_all_by_booker(
        &self,
        booker_id: i64,
        page: i64,
        size: i64,
    ) -> AppResult<Vec<BookingDetailsRow>> {
        let bookings = sqlx::query_as::<_, BookingDetailsRow>(&format!(
            "{} WHERE b.booker_id = $1 ORDER BY b.start_date DESC LIMIT $2 OFFSET $3",
            DETAILS_SELECT
        ))
        .bind(booker_id)
        .bind(size)
        .bind(page * size)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Get a page of the bookings on a user's items, newest start first
    pub async fn find_all_by_item_owner(
        &self,
        owner_id: i64,
        page: i64,
        size: i64,
    ) -> AppResult<Vec<BookingDetailsRow>> {
        let bookings = sqlx::query_as::<_, BookingDetailsRow>(&format!(
            "{} WHERE i.owner_id = $1 ORDER BY b.start_date DESC LIMIT $2 OFFSET $3",
            DETAILS_SELECT
        ))
        .bind(owner_id)
        .bind(size)
        .bind(page * size)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Get every booking on the given items in one query.
    ///
    /// Rows come back in primary-key order; the closest-booking scan
    /// depends on this order, so it is fixed here rather than left to the
    /// planner.
    pub async fn find_all_by_item_ids(&self, item_ids: &[i64]) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE item_id = ANY($1) ORDER BY id",
        )
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Whether the user has an approved booking of the item that already ended
    pub async fn has_finished_booking(
        &self,
        booker_id: i64,
        item_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE booker_id = $1 AND item_id = $2
                  AND status = 'APPROVED' AND end_date < $3
            )
            "#,
        )
        .bind(booker_id)
        .bind(item_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
