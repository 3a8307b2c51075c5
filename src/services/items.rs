//! Item service and the closest-booking aggregation
//!
//! Item views for an owner are decorated with the item's closest past and
//! closest future booking. The summaries for a whole page of items are
//! computed from one batched booking fetch instead of a query per item.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingStatus, ClosestBookings},
        comment::{CommentResponse, CreateComment},
        item::{CreateItem, ItemResponse, UpdateItem},
    },
    repository::Repository,
};

use super::page_index;

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create an item, optionally tied to the request it answers
    pub async fn add_item(&self, item: CreateItem, user_id: i64) -> AppResult<ItemResponse> {
        self.repository.users.get_by_id(user_id).await?;

        if let Some(request_id) = item.request_id {
            self.repository.requests.get_by_id(request_id).await?;
        }

        let created = self.repository.items.create(user_id, &item).await?;

        tracing::info!(item_id = created.id, owner_id = user_id, "item created");

        Ok(ItemResponse::from_item(created))
    }

    /// Update an item; only the owner may edit, absent fields are preserved
    pub async fn update_item(
        &self,
        item: UpdateItem,
        user_id: i64,
        item_id: i64,
    ) -> AppResult<ItemResponse> {
        self.repository.users.get_by_id(user_id).await?;
        let existing = self.repository.items.get_by_id(item_id).await?;

        if existing.owner_id != user_id {
            return Err(AppError::Forbidden(format!(
                "user {} is not the owner of item {}",
                user_id, item_id
            )));
        }

        let updated = self.repository.items.update(item_id, &item).await?;
        Ok(ItemResponse::from_item(updated))
    }

    /// Get an item with its comments; booking summaries are attached only
    /// when the requester is the owner
    pub async fn get_item(&self, item_id: i64, user_id: i64) -> AppResult<ItemResponse> {
        let item = self.repository.items.get_by_id(item_id).await?;
        self.repository.users.get_by_id(user_id).await?;

        let is_owner = item.owner_id == user_id;

        let comments: Vec<CommentResponse> = self
            .repository
            .comments
            .find_all_by_item_id(item_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let mut response = ItemResponse::from_item(item);
        response.comments = Some(comments);

        if is_owner {
            let bookings = self
                .repository
                .bookings
                .find_all_by_item_ids(&[item_id])
                .await?;

            let closest = find_closest_bookings(&bookings, Utc::now())
                .remove(&item_id)
                .unwrap_or_default();

            response.last_booking = closest.last;
            response.next_booking = closest.next;
        }

        Ok(response)
    }

    /// List a page of the user's own items, each decorated with closest
    /// bookings and comments from two batched queries
    pub async fn get_items(&self, user_id: i64, from: i64, size: i64) -> AppResult<Vec<ItemResponse>> {
        self.repository.users.get_by_id(user_id).await?;

        let page = page_index(from, size)?;
        let items = self
            .repository
            .items
            .find_all_by_owner(user_id, page, size)
            .await?;

        let item_ids: Vec<i64> = items.iter().map(|item| item.id).collect();

        let bookings = self.repository.bookings.find_all_by_item_ids(&item_ids).await?;
        let mut closest = find_closest_bookings(&bookings, Utc::now());

        let mut comments = group_comments_by_item(
            self.repository.comments.find_all_by_item_ids(&item_ids).await?,
        );

        Ok(items
            .into_iter()
            .map(|item| {
                let item_id = item.id;
                let mut response = ItemResponse::from_item(item);

                if let Some(pair) = closest.remove(&item_id) {
                    response.last_booking = pair.last;
                    response.next_booking = pair.next;
                }
                response.comments = comments.remove(&item_id);

                response
            })
            .collect())
    }

    /// Free-text search over available items; empty text yields nothing
    pub async fn search(&self, text: &str, from: i64, size: i64) -> AppResult<Vec<ItemResponse>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let page = page_index(from, size)?;
        let items = self.repository.items.search(text, page, size).await?;

        Ok(items.into_iter().map(ItemResponse::from_item).collect())
    }

    /// Comment on an item; only a user whose approved booking of it has
    /// already ended may comment
    pub async fn create_comment(
        &self,
        comment: CreateComment,
        user_id: i64,
        item_id: i64,
    ) -> AppResult<CommentResponse> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.items.get_by_id(item_id).await?;

        let used = self
            .repository
            .bookings
            .has_finished_booking(user_id, item_id, Utc::now())
            .await?;

        if !used {
            return Err(AppError::InvalidState(
                "cannot comment on an item you have not used".to_string(),
            ));
        }

        let created = self
            .repository
            .comments
            .create(item_id, user_id, &comment.text)
            .await?;

        Ok(created.into())
    }
}

/// Group comment rows per item, preserving row order
fn group_comments_by_item(rows: Vec<crate::models::comment::CommentRow>) -> HashMap<i64, Vec<CommentResponse>> {
    let mut map: HashMap<i64, Vec<CommentResponse>> = HashMap::new();
    for row in rows {
        map.entry(row.item_id).or_default().push(row.into());
    }
    map
}

/// For each item in the batch, find the booking closest in the past and the
/// booking closest in the future, skipping REJECTED bookings.
///
/// Each item's group is scanned once in the order the store returned the
/// batch (primary-key order, fixed by the repository query): a first future
/// candidate or first past candidate is adopted as seen, then a later
/// booking replaces the future candidate when it starts earlier and still
/// ends after `now`, or the past candidate when it ends later and starts
/// before `now`. Items whose scan produces no candidate are absent from the
/// result.
pub(crate) fn find_closest_bookings(
    bookings: &[Booking],
    now: DateTime<Utc>,
) -> HashMap<i64, ClosestBookings> {
    let mut groups: HashMap<i64, Vec<&Booking>> = HashMap::new();
    for booking in bookings {
        groups.entry(booking.item_id).or_default().push(booking);
    }

    let mut closest_by_item = HashMap::new();

    for (item_id, group) in groups {
        let mut closest_past: Option<&Booking> = None;
        let mut closest_future: Option<&Booking> = None;

        for booking in group {
            if booking.status == BookingStatus::Rejected {
                continue;
            }

            let start = booking.start_date;
            let end = booking.end_date;

            if closest_future.is_none() && start > now {
                closest_future = Some(booking);
                continue;
            }

            if closest_past.is_none() && start < now {
                closest_past = Some(booking);
                continue;
            }

            if let Some(future) = closest_future {
                if start < future.start_date && end > now {
                    closest_future = Some(booking);
                    continue;
                }
            }

            if let Some(past) = closest_past {
                if end > past.end_date && start < now {
                    closest_past = Some(booking);
                }
            }
        }

        if closest_past.is_none() && closest_future.is_none() {
            continue;
        }

        closest_by_item.insert(
            item_id,
            ClosestBookings {
                last: closest_past.map(Into::into),
                next: closest_future.map(Into::into),
            },
        );
    }

    closest_by_item
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn booking(
        id: i64,
        item_id: i64,
        booker_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: BookingStatus,
    ) -> Booking {
        Booking {
            id,
            start_date: start,
            end_date: end,
            status,
            item_id,
            booker_id,
        }
    }

    #[test]
    fn test_closest_past_and_future() {
        let now = Utc::now();
        let past = booking(
            1,
            10,
            2,
            now - Duration::hours(2),
            now - Duration::hours(1),
            BookingStatus::Approved,
        );
        let future = booking(
            2,
            10,
            3,
            now + Duration::hours(1),
            now + Duration::hours(2),
            BookingStatus::Approved,
        );
        let rejected = booking(
            3,
            10,
            4,
            now + Duration::hours(3),
            now + Duration::hours(4),
            BookingStatus::Rejected,
        );

        let result = find_closest_bookings(&[past, future, rejected], now);
        let pair = result.get(&10).expect("item should be present");

        let last = pair.last.as_ref().expect("past summary");
        assert_eq!(last.id, 1);
        assert_eq!(last.booker_id, 2);

        let next = pair.next.as_ref().expect("future summary");
        assert_eq!(next.id, 2);
        assert_eq!(next.booker_id, 3);
    }

    #[test]
    fn test_rejected_only_item_is_absent() {
        let now = Utc::now();
        let rejected = booking(
            1,
            10,
            2,
            now - Duration::hours(2),
            now - Duration::hours(1),
            BookingStatus::Rejected,
        );

        let result = find_closest_bookings(&[rejected], now);
        assert!(result.is_empty());
    }

    #[test]
    fn test_later_future_is_not_adopted_over_earlier_one() {
        let now = Utc::now();
        let near_future = booking(
            1,
            10,
            2,
            now + Duration::hours(1),
            now + Duration::hours(2),
            BookingStatus::Approved,
        );
        let far_future = booking(
            2,
            10,
            3,
            now + Duration::hours(5),
            now + Duration::hours(6),
            BookingStatus::Waiting,
        );

        let result = find_closest_bookings(&[near_future, far_future], now);
        let pair = result.get(&10).unwrap();

        assert_eq!(pair.next.as_ref().unwrap().id, 1);
        assert!(pair.last.is_none());
    }

    #[test]
    fn test_earlier_future_replaces_candidate_when_still_running_past_now() {
        let now = Utc::now();
        // Scanned first, becomes the future candidate
        let far_future = booking(
            1,
            10,
            2,
            now + Duration::hours(5),
            now + Duration::hours(6),
            BookingStatus::Approved,
        );
        // Starts earlier than the candidate and ends after now: replaces it
        let near_future = booking(
            2,
            10,
            3,
            now + Duration::hours(1),
            now + Duration::hours(2),
            BookingStatus::Approved,
        );

        let result = find_closest_bookings(&[far_future, near_future], now);
        assert_eq!(result.get(&10).unwrap().next.as_ref().unwrap().id, 2);
    }

    #[test]
    fn test_later_ending_past_replaces_candidate() {
        let now = Utc::now();
        let old_past = booking(
            1,
            10,
            2,
            now - Duration::hours(6),
            now - Duration::hours(5),
            BookingStatus::Approved,
        );
        let recent_past = booking(
            2,
            10,
            3,
            now - Duration::hours(2),
            now - Duration::hours(1),
            BookingStatus::Approved,
        );

        let result = find_closest_bookings(&[old_past, recent_past], now);
        assert_eq!(result.get(&10).unwrap().last.as_ref().unwrap().id, 2);
    }

    #[test]
    fn test_groups_are_independent_per_item() {
        let now = Utc::now();
        let item_a = booking(
            1,
            10,
            2,
            now - Duration::hours(2),
            now - Duration::hours(1),
            BookingStatus::Approved,
        );
        let item_b = booking(
            2,
            20,
            3,
            now + Duration::hours(1),
            now + Duration::hours(2),
            BookingStatus::Approved,
        );

        let result = find_closest_bookings(&[item_a, item_b], now);

        assert_eq!(result.len(), 2);
        assert!(result.get(&10).unwrap().next.is_none());
        assert!(result.get(&20).unwrap().last.is_none());
    }

    #[test]
    fn test_empty_batch() {
        assert!(find_closest_bookings(&[], Utc::now()).is_empty());
    }
}
