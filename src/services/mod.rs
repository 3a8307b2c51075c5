//! Business logic services

pub mod bookings;
pub mod items;
pub mod requests;
pub mod users;

use crate::{
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub items: items::ItemsService,
    pub bookings: bookings::BookingsService,
    pub requests: requests::RequestsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            users: users::UsersService::new(repository.clone()),
            items: items::ItemsService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone()),
            requests: requests::RequestsService::new(repository),
        }
    }
}

/// Page index for the (from, size) paging scheme.
///
/// `from == 0` maps to the first page; otherwise the index is `from / size`
/// in integer division, so a `from` that is not a multiple of `size` lands
/// on the page containing that offset rather than starting mid-page.
pub(crate) fn page_index(from: i64, size: i64) -> AppResult<i64> {
    if from < 0 {
        return Err(AppError::Validation("from must not be negative".to_string()));
    }
    if size <= 0 {
        return Err(AppError::Validation("size must be positive".to_string()));
    }

    Ok(if from == 0 { 0 } else { from / size })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_index() {
        assert_eq!(page_index(0, 10).unwrap(), 0);
        assert_eq!(page_index(10, 10).unwrap(), 1);
        assert_eq!(page_index(20, 10).unwrap(), 2);
        // from not a multiple of size falls back to the containing page
        assert_eq!(page_index(15, 10).unwrap(), 1);
        assert_eq!(page_index(9, 10).unwrap(), 0);
    }

    #[test]
    fn test_page_index_rejects_bad_input() {
        assert!(page_index(-1, 10).is_err());
        assert!(page_index(0, 0).is_err());
        assert!(page_index(0, -5).is_err());
    }
}
