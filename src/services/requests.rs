//! Item request service
//!
//! Requests are want-ads for items missing from the catalog. They are
//! read-only after creation; responses carry the items answering them,
//! fetched in one batch per listing.

use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{
        item::{Item, ItemResponse},
        request::{CreateRequest, ItemRequest, RequestResponse},
    },
    repository::Repository,
};

use super::page_index;

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Post a new request
    pub async fn create(&self, request: CreateRequest, user_id: i64) -> AppResult<RequestResponse> {
        self.repository.users.get_by_id(user_id).await?;

        let created = self.repository.requests.create(user_id, &request).await?;

        tracing::info!(request_id = created.id, user_id, "request created");

        Ok(RequestResponse::from_request(created, None))
    }

    /// Get one request with the items answering it
    pub async fn get_request(&self, request_id: i64, user_id: i64) -> AppResult<RequestResponse> {
        self.repository.users.get_by_id(user_id).await?;
        let request = self.repository.requests.get_by_id(request_id).await?;

        let items: Vec<ItemResponse> = self
            .repository
            .items
            .find_all_by_request_id(request_id)
            .await?
            .into_iter()
            .map(ItemResponse::from_item)
            .collect();

        Ok(RequestResponse::from_request(request, Some(items)))
    }

    /// List the user's own requests, newest first
    pub async fn get_all_by_user(&self, user_id: i64) -> AppResult<Vec<RequestResponse>> {
        self.repository.users.get_by_id(user_id).await?;

        let requests = self.repository.requests.find_all_by_user(user_id).await?;
        self.attach_items(requests).await
    }

    /// List a page of other users' requests, newest first
    pub async fn get_all(&self, user_id: i64, from: i64, size: i64) -> AppResult<Vec<RequestResponse>> {
        self.repository.users.get_by_id(user_id).await?;

        let page = page_index(from, size)?;
        let requests = self
            .repository
            .requests
            .find_all_by_other_users(user_id, page, size)
            .await?;

        self.attach_items(requests).await
    }

    /// Attach matching items to a batch of requests with a single query
    async fn attach_items(&self, requests: Vec<ItemRequest>) -> AppResult<Vec<RequestResponse>> {
        let request_ids: Vec<i64> = requests.iter().map(|request| request.id).collect();

        let items = self.repository.items.find_all_by_request_ids(&request_ids).await?;
        let mut by_request = group_items_by_request(items);

        Ok(requests
            .into_iter()
            .map(|request| {
                let items = by_request.remove(&request.id).unwrap_or_default();
                RequestResponse::from_request(request, Some(items))
            })
            .collect())
    }
}

fn group_items_by_request(items: Vec<Item>) -> HashMap<i64, Vec<ItemResponse>> {
    let mut map: HashMap<i64, Vec<ItemResponse>> = HashMap::new();
    for item in items {
        if let Some(request_id) = item.request_id {
            map.entry(request_id).or_default().push(ItemResponse::from_item(item));
        }
    }
    map
}
