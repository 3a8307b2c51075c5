//! API integration tests
//!
//! These run against a live server with a clean database:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// Create a user with a unique email and return its id
async fn create_user(client: &Client, name: &str) -> i64 {
    let email = format!("{}-{}@example.org", name, rand_suffix());

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": name, "email": email }))
        .send()
        .await
        .expect("Failed to send create user request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse user response");
    body["id"].as_i64().expect("No user ID")
}

/// Create an item owned by the given user and return its id
async fn create_item(client: &Client, owner_id: i64, name: &str, available: bool) -> i64 {
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_ID_HEADER, owner_id)
        .json(&json!({
            "name": name,
            "description": format!("{} for sharing", name),
            "available": available
        }))
        .send()
        .await
        .expect("Failed to send create item request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse item response");
    body["id"].as_i64().expect("No item ID")
}

/// Book an item one to two hours from now and return the response
async fn create_booking(client: &Client, booker_id: i64, item_id: i64) -> reqwest::Response {
    let start = chrono::Utc::now() + chrono::Duration::hours(1);
    let end = chrono::Utc::now() + chrono::Duration::hours(2);

    client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_ID_HEADER, booker_id)
        .json(&json!({
            "start": start.to_rfc3339(),
            "end": end.to_rfc3339(),
            "item_id": item_id
        }))
        .send()
        .await
        .expect("Failed to send create booking request")
}

fn rand_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_missing_identity_header() {
    let client = Client::new();

    let response = client
        .get(format!("{}/items", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_user_update_preserves_absent_fields() {
    let client = Client::new();
    let user_id = create_user(&client, "merge").await;

    let response = client
        .patch(format!("{}/users/{}", BASE_URL, user_id))
        .json(&json!({ "name": "renamed" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "renamed");
    // Email was absent from the patch and must survive
    assert!(body["email"].as_str().unwrap().contains("@example.org"));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_conflict() {
    let client = Client::new();
    let email = format!("dup-{}@example.org", rand_suffix());

    let first = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": "first", "email": email }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), 201);

    let second = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": "second", "email": email }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_booking_lifecycle() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let item = create_item(&client, owner, "drill", true).await;

    // Create: status WAITING, booker embedded
    let response = create_booking(&client, booker, item).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "WAITING");
    assert_eq!(body["booker"]["id"].as_i64().unwrap(), booker);
    let booking_id = body["id"].as_i64().expect("No booking ID");

    // Approve by owner
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking_id))
        .header(USER_ID_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "APPROVED");

    // Second approval attempt fails
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking_id))
        .header(USER_ID_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_rejected_booking_can_change_again() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let item = create_item(&client, owner, "ladder", true).await;

    let response = create_booking(&client, booker, item).await;
    let body: Value = response.json().await.expect("Failed to parse response");
    let booking_id = body["id"].as_i64().unwrap();

    let response = client
        .patch(format!("{}/bookings/{}?approved=false", BASE_URL, booking_id))
        .header(USER_ID_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // A REJECTED booking may still be approved afterwards
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking_id))
        .header(USER_ID_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "APPROVED");
}

#[tokio::test]
#[ignore]
async fn test_owner_cannot_book_own_item() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let item = create_item(&client, owner, "saw", true).await;

    let response = create_booking(&client, owner, item).await;
    // Masked as not-found, not forbidden
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_unavailable_item_cannot_be_booked() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let item = create_item(&client, owner, "broken mixer", false).await;

    let response = create_booking(&client, booker, item).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_booking_equal_start_end_rejected() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let item = create_item(&client, owner, "tent", true).await;

    let start = chrono::Utc::now() + chrono::Duration::hours(1);

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_ID_HEADER, booker)
        .json(&json!({
            "start": start.to_rfc3339(),
            "end": start.to_rfc3339(),
            "item_id": item
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_booking_visible_only_to_booker_and_owner() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let stranger = create_user(&client, "stranger").await;
    let item = create_item(&client, owner, "bike", true).await;

    let response = create_booking(&client, booker, item).await;
    let body: Value = response.json().await.expect("Failed to parse response");
    let booking_id = body["id"].as_i64().unwrap();

    for viewer in [booker, owner] {
        let response = client
            .get(format!("{}/bookings/{}", BASE_URL, booking_id))
            .header(USER_ID_HEADER, viewer)
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
    }

    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header(USER_ID_HEADER, stranger)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_unknown_state_is_an_error() {
    let client = Client::new();
    let user = create_user(&client, "lister").await;

    let response = client
        .get(format!("{}/bookings?state=SOMETIME", BASE_URL))
        .header(USER_ID_HEADER, user)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Unknown state: SOMETIME"));
}

#[tokio::test]
#[ignore]
async fn test_booking_pages_are_disjoint() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let item = create_item(&client, owner, "projector", true).await;

    for _ in 0..15 {
        let response = create_booking(&client, booker, item).await;
        assert_eq!(response.status(), 201);
    }

    let first: Vec<Value> = client
        .get(format!("{}/bookings?from=0&size=10", BASE_URL))
        .header(USER_ID_HEADER, booker)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let second: Vec<Value> = client
        .get(format!("{}/bookings?from=10&size=10", BASE_URL))
        .header(USER_ID_HEADER, booker)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 5);

    let first_ids: Vec<i64> = first.iter().map(|b| b["id"].as_i64().unwrap()).collect();
    for booking in &second {
        assert!(!first_ids.contains(&booking["id"].as_i64().unwrap()));
    }
}

#[tokio::test]
#[ignore]
async fn test_item_update_by_non_owner_is_forbidden() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let other = create_user(&client, "other").await;
    let item = create_item(&client, owner, "kayak", true).await;

    let response = client
        .patch(format!("{}/items/{}", BASE_URL, item))
        .header(USER_ID_HEADER, other)
        .json(&json!({ "name": "stolen kayak" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_item_update_preserves_absent_fields() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let item = create_item(&client, owner, "camera", true).await;

    let response = client
        .patch(format!("{}/items/{}", BASE_URL, item))
        .header(USER_ID_HEADER, owner)
        .json(&json!({ "available": false }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available"], false);
    assert_eq!(body["name"], "camera");
}

#[tokio::test]
#[ignore]
async fn test_search_empty_text_yields_nothing() {
    let client = Client::new();

    let response = client
        .get(format!("{}/items/search?text=", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert!(body.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_comment_requires_finished_booking() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let commenter = create_user(&client, "commenter").await;
    let item = create_item(&client, owner, "grill", true).await;

    // No booking at all: comment refused
    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item))
        .header(USER_ID_HEADER, commenter)
        .json(&json!({ "text": "never used it" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_request_lists_matching_items() {
    let client = Client::new();
    let requester = create_user(&client, "requester").await;
    let owner = create_user(&client, "owner").await;

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header(USER_ID_HEADER, requester)
        .json(&json!({ "description": "need a snowboard" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let request_id = body["id"].as_i64().unwrap();

    // Owner answers the request with a new item
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_ID_HEADER, owner)
        .json(&json!({
            "name": "snowboard",
            "description": "a snowboard",
            "available": true,
            "request_id": request_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header(USER_ID_HEADER, requester)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let items = body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "snowboard");
}
