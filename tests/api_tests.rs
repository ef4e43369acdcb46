//! API integration tests
//!
//! These run against a live server with a clean database:
//! `cargo test -- --ignored`

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080";

/// Unique suffix so repeated runs do not collide on the email constraint
fn unique() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn create_user(client: &Client, name: &str) -> i64 {
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "name": name,
            "email": format!("{}-{}@lendhub.test", name, unique())
        }))
        .send()
        .await
        .expect("Failed to send create user request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse user");
    body["id"].as_i64().expect("No user ID")
}

async fn create_item(client: &Client, owner_id: i64, name: &str, available: bool) -> i64 {
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header("X-Sharer-User-Id", owner_id)
        .json(&json!({
            "name": name,
            "description": format!("{} for lending", name),
            "available": available
        }))
        .send()
        .await
        .expect("Failed to send create item request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse item");
    body["id"].as_i64().expect("No item ID")
}

async fn create_booking(
    client: &Client,
    booker_id: i64,
    item_id: i64,
    start: &str,
    end: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/bookings", BASE_URL))
        .header("X-Sharer-User-Id", booker_id)
        .json(&json!({
            "itemId": item_id,
            "start": start,
            "end": end
        }))
        .send()
        .await
        .expect("Failed to send create booking request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
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
async fn test_booking_lifecycle() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let stranger = create_user(&client, "stranger").await;
    let item = create_item(&client, owner, "drill", true).await;

    // Booker creates a booking -> WAITING
    let response = create_booking(
        &client,
        booker,
        item,
        "2030-01-01T10:00:00Z",
        "2030-01-11T10:00:00Z",
    )
    .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse booking");
    assert_eq!(body["status"], "WAITING");
    assert_eq!(body["booker"]["id"].as_i64(), Some(booker));
    assert_eq!(body["item"]["id"].as_i64(), Some(item));
    let booking_id = body["id"].as_i64().expect("No booking ID");

    // Owner approves
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking_id))
        .header("X-Sharer-User-Id", owner)
        .send()
        .await
        .expect("Failed to send decide request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse booking");
    assert_eq!(body["status"], "APPROVED");

    // Second decision is rejected
    let response = client
        .patch(format!("{}/bookings/{}?approved=false", BASE_URL, booking_id))
        .header("X-Sharer-User-Id", owner)
        .send()
        .await
        .expect("Failed to send decide request");
    assert_eq!(response.status(), 400);

    // An unrelated user cannot see the booking
    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header("X-Sharer-User-Id", stranger)
        .send()
        .await
        .expect("Failed to send get request");
    assert_eq!(response.status(), 404);

    // Booker and owner both can
    for viewer in [booker, owner] {
        let response = client
            .get(format!("{}/bookings/{}", BASE_URL, booking_id))
            .header("X-Sharer-User-Id", viewer)
            .send()
            .await
            .expect("Failed to send get request");
        assert_eq!(response.status(), 200);
    }
}

#[tokio::test]
#[ignore]
async fn test_decide_by_non_owner_is_not_found() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let item = create_item(&client, owner, "ladder", true).await;

    let response = create_booking(
        &client,
        booker,
        item,
        "2030-02-01T10:00:00Z",
        "2030-02-02T10:00:00Z",
    )
    .await;
    let body: Value = response.json().await.expect("Failed to parse booking");
    let booking_id = body["id"].as_i64().expect("No booking ID");

    // The booker cannot approve their own booking
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking_id))
        .header("X-Sharer-User-Id", booker)
        .send()
        .await
        .expect("Failed to send decide request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_booking_unavailable_item_is_bad_request() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let item = create_item(&client, owner, "broken-mixer", false).await;

    let response = create_booking(
        &client,
        booker,
        item,
        "2030-01-01T10:00:00Z",
        "2030-01-02T10:00:00Z",
    )
    .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_owner_booking_own_item_is_not_found() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let item = create_item(&client, owner, "tent", true).await;

    let response = create_booking(
        &client,
        owner,
        item,
        "2030-01-01T10:00:00Z",
        "2030-01-02T10:00:00Z",
    )
    .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_booking_with_invalid_period_is_bad_request() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let item = create_item(&client, owner, "projector", true).await;

    // end before start
    let response = create_booking(
        &client,
        booker,
        item,
        "2030-01-02T10:00:00Z",
        "2030-01-01T10:00:00Z",
    )
    .await;
    assert_eq!(response.status(), 400);

    // end equals start
    let response = create_booking(
        &client,
        booker,
        item,
        "2030-01-01T10:00:00Z",
        "2030-01-01T10:00:00Z",
    )
    .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_listing_with_unknown_state_is_bad_request() {
    let client = Client::new();
    let user = create_user(&client, "lister").await;

    let response = client
        .get(format!("{}/bookings?state=SOMETHING", BASE_URL))
        .header("X-Sharer-User-Id", user)
        .send()
        .await
        .expect("Failed to send list request");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "Unknown state: UNSUPPORTED_STATUS");
}

#[tokio::test]
#[ignore]
async fn test_listing_with_invalid_page_window_is_bad_request() {
    let client = Client::new();
    let user = create_user(&client, "pager").await;

    for query in ["from=-1&size=10", "from=0&size=0", "from=0&size=-5"] {
        let response = client
            .get(format!("{}/bookings?{}", BASE_URL, query))
            .header("X-Sharer-User-Id", user)
            .send()
            .await
            .expect("Failed to send list request");
        assert_eq!(response.status(), 400, "query {:?}", query);
    }
}

#[tokio::test]
#[ignore]
async fn test_listing_partitions_by_state() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let item = create_item(&client, owner, "kayak", true).await;

    // One booking far in the future, one rejected
    let response = create_booking(
        &client,
        booker,
        item,
        "2031-06-01T10:00:00Z",
        "2031-06-10T10:00:00Z",
    )
    .await;
    let body: Value = response.json().await.expect("Failed to parse booking");
    let future_id = body["id"].as_i64().expect("No booking ID");

    let response = create_booking(
        &client,
        booker,
        item,
        "2032-06-01T10:00:00Z",
        "2032-06-10T10:00:00Z",
    )
    .await;
    let body: Value = response.json().await.expect("Failed to parse booking");
    let rejected_id = body["id"].as_i64().expect("No booking ID");

    let response = client
        .patch(format!("{}/bookings/{}?approved=false", BASE_URL, rejected_id))
        .header("X-Sharer-User-Id", owner)
        .send()
        .await
        .expect("Failed to send decide request");
    assert_eq!(response.status(), 200);

    // One booking straddling now, one fully in the past
    let response = create_booking(
        &client,
        booker,
        item,
        "2020-01-01T10:00:00Z",
        "2099-01-01T10:00:00Z",
    )
    .await;
    let body: Value = response.json().await.expect("Failed to parse booking");
    let current_id = body["id"].as_i64().expect("No booking ID");

    let response = create_booking(
        &client,
        booker,
        item,
        "2020-01-01T10:00:00Z",
        "2020-02-01T10:00:00Z",
    )
    .await;
    let body: Value = response.json().await.expect("Failed to parse booking");
    let past_id = body["id"].as_i64().expect("No booking ID");

    let list = |state: &str| {
        let client = client.clone();
        let state = state.to_string();
        async move {
            let response = client
                .get(format!("{}/bookings?state={}", BASE_URL, state))
                .header("X-Sharer-User-Id", booker)
                .send()
                .await
                .expect("Failed to send list request");
            assert_eq!(response.status(), 200);
            let body: Value = response.json().await.expect("Failed to parse list");
            body.as_array().expect("Expected array").clone()
        }
    };

    let ids = |bookings: &[Value]| -> Vec<i64> {
        bookings.iter().filter_map(|b| b["id"].as_i64()).collect()
    };

    let all = list("ALL").await;
    for id in [future_id, rejected_id, current_id, past_id] {
        assert!(ids(&all).contains(&id));
    }

    let future = list("FUTURE").await;
    assert!(ids(&future).contains(&future_id));
    assert!(ids(&future).contains(&rejected_id));
    assert!(!ids(&future).contains(&current_id));
    assert!(!ids(&future).contains(&past_id));

    let current = list("CURRENT").await;
    assert_eq!(ids(&current), vec![current_id]);

    let past = list("PAST").await;
    assert_eq!(ids(&past), vec![past_id]);

    let waiting = list("WAITING").await;
    assert!(ids(&waiting).contains(&future_id));
    assert!(!ids(&waiting).contains(&rejected_id));

    let rejected = list("REJECTED").await;
    assert!(!ids(&rejected).contains(&future_id));
    assert!(ids(&rejected).contains(&rejected_id));

    // The owner's view partitions the same bookings
    let response = client
        .get(format!("{}/bookings/owner?state=ALL", BASE_URL))
        .header("X-Sharer-User-Id", owner)
        .send()
        .await
        .expect("Failed to send owner list request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse list");
    let owner_all: Vec<i64> = body
        .as_array()
        .expect("Expected array")
        .iter()
        .filter_map(|b| b["id"].as_i64())
        .collect();
    for id in [future_id, rejected_id, current_id, past_id] {
        assert!(owner_all.contains(&id));
    }
}

#[tokio::test]
#[ignore]
async fn test_item_view_shows_adjacent_bookings_to_owner_only() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let item = create_item(&client, owner, "canoe", true).await;

    let response = create_booking(
        &client,
        booker,
        item,
        "2020-05-01T10:00:00Z",
        "2020-05-08T10:00:00Z",
    )
    .await;
    let body: Value = response.json().await.expect("Failed to parse booking");
    let last_id = body["id"].as_i64().expect("No booking ID");

    let response = create_booking(
        &client,
        booker,
        item,
        "2031-05-01T10:00:00Z",
        "2031-05-08T10:00:00Z",
    )
    .await;
    let body: Value = response.json().await.expect("Failed to parse booking");
    let next_id = body["id"].as_i64().expect("No booking ID");

    // The owner sees the adjacent bookings
    let response = client
        .get(format!("{}/items/{}", BASE_URL, item))
        .header("X-Sharer-User-Id", owner)
        .send()
        .await
        .expect("Failed to send get request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse item");
    assert_eq!(body["lastBooking"]["id"].as_i64(), Some(last_id));
    assert_eq!(body["nextBooking"]["id"].as_i64(), Some(next_id));
    assert!(body["comments"].is_array());

    // Everyone else sees the item without them
    let response = client
        .get(format!("{}/items/{}", BASE_URL, item))
        .header("X-Sharer-User-Id", booker)
        .send()
        .await
        .expect("Failed to send get request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse item");
    assert!(body["lastBooking"].is_null());
    assert!(body["nextBooking"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_user_crud() {
    let client = Client::new();
    let email = format!("crud-{}@lendhub.test", unique());

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({"name": "Crud", "email": email}))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse user");
    let user_id = body["id"].as_i64().expect("No user ID");

    // Duplicate email is a conflict
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({"name": "Copycat", "email": email}))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(response.status(), 409);

    // Partial update keeps the other field
    let response = client
        .patch(format!("{}/users/{}", BASE_URL, user_id))
        .json(&json!({"name": "Renamed"}))
        .send()
        .await
        .expect("Failed to send update request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse user");
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["email"], email.as_str());

    // Malformed email is a validation failure with a field list
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({"name": "Broken", "email": "not-an-email"}))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert!(body["errors"].is_array());

    // Delete, then the user is gone
    let response = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send get request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_item_update_and_search() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let other = create_user(&client, "other").await;
    let marker = format!("heliograph-{}", unique());
    let item = create_item(&client, owner, &marker, true).await;

    // Only the owner may update
    let response = client
        .patch(format!("{}/items/{}", BASE_URL, item))
        .header("X-Sharer-User-Id", other)
        .json(&json!({"available": false}))
        .send()
        .await
        .expect("Failed to send update request");
    assert_eq!(response.status(), 404);

    // Search finds the available item, case-insensitively
    let response = client
        .get(format!("{}/items/search?text={}", BASE_URL, marker.to_uppercase()))
        .header("X-Sharer-User-Id", other)
        .send()
        .await
        .expect("Failed to send search request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse search");
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    // A blank query matches nothing
    let response = client
        .get(format!("{}/items/search?text=", BASE_URL))
        .header("X-Sharer-User-Id", other)
        .send()
        .await
        .expect("Failed to send search request");
    let body: Value = response.json().await.expect("Failed to parse search");
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    // Owner makes it unavailable; search no longer finds it
    let response = client
        .patch(format!("{}/items/{}", BASE_URL, item))
        .header("X-Sharer-User-Id", owner)
        .json(&json!({"available": false}))
        .send()
        .await
        .expect("Failed to send update request");
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/items/search?text={}", BASE_URL, marker))
        .header("X-Sharer-User-Id", other)
        .send()
        .await
        .expect("Failed to send search request");
    let body: Value = response.json().await.expect("Failed to parse search");
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_comment_requires_finished_booking() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let item = create_item(&client, owner, "telescope", true).await;

    // No booking yet -> comment rejected
    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item))
        .header("X-Sharer-User-Id", booker)
        .json(&json!({"text": "great"}))
        .send()
        .await
        .expect("Failed to send comment request");
    assert_eq!(response.status(), 400);

    // A WAITING booking in the future still does not qualify
    let response = create_booking(
        &client,
        booker,
        item,
        "2030-03-01T10:00:00Z",
        "2030-03-02T10:00:00Z",
    )
    .await;
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item))
        .header("X-Sharer-User-Id", booker)
        .json(&json!({"text": "still great"}))
        .send()
        .await
        .expect("Failed to send comment request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_requests_flow() {
    let client = Client::new();
    let requester = create_user(&client, "requester").await;
    let fulfiller = create_user(&client, "fulfiller").await;

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header("X-Sharer-User-Id", requester)
        .json(&json!({"description": "need a sewing machine"}))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse request");
    let request_id = body["id"].as_i64().expect("No request ID");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));

    // Another user lists an item against the request
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header("X-Sharer-User-Id", fulfiller)
        .json(&json!({
            "name": "sewing machine",
            "description": "barely used",
            "available": true,
            "requestId": request_id
        }))
        .send()
        .await
        .expect("Failed to send create item request");
    assert_eq!(response.status(), 201);

    // The request now carries its fulfilling item
    let response = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header("X-Sharer-User-Id", requester)
        .send()
        .await
        .expect("Failed to send get request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse request");
    let items = body["items"].as_array().expect("Expected items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["ownerId"].as_i64(), Some(fulfiller));

    // The requester sees it in their own listing
    let response = client
        .get(format!("{}/requests", BASE_URL))
        .header("X-Sharer-User-Id", requester)
        .send()
        .await
        .expect("Failed to send list request");
    let body: Value = response.json().await.expect("Failed to parse list");
    let listed: Vec<i64> = body
        .as_array()
        .expect("Expected array")
        .iter()
        .filter_map(|r| r["id"].as_i64())
        .collect();
    assert!(listed.contains(&request_id));
}

#[tokio::test]
#[ignore]
async fn test_missing_sharer_header_is_bad_request() {
    let client = Client::new();

    let response = client
        .get(format!("{}/items", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}
