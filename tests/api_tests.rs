//! API integration tests
//!
//! Run against a live server with a migrated database:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique login per test run to keep runs independent
fn unique_login(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}_{}", prefix, nanos)
}

/// Authenticate as the bootstrap admin
async fn admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Register a fresh patron; returns (token, user_id)
async fn register_patron(client: &Client, prefix: &str) -> (String, i64) {
    let login = unique_login(prefix);

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "login": login,
            "password": "password"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse register response");
    let user_id = body["id"].as_i64().expect("No user ID");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": login,
            "password": "password"
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse login response");
    let token = body["token"].as_str().expect("No token in response").to_string();

    (token, user_id)
}

/// Create a book as admin; returns its id
async fn create_book(client: &Client, token: &str, title: &str) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": title,
            "author": "Test Author",
            "language": "english"
        }))
        .send()
        .await
        .expect("Failed to send create book request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse book response");
    body["id"].as_i64().expect("No book ID")
}

/// Get a book detail as a given user
async fn book_detail(client: &Client, token: &str, book_id: i64) -> Value {
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send detail request");
    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse detail response")
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
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_register_and_me() {
    let client = Client::new();
    let (token, user_id) = register_patron(&client, "reader").await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"].as_i64(), Some(user_id));
    assert_eq!(body["role"], "patron");
}

#[tokio::test]
#[ignore]
async fn test_create_book_derives_sort_title() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "The Hobbit",
            "author": "J. R. R. Tolkien",
            "language": "english"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["sort_title"], "Hobbit, The");
    assert_eq!(body["language"], "English");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Moby Dick",
            "author": "Herman Melville"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["sort_title"], "Moby Dick");
}

#[tokio::test]
#[ignore]
async fn test_unknown_sort_key_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books?sort=rating", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_patron_cannot_create_books() {
    let client = Client::new();
    let (token, _) = register_patron(&client, "patron").await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Forbidden",
            "author": "Nobody"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_checkout_then_checkin_with_empty_queue() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (token, _) = register_patron(&client, "borrower").await;

    let book_id = create_book(&client, &admin, "A Study in Scarlet").await;

    // Checkout
    let response = client
        .post(format!("{}/books/{}/checkout", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send checkout request");
    assert!(response.status().is_success());

    let detail = book_detail(&client, &token, book_id).await;
    assert_eq!(detail["circulation"]["checked_out"], true);

    // Checkin with an empty hold queue promotes nobody
    let response = client
        .post(format!("{}/books/{}/checkin", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send checkin request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.get("promoted_user_id").is_none());

    let detail = book_detail(&client, &token, book_id).await;
    assert_eq!(detail["circulation"]["checked_out"], false);
}

#[tokio::test]
#[ignore]
async fn test_checkin_echoes_redirect_target() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (token, _) = register_patron(&client, "redirected").await;

    let book_id = create_book(&client, &admin, "Kidnapped").await;

    let response = client
        .post(format!(
            "{}/books/{}/checkin?next=/books",
            BASE_URL, book_id
        ))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send checkin request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["redirect_to"], "/books");
}

#[tokio::test]
#[ignore]
async fn test_hold_queue_positions_and_promotion() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let (holder_token, _) = register_patron(&client, "holder").await;
    let (a_token, a_id) = register_patron(&client, "queue_a").await;
    let (b_token, _) = register_patron(&client, "queue_b").await;
    let (c_token, _) = register_patron(&client, "queue_c").await;

    let book_id = create_book(&client, &admin, "The Time Machine").await;

    // Current holder checks the book out
    let response = client
        .post(format!("{}/books/{}/checkout", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", holder_token))
        .send()
        .await
        .expect("Failed to send checkout request");
    assert!(response.status().is_success());

    // A, B, C join the hold queue in order
    for (token, expected_position) in [(&a_token, 1), (&b_token, 2), (&c_token, 3)] {
        let response = client
            .post(format!("{}/books/{}/hold", BASE_URL, book_id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to send hold request");
        assert!(response.status().is_success());

        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["queue_position"].as_i64(), Some(expected_position));
    }

    // Checkin by the current holder promotes A
    let response = client
        .post(format!("{}/books/{}/checkin", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", holder_token))
        .send()
        .await
        .expect("Failed to send checkin request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["promoted_user_id"].as_i64(), Some(a_id));

    // A is now checked out and no longer queued
    let detail = book_detail(&client, &a_token, book_id).await;
    assert_eq!(detail["circulation"]["checked_out"], true);
    assert_eq!(detail["circulation"]["on_hold"], false);

    // Queue is now [B, C]
    let detail = book_detail(&client, &b_token, book_id).await;
    assert_eq!(detail["circulation"]["queue_position"].as_i64(), Some(1));
    let detail = book_detail(&client, &c_token, book_id).await;
    assert_eq!(detail["circulation"]["queue_position"].as_i64(), Some(2));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_hold_is_rejected() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (token, _) = register_patron(&client, "eager").await;

    let book_id = create_book(&client, &admin, "Dracula").await;

    let response = client
        .post(format!("{}/books/{}/hold", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send hold request");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/books/{}/hold", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send hold request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_remove_hold() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (token, _) = register_patron(&client, "waverer").await;

    let book_id = create_book(&client, &admin, "Persuasion").await;

    let response = client
        .post(format!("{}/books/{}/hold", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send hold request");
    assert!(response.status().is_success());

    let response = client
        .delete(format!("{}/books/{}/hold", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send remove hold request");
    assert_eq!(response.status(), 204);

    let detail = book_detail(&client, &token, book_id).await;
    assert_eq!(detail["circulation"]["on_hold"], false);

    // Removing a hold that no longer exists is an explicit 404
    let response = client
        .delete(format!("{}/books/{}/hold", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send remove hold request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_anonymous_detail_has_no_circulation() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let book_id = create_book(&client, &admin, "Emma").await;

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.get("circulation").is_none());
    assert_eq!(body["book"]["title"], "Emma");
}

#[tokio::test]
#[ignore]
async fn test_admin_can_update_and_delete_book() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (patron, _) = register_patron(&client, "bystander").await;

    let book_id = create_book(&client, &admin, "The Warden").await;

    // Patron cannot update
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", patron))
        .json(&json!({ "title": "X", "author": "Y" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Admin update with an explicit sort title override
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "title": "The Warden",
            "author": "Anthony Trollope",
            "sort_title": "Warden, The (Barchester 1)"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["sort_title"], "Warden, The (Barchester 1)");

    // Admin delete
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}
