//! API integration tests
//!
//! These run against a live server with a seeded database.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to register a throwaway account and get its token
async fn register_user(client: &Client, username: &str) -> String {
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "testpass123",
            "hostel_name": "Hostel A",
            "room_number": "101",
            "phone_number": "5550100"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    let body: Value = response.json().await.expect("Failed to parse register response");
    body["token"].as_str().expect("No token in response").to_string()
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
async fn test_register_and_login() {
    let client = Client::new();
    let username = format!("it_user_{}", std::process::id());

    let token = register_user(&client, &username).await;
    assert!(!token.is_empty());

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "testpass123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "nobody",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_items() {
    let client = Client::new();
    let token = register_user(&client, &format!("it_lister_{}", std::process::id())).await;

    let response = client
        .get(format!("{}/items", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_create_item_and_rent_own_item_rejected() {
    let client = Client::new();
    let token = register_user(&client, &format!("it_owner_{}", std::process::id())).await;

    // Create item
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "Cricket Bat",
            "description": "Lightly used",
            "price": "10.00",
            "per_day": true,
            "category": "sports"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let item_id = body["id"].as_i64().expect("No item ID");

    // Owner renting their own item must be rejected with no rental created
    let response = client
        .post(format!("{}/items/{}/rent", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "start_date": "2030-01-10",
            "end_date": "2030-01-12"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);

    // Cleanup
    let _ = client
        .delete(format!("{}/items/{}", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_rental_flow_and_duplicate_request() {
    let client = Client::new();
    let pid = std::process::id();
    let owner_token = register_user(&client, &format!("it_lender_{}", pid)).await;
    let borrower_token = register_user(&client, &format!("it_borrower_{}", pid)).await;

    // Owner lists a per-day item
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header("Authorization", format!("Bearer {}", owner_token))
        .json(&json!({
            "name": "DSLR Camera",
            "description": "With kit lens",
            "price": "10.00",
            "per_day": true,
            "category": "gadgets"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let item_id = response.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    // Borrower requests a 3-day window: total must be 30.00
    let response = client
        .post(format!("{}/items/{}/rent", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", borrower_token))
        .json(&json!({
            "start_date": "2030-10-10",
            "end_date": "2030-10-12"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    let rental_id = body["rental"]["id"].as_i64().unwrap();
    assert_eq!(body["rental"]["total_price"], "30.00");
    assert_eq!(body["rental"]["status"], "pending");

    // A duplicate request while the first is pending must be rejected
    let response = client
        .post(format!("{}/items/{}/rent", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", borrower_token))
        .json(&json!({
            "start_date": "2030-11-01",
            "end_date": "2030-11-02"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // Only the lender may accept; the borrower gets 403
    let response = client
        .post(format!("{}/rentals/{}/accept", BASE_URL, rental_id))
        .header("Authorization", format!("Bearer {}", borrower_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Lender accepts, hands over, receives back
    for action in ["accept", "pickup", "return"] {
        let response = client
            .post(format!("{}/rentals/{}/{}", BASE_URL, rental_id, action))
            .header("Authorization", format!("Bearer {}", owner_token))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success(), "action {} failed", action);
    }

    // Accepting a settled rental must fail
    let response = client
        .post(format!("{}/rentals/{}/accept", BASE_URL, rental_id))
        .header("Authorization", format!("Bearer {}", owner_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // Borrower was notified along the way
    let response = client
        .get(format!("{}/notifications", BASE_URL))
        .header("Authorization", format!("Bearer {}", borrower_token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert!(body["notifications"].as_array().unwrap().len() >= 3);
}

#[tokio::test]
#[ignore]
async fn test_reports_require_staff() {
    let client = Client::new();
    let token = register_user(&client, &format!("it_member_{}", std::process::id())).await;

    for path in [
        "/reports/dashboard",
        "/reports/items/pdf",
        "/reports/items/excel",
        "/reports/rentals/pdf",
        "/reports/rentals/excel",
        "/reports/users/pdf",
        "/reports/users/excel",
    ] {
        let response = client
            .get(format!("{}{}", BASE_URL, path))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), 403, "path {} should be staff-only", path);
    }
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/items", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
