//! Integration tests for the auth endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p grindtrack-api)
//!
//! Run with: cargo test -p grindtrack-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use grindtrack_integration_tests::{base_url, client, unique_title};

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_signup_rejects_missing_fields() {
    let resp = client()
        .post(format!("{}/auth/signup", base_url()))
        .json(&json!({ "email": "incomplete@example.com" }))
        .send()
        .await
        .expect("Failed to post signup");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_signup_rejects_malformed_email() {
    let resp = client()
        .post(format!("{}/auth/signup", base_url()))
        .json(&json!({ "email": "not-an-email", "password": "longenough" }))
        .send()
        .await
        .expect("Failed to post signup");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_signup_rejects_short_password() {
    let email = format!("{}@example.com", unique_title("shortpw"));
    let resp = client()
        .post(format!("{}/auth/signup", base_url()))
        .json(&json!({ "email": email, "password": "short" }))
        .send()
        .await
        .expect("Failed to post signup");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and SMTP relay"]
async fn test_signup_then_duplicate_is_rejected() {
    let email = format!("{}@example.com", unique_title("dupe"));
    let body = json!({ "email": email, "password": "longenough" });

    let first = client()
        .post(format!("{}/auth/signup", base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to post signup");
    assert_eq!(first.status(), StatusCode::OK);

    let second = client()
        .post(format!("{}/auth/signup", base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to post signup");
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let message: Value = second.json().await.expect("Failed to parse body");
    assert_eq!(message["message"], "Email already registered");
}

#[tokio::test]
#[ignore = "Requires running API server and SMTP relay"]
async fn test_login_before_verification_is_forbidden() {
    let email = format!("{}@example.com", unique_title("unverified"));
    let body = json!({ "email": email, "password": "longenough" });

    let signup = client()
        .post(format!("{}/auth/signup", base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to post signup");
    assert_eq!(signup.status(), StatusCode::OK);

    // Correct password, but the account has not been verified
    let login = client()
        .post(format!("{}/auth/login", base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to post login");
    assert_eq!(login.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_verify_with_wrong_otp_is_rejected() {
    let resp = client()
        .post(format!("{}/auth/verify", base_url()))
        .json(&json!({ "email": "nobody@example.com", "otp": "000000" }))
        .send()
        .await
        .expect("Failed to post verify");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_login_unknown_email_and_wrong_password_look_identical() {
    let unknown = client()
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": "ghost@example.com", "password": "longenough" }))
        .send()
        .await
        .expect("Failed to post login");

    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    let body: Value = unknown.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_protected_routes_reject_missing_token() {
    for path in ["/sheets", "/activity"] {
        let resp = client()
            .get(format!("{}{path}", base_url()))
            .send()
            .await
            .expect("Failed to get protected route");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "path {path}");
    }
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_protected_routes_reject_garbage_token() {
    let resp = client()
        .get(format!("{}/sheets", base_url()))
        .header("Authorization", "Bearer not-a-real-token")
        .send()
        .await
        .expect("Failed to get protected route");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
