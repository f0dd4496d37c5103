mod common;

use axum::http::{Method, StatusCode, header};
use common::{TestApp, send, setup_test_db};
use sea_orm::EntityTrait;
use serde_json::json;
use wardrobe::models::personal_access_token;

fn registration(email: &str) -> serde_json::Value {
    json!({
        "name": "Alex",
        "email": email,
        "password": "password123",
        "password_confirmation": "password123"
    })
}

#[tokio::test]
async fn test_register_returns_token_and_hides_password() {
    let db = setup_test_db().await;
    let app = wardrobe::build_app(&db, &[]);

    let response = send(&app, Method::POST, "/api/register", None, Some(registration("alex@wardrobe.test"))).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["token_type"], "Bearer");
    assert_eq!(response.body["user"]["email"], "alex@wardrobe.test");
    assert!(response.body["user"].get("password").is_none());

    let token = response.body["access_token"].as_str().unwrap();
    let (id, secret) = token.split_once('|').unwrap();
    assert!(id.parse::<i32>().is_ok());
    assert!(secret.len() >= 40);
}

#[tokio::test]
async fn test_register_rejects_duplicate_email_and_bad_confirmation() {
    let app = TestApp::new().await;

    let duplicate = send(&app.app, Method::POST, "/api/register", None, Some(registration("tester@wardrobe.test"))).await;
    assert_eq!(duplicate.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(duplicate.error_fields(), vec!["email"]);

    let mut mismatched = registration("new@wardrobe.test");
    mismatched["password_confirmation"] = json!("different123");
    let response = send(&app.app, Method::POST, "/api/register", None, Some(mismatched)).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_fields(), vec!["password"]);
}

#[tokio::test]
async fn test_login_with_valid_and_invalid_credentials() {
    let app = TestApp::new().await;

    let ok = send(
        &app.app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "tester@wardrobe.test", "password": "password123" })),
    )
    .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["user"]["id"].as_i64(), Some(app.user_id));
    assert_ne!(ok.body["access_token"].as_str(), Some(app.token.as_str()));

    let wrong_password = send(
        &app.app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "tester@wardrobe.test", "password": "password124" })),
    )
    .await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body["error"], "Invalid credentials");

    let unknown_user = send(
        &app.app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "nobody@wardrobe.test", "password": "password123" })),
    )
    .await;
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_a_valid_token() {
    let app = TestApp::new().await;

    let anonymous = send(&app.app, Method::GET, "/api/tags", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

    let (id, _) = app.token.split_once('|').unwrap();
    let forged = format!("{id}|not-the-secret");
    let response = send(&app.app, Method::GET, "/api/tags", Some(&forged), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let garbage = send(&app.app, Method::GET, "/api/me", Some("garbage"), None).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_and_logout() {
    let app = TestApp::new().await;

    let me = app.get("/api/me").await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["user"]["email"], "tester@wardrobe.test");

    let logout = app.post("/api/logout", json!({})).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["message"], "Logged out successfully");

    let after = app.get("/api/me").await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

async fn login(app: &TestApp, email: &str, password: &str) -> StatusCode {
    send(
        &app.app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
    .status
}

#[tokio::test]
async fn test_password_update_is_rehashed_for_login() {
    let app = TestApp::new().await;

    let updated = app
        .put(&format!("/api/users/{}", app.user_id), json!({ "password": "newsecret456" }))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert!(updated.body.get("password").is_none());

    assert_eq!(login(&app, "tester@wardrobe.test", "newsecret456").await, StatusCode::OK);
    assert_eq!(
        login(&app, "tester@wardrobe.test", "password123").await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_authenticated_requests_refresh_last_used_at() {
    let app = TestApp::new().await;
    let token_id: i32 = app.token.split_once('|').unwrap().0.parse().unwrap();

    let fresh = personal_access_token::Entity::find_by_id(token_id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert!(fresh.last_used_at.is_none());

    assert_eq!(app.get("/api/me").await.status, StatusCode::OK);

    let used = personal_access_token::Entity::find_by_id(token_id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert!(used.last_used_at.is_some());
}
