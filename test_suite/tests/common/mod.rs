#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;
use wardrobe::{Migrator, build_app};

// Helper function to get database URL from environment or default to SQLite
fn get_test_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
}

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect(&get_test_database_url())
        .await
        .expect("Failed to connect to test database");
    Migrator::fresh(&db).await.expect("Failed to run migrations");
    db
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn content_range(&self) -> &str {
        self.headers
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// Field names reported in a 422 body
    pub fn error_fields(&self) -> Vec<String> {
        self.body["details"]
            .as_array()
            .map(|details| {
                details
                    .iter()
                    .filter_map(|d| d["field"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

/// A migrated database, the full router and a signed-in user
pub struct TestApp {
    pub db: DatabaseConnection,
    pub app: Router,
    pub token: String,
    pub user_id: i64,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = setup_test_db().await;
        let app = build_app(&db, &[]);
        let response = send(
            &app,
            Method::POST,
            "/api/register",
            None,
            Some(json!({
                "name": "Test User",
                "email": "tester@wardrobe.test",
                "password": "password123",
                "password_confirmation": "password123"
            })),
        )
        .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        Self {
            db,
            app,
            token: response.body["access_token"].as_str().unwrap().to_string(),
            user_id: response.body["user"]["id"].as_i64().unwrap(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        send(&self.app, Method::GET, uri, Some(&self.token), None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        send(&self.app, Method::POST, uri, Some(&self.token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        send(&self.app, Method::PUT, uri, Some(&self.token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        send(&self.app, Method::DELETE, uri, Some(&self.token), None).await
    }

    pub async fn create_category(&self, title: &str, slug: &str) -> i64 {
        let response = self
            .post("/api/categories", json!({ "title": title, "slug": slug }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }

    pub async fn create_tag(&self, name: &str) -> i64 {
        let response = self.post("/api/tags", json!({ "name": name })).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }

    /// `extra` is merged over the required fields
    pub async fn create_item(&self, category_id: i64, name: &str, extra: Value) -> i64 {
        let mut body = json!({
            "user_id": self.user_id,
            "category_id": category_id,
            "name": name,
        });
        if let (Some(target), Value::Object(extra)) = (body.as_object_mut(), extra) {
            target.extend(extra);
        }
        let response = self.post("/api/clothing-items", body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }
}
