mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_category_lifecycle() {
    let app = TestApp::new().await;

    let created = app
        .post(
            "/api/categories",
            json!({ "title": "Tops", "slug": "tops", "color": "#3b82f6", "description": "Shirts" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["sort_order"], 0);
    assert_eq!(created.body["is_active"], true);
    assert_eq!(created.body["clothing_items"], json!([]));
    let id = created.body["id"].as_i64().unwrap();

    let updated = app
        .put(&format!("/api/categories/{id}"), json!({ "description": null, "sort_order": 3 }))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert!(updated.body["description"].is_null());
    assert_eq!(updated.body["sort_order"], 3);
    assert_eq!(updated.body["title"], "Tops");
    assert_eq!(updated.body["color"], "#3b82f6");

    let deleted = app.delete(&format!("/api/categories/{id}")).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&format!("/api/categories/{id}")).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&format!("/api/categories/{id}")).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_slug_must_be_unique() {
    let app = TestApp::new().await;
    let tops = app.create_category("Tops", "tops").await;
    let bottoms = app.create_category("Bottoms", "bottoms").await;

    let duplicate = app.post("/api/categories", json!({ "title": "Other", "slug": "tops" })).await;
    assert_eq!(duplicate.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(duplicate.body["details"][0]["message"], "The slug has already been taken");

    let keep_own = app.put(&format!("/api/categories/{tops}"), json!({ "slug": "tops" })).await;
    assert_eq!(keep_own.status, StatusCode::OK);

    let steal = app.put(&format!("/api/categories/{bottoms}"), json!({ "slug": "tops" })).await;
    assert_eq!(steal.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_category_validation_reports_every_field() {
    let app = TestApp::new().await;

    let response = app
        .post(
            "/api/categories",
            json!({ "title": "", "slug": "x", "color": "#1234567", "sort_order": -1 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "Validation failed");
    assert_eq!(response.error_fields(), vec!["title", "color", "sort_order"]);
}

#[tokio::test]
async fn test_categories_default_to_sort_order_then_title() {
    let app = TestApp::new().await;
    for (title, slug, order) in [("Shoes", "shoes", 2), ("Bottoms", "bottoms", 1), ("Accessories", "accessories", 2)] {
        let response = app
            .post("/api/categories", json!({ "title": title, "slug": slug, "sort_order": order }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let list = app.get("/api/categories").await;
    let titles: Vec<&str> = list.body.as_array().unwrap().iter().map(|c| c["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Bottoms", "Accessories", "Shoes"]);
}

#[tokio::test]
async fn test_tag_names_are_unique_and_renamable() {
    let app = TestApp::new().await;
    let casual = app.create_tag("Casual").await;
    app.create_tag("Formal").await;

    assert_eq!(app.post("/api/tags", json!({ "name": "Casual" })).await.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.put(&format!("/api/tags/{casual}"), json!({ "name": "Formal" })).await.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.put(&format!("/api/tags/{casual}"), json!({})).await.status, StatusCode::UNPROCESSABLE_ENTITY);

    let renamed = app.put(&format!("/api/tags/{casual}"), json!({ "name": "Relaxed" })).await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["name"], "Relaxed");
}

#[tokio::test]
async fn test_users_crud_never_exposes_passwords() {
    let app = TestApp::new().await;

    let created = app
        .post("/api/users", json!({ "name": "Sam", "email": "sam@wardrobe.test", "password": "password123" }))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert!(created.body.get("password").is_none());
    assert_eq!(created.body["outfits"], json!([]));
    let id = created.body["id"].as_i64().unwrap();

    let taken = app.put(&format!("/api/users/{id}"), json!({ "email": "tester@wardrobe.test" })).await;
    assert_eq!(taken.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(taken.error_fields(), vec!["email"]);

    let short = app.put(&format!("/api/users/{id}"), json!({ "password": "short" })).await;
    assert_eq!(short.status, StatusCode::UNPROCESSABLE_ENTITY);

    let list = app.get("/api/users").await;
    assert_eq!(list.status, StatusCode::OK);
    for user in list.body.as_array().unwrap() {
        assert!(user.get("password").is_none());
    }
}

#[tokio::test]
async fn test_malformed_and_mistyped_bodies() {
    let app = TestApp::new().await;

    let missing = app.post("/api/tags", json!({})).await;
    assert_eq!(missing.status, StatusCode::UNPROCESSABLE_ENTITY);

    let wrong_type = app.post("/api/categories", json!({ "title": "Tops", "slug": "tops", "sort_order": "first" })).await;
    assert_eq!(wrong_type.status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(app.get("/api/tags/999").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.put("/api/tags/999", json!({ "name": "Ghost" })).await.status, StatusCode::NOT_FOUND);
}
