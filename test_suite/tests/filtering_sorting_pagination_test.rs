mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{Value, json};

fn names(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect()
}

fn encode(filter: &Value) -> String {
    filter
        .to_string()
        .replace('%', "%25")
        .replace('"', "%22")
        .replace(' ', "%20")
        .replace('{', "%7B")
        .replace('}', "%7D")
        .replace('[', "%5B")
        .replace(']', "%5D")
        .replace(':', "%3A")
        .replace(',', "%2C")
}

/// Five items across two categories
async fn wardrobe() -> (TestApp, i64, i64) {
    let app = TestApp::new().await;
    let tops = app.create_category("Tops", "tops").await;
    let shoes = app.create_category("Shoes", "shoes").await;
    app.create_item(tops, "White Cotton T-Shirt", json!({ "brand": "H&M", "price": 12.5, "season": "Summer", "color": "White" }))
        .await;
    app.create_item(tops, "Blue Denim Shirt", json!({ "brand": "Levi's", "price": 45, "season": "All Season", "is_favorite": true }))
        .await;
    app.create_item(tops, "Black Polo Shirt", json!({ "brand": "Ralph Lauren", "price": 80, "description": "Pique cotton" }))
        .await;
    app.create_item(shoes, "White Sneakers", json!({ "brand": "Adidas", "price": 95, "is_favorite": true, "color": "White" }))
        .await;
    app.create_item(shoes, "Black Loafers", json!({ "season": "Winter" })).await;
    (app, tops, shoes)
}

#[tokio::test]
async fn test_list_without_parameters_returns_everything() {
    let (app, _, _) = wardrobe().await;

    let response = app.get("/api/clothing-items").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 5);
    assert_eq!(response.content_range(), "clothing-items 0-4/5");
}

#[tokio::test]
async fn test_equality_boolean_and_in_filters() {
    let (app, _, shoes) = wardrobe().await;

    let favorites = app
        .get(&format!("/api/clothing-items?filter={}", encode(&json!({ "is_favorite": true }))))
        .await;
    assert_eq!(names(&favorites.body), vec!["Blue Denim Shirt", "White Sneakers"]);
    assert_eq!(favorites.content_range(), "clothing-items 0-1/2");

    let in_shoes = app
        .get(&format!("/api/clothing-items?filter={}", encode(&json!({ "category_id": [shoes] }))))
        .await;
    assert_eq!(names(&in_shoes.body), vec!["White Sneakers", "Black Loafers"]);

    let summer = app
        .get(&format!("/api/clothing-items?filter={}", encode(&json!({ "season": "summer" }))))
        .await;
    assert_eq!(names(&summer.body), vec!["White Cotton T-Shirt"]);

    let no_brand = app
        .get(&format!("/api/clothing-items?filter={}", encode(&json!({ "brand": null }))))
        .await;
    assert_eq!(names(&no_brand.body), vec!["Black Loafers"]);
}

#[tokio::test]
async fn test_substring_and_search_filters() {
    let (app, _, _) = wardrobe().await;

    let shirts = app
        .get(&format!("/api/clothing-items?filter={}", encode(&json!({ "name": "shirt" }))))
        .await;
    assert_eq!(names(&shirts.body), vec!["White Cotton T-Shirt", "Blue Denim Shirt", "Black Polo Shirt"]);

    let cotton = app
        .get(&format!("/api/clothing-items?filter={}", encode(&json!({ "q": "cotton" }))))
        .await;
    assert_eq!(names(&cotton.body), vec!["White Cotton T-Shirt", "Black Polo Shirt"]);
}

#[tokio::test]
async fn test_range_comparisons() {
    let (app, _, _) = wardrobe().await;

    let mid_price = app
        .get(&format!(
            "/api/clothing-items?filter={}",
            encode(&json!({ "price_gte": 40, "price_lt": 95 }))
        ))
        .await;
    assert_eq!(names(&mid_price.body), vec!["Blue Denim Shirt", "Black Polo Shirt"]);
}

#[tokio::test]
async fn test_unknown_keys_and_invalid_json_are_ignored() {
    let (app, _, _) = wardrobe().await;

    let unknown = app
        .get(&format!("/api/clothing-items?filter={}", encode(&json!({ "password": "x" }))))
        .await;
    assert_eq!(unknown.status, StatusCode::OK);
    assert_eq!(unknown.body.as_array().unwrap().len(), 5);

    let invalid = app.get("/api/clothing-items?filter=%7Bnot-json").await;
    assert_eq!(invalid.status, StatusCode::OK);
    assert_eq!(invalid.body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_sort_forms() {
    let (app, _, _) = wardrobe().await;

    let json_sort = app
        .get(&format!("/api/clothing-items?sort={}", encode(&json!(["price", "DESC"]))))
        .await;
    assert_eq!(names(&json_sort.body)[0], "White Sneakers");

    let sort_by = app.get("/api/clothing-items?sort_by=name&order=asc").await;
    assert_eq!(
        names(&sort_by.body),
        vec!["Black Loafers", "Black Polo Shirt", "Blue Denim Shirt", "White Cotton T-Shirt", "White Sneakers"]
    );

    let bare = app.get("/api/clothing-items?sort=name&order=DESC").await;
    assert_eq!(names(&bare.body)[0], "White Sneakers");

    let unknown = app.get("/api/clothing-items?sort_by=password").await;
    assert_eq!(names(&unknown.body)[0], "White Cotton T-Shirt");
}

#[tokio::test]
async fn test_pagination_forms() {
    let (app, _, _) = wardrobe().await;

    let range = app
        .get(&format!("/api/clothing-items?range={}&sort_by=id", encode(&json!([1, 2]))))
        .await;
    assert_eq!(names(&range.body), vec!["Blue Denim Shirt", "Black Polo Shirt"]);
    assert_eq!(range.content_range(), "clothing-items 1-2/5");

    let page = app.get("/api/clothing-items?page=3&per_page=2").await;
    assert_eq!(names(&page.body), vec!["Black Loafers"]);
    assert_eq!(page.content_range(), "clothing-items 4-4/5");

    let past_end = app.get("/api/clothing-items?page=9&per_page=2").await;
    assert_eq!(past_end.body, json!([]));
    assert_eq!(past_end.content_range(), "clothing-items */5");
}

#[tokio::test]
async fn test_offsets_beyond_the_database_limit_return_an_empty_page() {
    let (app, _, _) = wardrobe().await;

    let page = app.get("/api/tags?page=999999999999999999&per_page=10").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body, json!([]));

    let range = app
        .get(&format!(
            "/api/clothing-items?range={}",
            encode(&json!([9_223_372_036_854_775_808_u64, 9_223_372_036_854_775_809_u64]))
        ))
        .await;
    assert_eq!(range.status, StatusCode::OK);
    assert_eq!(range.body, json!([]));
    assert_eq!(range.content_range(), "clothing-items */5");
}
