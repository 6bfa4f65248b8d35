//! API integration tests

use chrono::Datelike;
use library_catalog::{api, config::AppConfig, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Start a server with an empty catalog on an ephemeral port
async fn spawn_app(config: AppConfig) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    let app = api::router(AppState::new(config));

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    format!("http://{}", addr)
}

fn sample_book() -> Value {
    json!({
        "id": 0,
        "title": "FastAPI 기초",
        "author": "한승주",
        "description": "test",
        "published_year": 2023
    })
}

#[tokio::test]
async fn test_greeting() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();

    let response = client.get(format!("{}/", base)).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!(["Hello, Library!"]));
}

#[tokio::test]
async fn test_health_and_ready() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();

    let body: Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "healthy");

    client
        .post(format!("{}/books", base))
        .json(&sample_book())
        .send()
        .await
        .unwrap();

    let body: Value = client
        .get(format!("{}/ready", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["books"], 1);
}

#[tokio::test]
async fn test_book_lifecycle() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();

    // Create
    let response = client
        .post(format!("{}/books", base))
        .json(&sample_book())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, sample_book());

    // Duplicate create
    let response = client
        .post(format!("{}/books", base))
        .json(&sample_book())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"message": "Book already exists"}));

    // List
    let response = client.get(format!("{}/books", base)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!([sample_book()]));

    // Get
    let response = client.get(format!("{}/books/0", base)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client.get(format!("{}/books/10", base)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"message": "Book not found"}));

    // Update
    let updated = json!({
        "id": 0,
        "title": "C언어 기초",
        "author": "한승주",
        "description": "test",
        "published_year": 2012
    });
    let response = client
        .put(format!("{}/books/0", base))
        .json(&updated)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get(format!("{}/books/0", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["published_year"], 2012);
    assert_eq!(body["title"], "C언어 기초");

    let response = client
        .put(format!("{}/books/100", base))
        .json(&json!({
            "id": 100,
            "title": "C언어 기초",
            "author": "한승주",
            "description": "test",
            "published_year": 2012
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"message": "Book not found"}));

    // Delete
    let response = client
        .delete(format!("{}/books/0", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!("Book 0 has been deleted."));

    let response = client
        .delete(format!("{}/books/100", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"message": "Book not found"}));
}

#[tokio::test]
async fn test_list_filters() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();

    for book in [
        json!({"id": 1, "title": "FastAPI 기초", "author": "한승주", "published_year": 2023}),
        json!({"id": 2, "title": "C언어 기초", "author": "한승주", "published_year": 2012}),
    ] {
        let response = client
            .post(format!("{}/books", base))
            .json(&book)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let ids = |body: Value| -> Vec<i64> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_i64().unwrap())
            .collect()
    };

    let cases: [(&[(&str, &str)], Vec<i64>); 5] = [
        (&[("author", "한승주")], vec![1, 2]),
        (&[("title", "fastapi")], vec![1]),
        (&[("published_year", "2012")], vec![2]),
        (&[("title", "zz")], vec![]),
        (&[("title", "기초"), ("published_year", "2023")], vec![1]),
    ];

    for (query, expected) in cases {
        let response = client
            .get(format!("{}/books", base))
            .query(query)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ids(response.json().await.unwrap()), expected, "query {:?}", query);
    }
}

#[tokio::test]
async fn test_validation_errors() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();
    let next_year = chrono::Local::now().year() + 1;

    // Future year
    let response = client
        .post(format!("{}/books", base))
        .json(&json!({"id": 1, "title": "T", "author": "A", "published_year": next_year}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["details"][0]["field"], "published_year");

    // Missing required field
    let response = client
        .post(format!("{}/books", base))
        .json(&json!({"id": 1, "title": "T", "published_year": 2000}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["details"][0]["field"], "author");

    // Non-integer path id
    let response = client
        .get(format!("{}/books/abc", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Malformed query parameter
    let response = client
        .get(format!("{}/books?published_year=abc", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["details"][0]["field"], "published_year");

    // Nothing was stored
    let body: Value = client
        .get(format!("{}/books", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_update_id_mismatch() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();

    client
        .post(format!("{}/books", base))
        .json(&sample_book())
        .send()
        .await
        .unwrap();

    let mut moved = sample_book();
    moved["id"] = json!(5);
    let response = client
        .put(format!("{}/books/0", base))
        .json(&moved)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["details"][0]["field"], "id");

    // An absent id is not found even when the body id differs
    let response = client
        .put(format!("{}/books/100", base))
        .json(&sample_book())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"message": "Book not found"}));

    // Permissive mode stores the body under the path id
    let mut config = AppConfig::default();
    config.catalog.strict_update_ids = false;
    let base = spawn_app(config).await;

    client
        .post(format!("{}/books", base))
        .json(&sample_book())
        .send()
        .await
        .unwrap();
    let response = client
        .put(format!("{}/books/0", base))
        .json(&moved)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get(format!("{}/books/0", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["id"], 5);
}

#[tokio::test]
async fn test_openapi_document() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api-docs/openapi.json", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert!(body["paths"]["/books/{id}"].is_object());
}
