use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use bookmood_api::{
    config::{AttributePolicy, Config},
    models::{BookRow, MoodTag},
    routes::{create_router, AppState},
    services::InMemoryCatalog,
};

fn tag(id: i64, name: &str) -> MoodTag {
    MoodTag {
        id,
        name: name.to_string(),
    }
}

fn book(id: i64, title: &str, pace: i32, complexity: i32, tags: Vec<i64>, rating: f64) -> BookRow {
    BookRow {
        id,
        title: title.to_string(),
        author: "Test Author".to_string(),
        pace,
        complexity,
        emotional_intensity: 3,
        page_count: Some(250),
        mood_tag_ids: tags,
        average_rating: rating,
    }
}

fn sample_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(
        vec![
            book(1, "Quick Cozy Mystery", 5, 1, vec![2, 3], 4.5),
            book(2, "Dense Treatise", 1, 5, vec![], 0.0),
            book(3, "Light Adventure", 4, 2, vec![1], 3.5),
            book(4, "Weighty Epic", 2, 4, vec![1], 4.8),
        ],
        vec![tag(1, "adventurous"), tag(2, "calm"), tag(3, "mysterious")],
    )
}

fn create_test_server_with(catalog: InMemoryCatalog, config: Config) -> TestServer {
    let state = Arc::new(AppState::new(Arc::new(catalog), config));
    TestServer::new(create_router(state)).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(sample_catalog(), Config::default())
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_recommendations_for_tired_reader() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "energy_level": "low",
            "time_available": 15,
            "selected_tag_ids": [3]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let recs = body["recommendations"].as_array().unwrap();

    assert_eq!(recs[0]["book_id"], 1);
    assert_eq!(recs[0]["title"], "Quick Cozy Mystery");
    let reasons: Vec<&str> = recs[0]["match_reasons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_str().unwrap())
        .collect();
    assert_eq!(
        reasons,
        vec![
            "fast pace suits a short session",
            "low complexity suits a tired state",
            "matches selected moods: mysterious",
            "highly rated (4.5/5)",
        ]
    );

    // The slow, demanding, unrated book never clears the threshold here
    assert!(recs.iter().all(|r| r["book_id"] != 2));

    let scores: Vec<f64> = recs
        .iter()
        .map(|r| r["relevance_score"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert!(scores.iter().all(|s| *s > 0.3 && *s <= 1.0));
}

#[tokio::test]
async fn test_context_echo_uses_request_field_names() {
    let server = create_test_server();

    let request = json!({
        "energy_level": "high",
        "time_available": 90,
        "selected_tag_ids": [3, 1]
    });
    let response = server.post("/api/v1/recommendations").json(&request).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["context"]["selected_tag_ids"], json!([1, 3]));
    assert_eq!(body["context"]["time_available"], 90);
    assert!(body["context"].get("mood_tag_ids").is_none());
}

#[tokio::test]
async fn test_recommendations_respect_max() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "energy_level": "medium",
            "time_available": 60,
            "max_recommendations": 1
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 1);
    assert_eq!(body["context"]["energy_level"], "medium");
}

#[tokio::test]
async fn test_recommendations_reject_max_over_limit() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "energy_level": "high",
            "time_available": 120,
            "max_recommendations": 500
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("at most 50"));
}

#[tokio::test]
async fn test_unknown_energy_and_time_fall_back() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "energy_level": "sleepy",
            "time_available": 45
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["context"]["energy_level"], "medium");
    assert!(!body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_catalog_returns_empty_list() {
    let server = create_test_server_with(InMemoryCatalog::default(), Config::default());

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "energy_level": "low",
            "time_available": 30
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reject_policy_surfaces_invalid_attribute() {
    let catalog = InMemoryCatalog::new(vec![book(9, "Broken", 8, 3, vec![], 3.0)], vec![]);
    let config = Config {
        attribute_policy: AttributePolicy::Reject,
        ..Config::default()
    };
    let server = create_test_server_with(catalog, config);

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "energy_level": "low",
            "time_available": 30
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_catalog_statistics() {
    let server = create_test_server();

    let response = server.get("/api/v1/catalog/statistics").await;
    response.assert_status_ok();

    let stats: Value = response.json();
    assert_eq!(stats["total_books"], 4);
    assert_eq!(stats["avg_pace"], 3.0);
    assert_eq!(stats["avg_complexity"], 3.0);
    assert_eq!(stats["pace_distribution"]["5"], 1);
}

#[tokio::test]
async fn test_catalog_statistics_empty_catalog() {
    let server = create_test_server_with(InMemoryCatalog::default(), Config::default());
    let response = server.get("/api/v1/catalog/statistics").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mood_tags() {
    let server = create_test_server();
    let response = server.get("/api/v1/mood-tags").await;
    response.assert_status_ok();

    let tags: Vec<MoodTag> = response.json();
    assert_eq!(tags.len(), 3);
    assert_eq!(tags[0].name, "adventurous");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-42"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-request-id"), "trace-42");
}
