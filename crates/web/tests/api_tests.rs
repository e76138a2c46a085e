use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use storage::dto::resort::CreateResortRequest;
use storage::dto::user::CreateUserRequest;
use storage::models::{CategoryScores, Resort, User};
use storage::services::RankingSettings;
use storage::{MemoryStore, ResortStore};
use tower::ServiceExt;
use web::middleware::auth::ApiKeys;
use web::{AppState, app};

const API_KEY: &str = "test-key";

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), RankingSettings::default());
        let router = app(state, ApiKeys::from_comma_separated(API_KEY));

        Self { router, store }
    }

    async fn resort(&self, name: &str, country: &str, continent: &str) -> Resort {
        self.store
            .create_resort(&CreateResortRequest {
                name: name.to_string(),
                url: None,
                country: country.to_string(),
                continent: Some(continent.to_string()),
                region: None,
                elevation_top_m: None,
                elevation_difference_m: None,
                total_slope_length_km: None,
                number_of_lifts: None,
                number_of_slopes: None,
                annual_snowfall_cm: None,
            })
            .await
            .unwrap()
    }

    async fn user(&self, name: &str) -> User {
        self.store
            .create_user(&CreateUserRequest {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
            })
            .await
            .unwrap()
    }

    async fn rate(&self, resort: &Resort, user: &User, value: f64, times: usize) {
        for _ in 0..times {
            self.store
                .submit_rating(resort.resort_id, user.user_id, uniform(value))
                .await
                .unwrap();
        }
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn post(&self, uri: &str, body: Value, api_key: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = api_key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", key));
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

fn uniform(value: f64) -> CategoryScores {
    CategoryScores {
        terrain: value,
        snow: value,
        lifts: value,
        apres: value,
        family: value,
        value,
        scenery: value,
    }
}

fn rating_body(user: &User, value: f64) -> Value {
    json!({
        "user_id": user.user_id,
        "terrain": value,
        "snow": value,
        "lifts": value,
        "apres": value,
        "family": value,
        "value": value,
        "scenery": value,
    })
}

fn names(entries: &Value) -> Vec<String> {
    entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["resort"]["name"].as_str().unwrap().to_string())
        .collect()
}

/// Global average is (10 + 9 + 5) / 3 = 8 with the default five pseudo-votes.
async fn seeded() -> TestApp {
    let app = TestApp::new();
    let user = app.user("Ana").await;

    let lucky = app.resort("Lucky Peak", "France", "Europe").await;
    let steady = app.resort("Steady Valley", "Switzerland", "Europe").await;
    let weak = app.resort("Weak Hill", "Canada", "North America").await;
    app.resort("Quiet Ridge", "France", "Europe").await;

    app.rate(&lucky, &user, 10.0, 1).await;
    app.rate(&steady, &user, 9.0, 20).await;
    app.rate(&weak, &user, 5.0, 10).await;

    app
}

#[tokio::test]
async fn test_overall_leaderboard_uses_shrinkage() {
    let app = seeded().await;

    let (status, body) = app.get("/api/rankings/overall").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metric"], "overall");
    assert_eq!(body["min_votes"], 5);
    assert_eq!(body["global_average"], 8.0);
    assert_eq!(
        names(&body["entries"]),
        vec!["Steady Valley", "Lucky Peak", "Quiet Ridge", "Weak Hill"]
    );

    let first = &body["entries"][0];
    assert_eq!(first["rank"], 1);
    assert_eq!(first["bucket"], "gold");
    assert_eq!(first["medal"], "🥇");
    assert_eq!(first["review_count"], 20);
    assert!((first["score"].as_f64().unwrap() - 8.8).abs() < 1e-9);

    let unrated = &body["entries"][2];
    assert_eq!(unrated["bucket"], "bronze");
    assert_eq!(unrated["review_count"], 0);
    assert_eq!(unrated["score"], 8.0);

    assert_eq!(body["entries"][3]["bucket"], "rest");
    assert!(body["entries"][3]["medal"].is_null());
}

#[tokio::test]
async fn test_leaderboard_limit_and_country_filter() {
    let app = seeded().await;

    let (status, body) = app.get("/api/rankings/terrain?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entries"].as_array().unwrap().len(), 2);

    let (status, body) = app.get("/api/rankings/overall?country=france").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body["entries"]), vec!["Lucky Peak", "Quiet Ridge"]);
    assert_eq!(body["global_average"], 8.0);
    assert_eq!(body["entries"][0]["rank"], 1);
}

#[tokio::test]
async fn test_leaderboard_rejects_bad_input() {
    let app = seeded().await;

    let (status, body) = app.get("/api/rankings/powder").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Unknown metric"));

    let (status, _) = app.get("/api/rankings/overall?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/rankings/overall?limit=73").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rankings_overview_and_stats() {
    let app = seeded().await;

    let (status, body) = app.get("/api/rankings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall"]["metric"], "overall");
    let categories: Vec<&str> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["metric"].as_str().unwrap())
        .collect();
    assert_eq!(
        categories,
        vec!["terrain", "snow", "lifts", "apres", "family", "value", "scenery"]
    );

    let (status, stats) = app.get("/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["resorts_ranked"], 4);
    assert_eq!(stats["rated_resorts"], 3);
    assert_eq!(stats["total_ratings"], 31);
    assert_eq!(stats["countries"], 3);
    assert_eq!(stats["global_average"], 8.0);
}

#[tokio::test]
async fn test_empty_catalog() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/rankings/overall").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["global_average"], 0.0);
    assert!(body["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_rating_updates_aggregates() {
    let app = TestApp::new();
    let user = app.user("Ben").await;
    let resort = app.resort("Zermatt", "Switzerland", "Europe").await;
    let uri = format!("/api/resorts/{}/ratings", resort.resort_id);

    let (status, body) = app.post(&uri, rating_body(&user, 8.5), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"]["overall"], 8.5);
    assert_eq!(body["resort"]["review_count"], 1);
    assert_eq!(body["resort"]["average_overall_rating"], 8.5);

    let (status, body) = app.post(&uri, rating_body(&user, 6.5), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["resort"]["review_count"], 2);
    assert_eq!(body["resort"]["average_overall_rating"], 7.5);
}

#[tokio::test]
async fn test_submit_rating_validation_and_references() {
    let app = TestApp::new();
    let user = app.user("Cleo").await;
    let resort = app.resort("Verbier", "Switzerland", "Europe").await;
    let uri = format!("/api/resorts/{}/ratings", resort.resort_id);

    let (status, _) = app.post(&uri, rating_body(&user, 7.25), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post(&uri, rating_body(&user, 11.0), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown_resort = format!("/api/resorts/{}/ratings", uuid::Uuid::new_v4());
    let (status, _) = app.post(&unknown_resort, rating_body(&user, 7.0), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut stranger = user.clone();
    stranger.user_id = uuid::Uuid::new_v4();
    let (status, _) = app.post(&uri, rating_body(&stranger, 7.0), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, detail) = app.get(&format!("/api/resorts/{}", resort.resort_id)).await;
    assert_eq!(detail["resort"]["review_count"], 0);
}

#[tokio::test]
async fn test_resort_detail() {
    let app = TestApp::new();
    let user = app.user("Dan").await;
    let resort = app.resort("St. Anton", "Austria", "Europe").await;

    let (status, body) = app.get(&format!("/api/resorts/{}", resort.resort_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["top_category"].is_null());
    assert_eq!(body["category_averages"].as_array().unwrap().len(), 7);
    assert_eq!(body["category_averages"][0]["average"], 0.0);

    let mut scores = rating_body(&user, 6.0);
    scores["apres"] = json!(10.0);
    let uri = format!("/api/resorts/{}/ratings", resort.resort_id);
    let (status, _) = app.post(&uri, scores, None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get(&format!("/api/resorts/{}", resort.resort_id)).await;
    assert_eq!(body["top_category"]["metric"], "apres");
    assert_eq!(body["ratings"][0]["author_name"], "Dan");
    assert_eq!(body["ratings"][0]["apres"], 10.0);

    let (status, _) = app
        .get(&format!("/api/resorts/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resort_catalog_search_and_facets() {
    let app = seeded().await;

    let (status, body) = app.get("/api/resorts?q=%20valley&sort=name_asc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total_items"], 1);
    assert_eq!(body["data"][0]["name"], "Steady Valley");

    let (status, body) = app.get("/api/resorts?continent=europe&min=9").await;
    assert_eq!(status, StatusCode::OK);
    let found: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(found, vec!["Lucky Peak", "Steady Valley"]);
    assert_eq!(body["facets"]["continents"], json!(["Europe", "North America"]));
    assert_eq!(body["facets"]["countries"], json!(["France", "Switzerland"]));

    let (status, body) = app.get("/api/resorts?page_size=2&page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total_items"], 4);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = app.get("/api/resorts?page_size=100").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/resorts/countries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"country": "Canada", "resort_count": 1},
            {"country": "France", "resort_count": 2},
            {"country": "Switzerland", "resort_count": 1},
        ])
    );
}

#[tokio::test]
async fn test_create_resort_requires_api_key() {
    let app = TestApp::new();
    let body = json!({"name": "Niseko", "country": "Japan", "continent": "Asia"});

    let (status, _) = app.post("/api/resorts", body.clone(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.post("/api/resorts", body.clone(), Some("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, created) = app.post("/api/resorts", body.clone(), Some(API_KEY)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["review_count"], 0);
    assert!(created["average_overall_rating"].is_null());

    let (status, _) = app.post("/api/resorts", body, Some(API_KEY)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post("/api/resorts", json!({"name": "", "country": "Japan"}), Some(API_KEY))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_user() {
    let app = TestApp::new();
    let body = json!({"name": "Eve", "email": "eve@example.com"});

    let (status, created) = app.post("/api/users", body.clone(), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Eve");

    let (status, _) = app.post("/api/users", body, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post("/api/users", json!({"name": "Eve", "email": "not-an-email"}), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_recompute() {
    let app = seeded().await;

    let (status, _) = app.post("/api/admin/resorts/recompute", json!({}), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .post("/api/admin/resorts/recompute", json!({}), Some(API_KEY))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resorts_updated"], 4);
}
