//! Integration tests for Radarr proxy routes
//!
//! Tests the Radarr-facing API endpoints including:
//! - Cached movie collection, single movie and queue
//! - Add / delete / search forwarded upstream
//! - Independence from the Sonarr configuration

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::util::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arr_proxy::handlers;
use arr_proxy::services::{CacheService, Service};
use arr_proxy::state::AppState;
use arr_proxy::test_utils::*;

/// Helper to create a test router with the API routes
fn create_test_router(state: &AppState) -> Router {
    Router::new()
        .nest("/api", handlers::api_routes())
        .with_state(state.clone())
}

/// Helper to parse JSON response body
async fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: axum::response::Response,
) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn movie_json(id: i32, title: &str, year: i32) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "tmdbId": 500 + id,
        "year": year,
        "monitored": true,
        "hasFile": false,
        "studio": "A24"
    })
}

#[tokio::test]
async fn test_list_movies_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            movie_json(1, "Past Lives", 2023),
            movie_json(2, "Aftersun", 2022)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (state, _receiver) = setup_test_app_state_with_upstreams(None, Some(&server.uri()));
    let app = create_test_router(&state);

    let response = app.clone().oneshot(get("/api/radarr/movies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-cache"], "MISS");

    let response = app.oneshot(get("/api/radarr/movies")).await.unwrap();
    assert_eq!(response.headers()["x-cache"], "HIT");
    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body[0]["title"], "Past Lives");
    assert_eq!(body[1]["studio"], "A24");

    assert!(state
        .cache
        .exists(&CacheService::collection_key(Service::Radarr))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_get_movie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/movie/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movie_json(9, "Heat", 1995)))
        .expect(1)
        .mount(&server)
        .await;

    let (state, _receiver) = setup_test_app_state_with_upstreams(None, Some(&server.uri()));
    let app = create_test_router(&state);

    let response = app.oneshot(get("/api/radarr/movies/9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["year"], 1995);
    assert_eq!(body["tmdbId"], 509);
}

#[tokio::test]
async fn test_queue_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "pageSize": 20,
            "totalRecords": 1,
            "records": [{"id": 5, "title": "Heat.1995.1080p", "status": "downloading", "size": 2048.0, "sizeleft": 512.0}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (state, _receiver) = setup_test_app_state_with_upstreams(None, Some(&server.uri()));
    let app = create_test_router(&state);

    let response = app.clone().oneshot(get("/api/radarr/queue")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["totalRecords"], 1);
    assert_eq!(body["records"][0]["sizeleft"], 512.0);

    let response = app.oneshot(get("/api/radarr/queue")).await.unwrap();
    assert_eq!(response.headers()["x-cache"], "HIT");
}

#[tokio::test]
async fn test_add_movie_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/movie"))
        .and(body_json(json!({"title": "Heat", "tmdbId": 949, "qualityProfileId": 1})))
        .respond_with(ResponseTemplate::new(201).set_body_json(movie_json(10, "Heat", 1995)))
        .expect(1)
        .mount(&server)
        .await;

    let (state, _receiver) = setup_test_app_state_with_upstreams(None, Some(&server.uri()));
    state
        .cache
        .set(&CacheService::collection_key(Service::Radarr), &json!([]), None)
        .await
        .unwrap();
    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/radarr/movies")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"title": "Heat", "tmdbId": 949, "qualityProfileId": 1}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(!state
        .cache
        .exists(&CacheService::collection_key(Service::Radarr))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_delete_movie_defaults_to_keeping_files() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v3/movie/10"))
        .and(query_param("deleteFiles", "false"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (state, _receiver) = setup_test_app_state_with_upstreams(None, Some(&server.uri()));
    state
        .cache
        .set(
            &CacheService::item_key(Service::Radarr, 10),
            &movie_json(10, "Heat", 1995),
            None,
        )
        .await
        .unwrap();
    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/radarr/movies/10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!state
        .cache
        .exists(&CacheService::item_key(Service::Radarr, 10))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_search_movie_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/command"))
        .and(body_json(json!({"name": "MoviesSearch", "movieIds": [10]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 77,
            "name": "MoviesSearch",
            "status": "started"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (state, _receiver) = setup_test_app_state_with_upstreams(None, Some(&server.uri()));
    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/radarr/movies/10/search")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["id"], 77);
}

#[tokio::test]
async fn test_radarr_routes_unaffected_by_missing_sonarr() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/qualityprofile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "HD-1080p", "cutoff": 7}
        ])))
        .mount(&server)
        .await;

    let (state, _receiver) = setup_test_app_state_with_upstreams(None, Some(&server.uri()));
    let app = create_test_router(&state);

    let response = app
        .clone()
        .oneshot(get("/api/radarr/qualityprofiles"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body[0]["name"], "HD-1080p");
    assert_eq!(body[0]["cutoff"], 7);

    let response = app.oneshot(get("/api/sonarr/qualityprofiles")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
