use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use mongodb::Client;
use serde_json::Value;
use tower::ServiceExt;

use crate::build_router;
use crate::config::AppConfig;
use crate::handlers::auth::issue_token;
use crate::state::AppState;

const SECRET: &str = "test-secret";

fn config(require_admin_auth: bool) -> AppConfig {
    AppConfig {
        database_url: "mongodb://localhost:27017".to_string(),
        database_name: "rov_league_test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: SECRET.to_string(),
        require_admin_auth,
        admin_username: None,
        admin_password: None,
    }
}

// The driver connects lazily, so none of these requests reach a server.
async fn app(require_admin_auth: bool) -> Router {
    let client = Client::with_uri_str("mongodb://localhost:27017").await.unwrap();
    let db = client.database("rov_league_test");
    build_router(AppState::new(db, config(require_admin_auth)))
}

fn json_request(method: Method, uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn error_message(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    body["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn root_and_health_respond() {
    let app = app(true).await;

    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn writes_without_token_are_rejected() {
    let response = app(true)
        .await
        .oneshot(json_request(Method::POST, "/api/players", r#"{"name":"A","team":"B"}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, "Authentication failed");
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let token = issue_token("id", "admin", "some-other-secret").unwrap();
    let response = app(true)
        .await
        .oneshot(json_request(Method::DELETE, "/api/heroes/abc", "", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_token_reaches_the_handler() {
    let token = issue_token("id", "admin", SECRET).unwrap();
    let response = app(true)
        .await
        .oneshot(json_request(Method::DELETE, "/api/heroes/not-an-id", "", Some(&token)))
        .await
        .unwrap();

    // Past the guard, the id check fails before any database call
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn draw_with_too_few_teams_is_a_bad_request() {
    let body = r#"{"teams":["A","B","C","D"]}"#;
    let response = app(false)
        .await
        .oneshot(json_request(Method::POST, "/api/schedules/generate", body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(response).await.contains("10"));
}

#[tokio::test]
async fn draw_preview_is_returned_without_saving() {
    let teams: Vec<String> = (1..=10).map(|i| format!("\"Team {}\"", i)).collect();
    let body = format!(r#"{{"teams":[{}],"startDate":"2024-03-01"}}"#, teams.join(","));
    let response = app(false)
        .await
        .oneshot(json_request(Method::POST, "/api/schedules/generate", &body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let schedule: Value = serde_json::from_slice(&bytes).unwrap();
    let days = schedule["schedule"].as_array().unwrap();
    assert_eq!(days.len(), 9);
    assert_eq!(days[0]["date"], "2024-03-01");
    assert!(days.iter().all(|d| d["matches"].as_array().unwrap().len() == 5));
}

#[tokio::test]
async fn draw_spacing_out_of_range_is_a_bad_request() {
    let teams: Vec<String> = (1..=10).map(|i| format!("\"Team {}\"", i)).collect();
    for days_between in ["0", "366", "200000000", "4000000000"] {
        let body = format!(
            r#"{{"teams":[{}],"startDate":"2024-03-01","daysBetween":{}}}"#,
            teams.join(","),
            days_between
        );
        let response = app(false)
            .await
            .oneshot(json_request(Method::POST, "/api/schedules/generate", &body, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "daysBetween {}", days_between);
        assert!(error_message(response).await.contains("daysBetween"));
    }
}

#[tokio::test]
async fn fixtures_bulk_rejects_a_bad_item_before_writing() {
    let body = r#"[
        {"matchDay":1,"matchNo":1,"teamBlue":"Alpha","teamRed":"Bravo","scoreBlue":2,"scoreRed":0},
        {"matchDay":1,"teamBlue":"Charlie","teamRed":"Delta"}
    ]"#;
    let response = app(false)
        .await
        .oneshot(json_request(Method::POST, "/api/fixtures/bulk", body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(response).await.starts_with("Fixture 2:"));
}

#[tokio::test]
async fn heroes_bulk_rejects_a_bad_item_before_writing() {
    let body = r#"[
        {"name":"Valhein","imageUrl":"https://cdn.example/valhein.png"},
        {"imageUrl":"https://cdn.example/unknown.png"}
    ]"#;
    let response = app(false)
        .await
        .oneshot(json_request(Method::POST, "/api/heroes/bulk", body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(response).await.starts_with("Hero 2:"));
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let response = app(true)
        .await
        .oneshot(Request::get("/api/players/not-an-id").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fixture_update_needs_numeric_path() {
    let response = app(false)
        .await
        .oneshot(json_request(Method::PATCH, "/api/fixtures/abc/1", r#"{}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn matchup_prediction_needs_both_teams() {
    let response = app(true)
        .await
        .oneshot(
            Request::get("/api/predictions/match?team1=Alpha")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(response).await.contains("team2"));
}

#[tokio::test]
async fn unknown_top_stat_lists_the_choices() {
    let response = app(true)
        .await
        .oneshot(
            Request::get("/api/player-stats/top/charisma")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(response).await.contains("kda"));
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let response = app(true)
        .await
        .oneshot(Request::get("/api/nowhere").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
