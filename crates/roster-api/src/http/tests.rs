//! End-to-end tests driving the router in-process against a temp SQLite file.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use roster_infra::random::RandomPicker;
use roster_infra::sqlite::pool::{DatabasePool, default_database_url};
use roster_types::config::RosterConfig;

use crate::http::router::build_router;
use crate::state::AppState;

async fn app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let pool = DatabasePool::new(&default_database_url(dir.path()))
        .await
        .unwrap();
    let state = AppState::from_parts(
        pool,
        RandomPicker::seeded(11),
        RosterConfig::default(),
        dir.path().to_path_buf(),
    );
    (build_router(state), dir)
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send_raw(app, "POST", uri, Body::from(body.to_string())).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send_raw(app, "GET", uri, Body::empty()).await
}

async fn seed_team(app: &Router) {
    let (status, _) = post(
        app,
        "/team/add",
        json!({
            "team_name": "alpha",
            "members": [
                {"user_id": "u1", "username": "Alice", "is_active": true},
                {"user_id": "u2", "username": "Bob", "is_active": true},
                {"user_id": "u3", "username": "Carol", "is_active": true}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap()
}

#[tokio::test]
async fn test_health_reports_ok() {
    let (app, _dir) = app().await;
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_team_add_and_get() {
    let (app, _dir) = app().await;
    seed_team(&app).await;

    let (status, body) = get(&app, "/team/get?team_name=alpha").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["team_name"], "alpha");
    let names: Vec<&str> = body["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
}

#[tokio::test]
async fn test_team_add_twice_is_team_exists() {
    let (app, _dir) = app().await;
    seed_team(&app).await;

    let (status, body) =
        post(&app, "/team/add", json!({"team_name": "alpha", "members": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "TEAM_EXISTS");
}

#[tokio::test]
async fn test_unknown_team_is_not_found() {
    let (app, _dir) = app().await;
    let (status, body) = get(&app, "/team/get?team_name=ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn test_missing_query_is_invalid_input() {
    let (app, _dir) = app().await;
    let (status, body) = get(&app, "/team/get").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn test_malformed_json_is_invalid_input() {
    let (app, _dir) = app().await;
    let (status, body) = send_raw(&app, "POST", "/team/add", Body::from("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn test_pull_request_lifecycle() {
    let (app, _dir) = app().await;
    seed_team(&app).await;

    let (status, body) = post(
        &app,
        "/pullRequest/create",
        json!({"pull_request_id": "pr-1", "pull_request_name": "Add search", "author_id": "u1"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let pr = &body["pr"];
    assert_eq!(pr["status"], "OPEN");
    assert!(pr.get("mergedAt").is_none());
    let reviewers: Vec<String> = pr["assigned_reviewers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_str().unwrap().to_string())
        .collect();
    assert_eq!(reviewers.len(), 2);
    assert!(!reviewers.contains(&"u1".to_string()));

    let (status, body) = get(&app, &format!("/users/getReview?user_id={}", reviewers[0])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], reviewers[0].as_str());
    assert_eq!(body["pull_requests"][0]["pull_request_id"], "pr-1");

    let (status, first) =
        post(&app, "/pullRequest/merge", json!({"pull_request_id": "pr-1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["pr"]["status"], "MERGED");
    let (status, second) =
        post(&app, "/pullRequest/merge", json!({"pull_request_id": "pr-1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["pr"]["mergedAt"], second["pr"]["mergedAt"]);

    let (status, body) = post(
        &app,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": reviewers[0]}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "PR_MERGED");
}

#[tokio::test]
async fn test_duplicate_pull_request_conflicts() {
    let (app, _dir) = app().await;
    seed_team(&app).await;
    let body = json!({"pull_request_id": "pr-1", "pull_request_name": "x", "author_id": "u1"});

    let (status, _) = post(&app, "/pullRequest/create", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, err) = post(&app, "/pullRequest/create", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&err), "PR_EXISTS");
}

#[tokio::test]
async fn test_reassign_replaces_reviewer() {
    let (app, _dir) = app().await;
    post(
        &app,
        "/team/add",
        json!({
            "team_name": "alpha",
            "members": [
                {"user_id": "u1", "username": "Alice", "is_active": true},
                {"user_id": "u2", "username": "Bob", "is_active": true},
                {"user_id": "u3", "username": "Carol", "is_active": true},
                {"user_id": "u4", "username": "Dan", "is_active": true}
            ]
        }),
    )
    .await;
    let (_, created) = post(
        &app,
        "/pullRequest/create",
        json!({"pull_request_id": "pr-1", "pull_request_name": "x", "author_id": "u1"}),
    )
    .await;
    let before: Vec<Value> = created["pr"]["assigned_reviewers"].as_array().unwrap().clone();
    let old = before[0].as_str().unwrap();

    let (status, body) = post(
        &app,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": old}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let replaced_by = body["replaced_by"].as_str().unwrap();
    assert_ne!(replaced_by, old);
    assert_ne!(replaced_by, "u1");
    assert!(!before.contains(&json!(replaced_by)));
    assert_eq!(body["pr"]["assigned_reviewers"][0], replaced_by);
    assert_eq!(body["pr"]["assigned_reviewers"][1], before[1]);
}

#[tokio::test]
async fn test_reassign_errors() {
    let (app, _dir) = app().await;
    seed_team(&app).await;
    post(
        &app,
        "/pullRequest/create",
        json!({"pull_request_id": "pr-1", "pull_request_name": "x", "author_id": "u1"}),
    )
    .await;

    // Both teammates are assigned, so nobody is left to swap in.
    let (status, body) = post(
        &app,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": "u2"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "NO_CANDIDATE");

    let (status, body) = post(
        &app,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": "u1"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "NOT_ASSIGNED");

    let (status, body) = post(
        &app,
        "/pullRequest/reassign",
        json!({"pull_request_id": "nope", "old_user_id": "u2"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn test_set_is_active_and_versioned_prefix() {
    let (app, _dir) = app().await;
    seed_team(&app).await;

    let (status, body) = post(
        &app,
        "/api/v1/users/setIsActive",
        json!({"user_id": "u2", "is_active": false}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["user_id"], "u2");
    assert_eq!(body["user"]["is_active"], false);
    assert_eq!(body["user"]["team_name"], "alpha");

    let (status, body) = post(
        &app,
        "/users/setIsActive",
        json!({"user_id": "ghost", "is_active": true}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}
