use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode},
};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
use serde_json::{Value, json};
use tower::ServiceExt;

use todo_app::{
    routes::API_PREFIX,
    test_helpers::{state_for, test_app},
};

fn api_path(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

fn app(db: MockDatabase) -> Router {
    test_app(state_for(db.into_connection()))
}

async fn json_response(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("request should succeed");
    let status = response.status();
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json: Value = serde_json::from_slice(&body).expect("body should be json");
    (status, json)
}

#[tokio::test]
async fn database_failure_on_list_is_a_json_500() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection reset".to_string())]);

    let (status, json) = json_response(
        app(db),
        Request::builder()
            .uri(api_path("/todos"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], 500);
    assert_eq!(
        json["message"],
        "Failed to load todos. Please check the logs for more details"
    );
}

#[tokio::test]
async fn validation_runs_before_the_database_is_touched() {
    // No query results are queued, so any database call would fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres);

    let (status, json) = json_response(
        app(db),
        Request::builder()
            .method("POST")
            .uri(api_path("/todos"))
            .header("content-type", "application/json")
            .body(Body::from(json!({ "title": 42, "is_done": null }).to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json["message"],
        "The title field must be a string. (and 1 more error)"
    );
    assert_eq!(
        json["errors"],
        json!({
            "title": ["The title field must be a string."],
            "is_done": ["The is_done field must be true or false."],
        })
    );
}

#[tokio::test]
async fn wrong_method_is_normalized_to_json() {
    let db = MockDatabase::new(DatabaseBackend::Postgres);

    let (status, json) = json_response(
        app(db),
        Request::builder()
            .method("POST")
            .uri(api_path("/todos/1"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["status"], 405);
}
