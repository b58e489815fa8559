use std::net::SocketAddr;

use axum::{Json, Router, http::StatusCode, routing::get};
use serde_json::json;

use todo_app::test_helpers::{test_app, test_state, test_state_with_csrf};
use todo_client::{
    ClientConfig, ClientError, HttpTodoApi, NewTodo, Severity, TodoApi, TodoClient, messages,
};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });
    addr
}

fn client_for(config: ClientConfig) -> TodoClient<HttpTodoApi> {
    let api = HttpTodoApi::new(&config);
    TodoClient::new(api, &config)
}

#[tokio::test]
async fn client_mirrors_server_state_across_mutations() {
    let state = test_state().await.expect("in-memory state");
    let addr = serve(test_app(state)).await;
    let client = client_for(ClientConfig::new(format!("http://{addr}")));

    assert!(client.mount().await);
    assert!(client.state().todos.is_empty());
    assert!(!client.state().loading);

    assert!(client.create("Buy milk", "").await);
    assert!(client.create("Walk dog", "  twice  ").await);

    let state = client.state();
    let titles: Vec<&str> = state.todos.iter().map(|todo| todo.title.as_str()).collect();
    assert_eq!(titles, ["Walk dog", "Buy milk"]);
    assert_eq!(state.todos[0].description.as_deref(), Some("twice"));
    assert_eq!(
        state.alert.as_ref().map(|alert| alert.message.as_str()),
        Some(messages::CREATED)
    );

    let walk_id = state.todos[0].id;
    assert!(client.toggle(walk_id).await);
    let toggled = client.state();
    assert!(toggled.todos[0].is_done);
    assert_eq!(toggled.todos[0].description.as_deref(), Some("twice"));

    assert!(client.delete(walk_id, &|_: &str| true).await);
    let state = client.state();
    assert_eq!(state.todos.len(), 1);
    assert_eq!(state.todos[0].title, "Buy milk");
    assert_eq!(
        state.alert.map(|alert| alert.severity),
        Some(Severity::Success)
    );

    assert!(!client.delete(walk_id, &|_: &str| true).await);
    assert_eq!(
        client.state().alert.map(|alert| alert.message),
        Some(messages::DELETE_FAILED.to_string())
    );
}

#[tokio::test]
async fn server_validation_message_reaches_the_caller() {
    let state = test_state().await.expect("in-memory state");
    let addr = serve(test_app(state)).await;
    let api = HttpTodoApi::new(&ClientConfig::new(format!("http://{addr}")));

    let err = api
        .create(&NewTodo {
            title: "x".repeat(300),
            description: None,
            is_done: false,
        })
        .await
        .expect_err("title is too long");

    assert!(matches!(err, ClientError::Status { status: 422, .. }));
    assert_eq!(
        err.server_message(),
        Some("The title field must not be greater than 255 characters.")
    );
}

#[tokio::test]
async fn csrf_token_is_sent_on_mutations() {
    let state = test_state_with_csrf("s3cret").await.expect("in-memory state");
    let addr = serve(test_app(state)).await;
    let base_url = format!("http://{addr}");

    let anonymous = client_for(ClientConfig::new(base_url.clone()));
    assert!(anonymous.mount().await);
    assert!(!anonymous.create("Blocked", "").await);
    assert_eq!(
        anonymous.state().alert.map(|alert| alert.message),
        Some("Error creating todo: CSRF token mismatch".to_string())
    );

    let trusted = client_for(ClientConfig::new(base_url).with_csrf_token("s3cret"));
    assert!(trusted.create("Allowed", "").await);
    assert_eq!(trusted.state().todos.len(), 1);
}

#[tokio::test]
async fn accepted_create_with_an_unexpected_body_still_succeeds() {
    let stub = Router::new().route(
        "/api/todos",
        get(|| async { Json(json!([])) })
            .post(|| async { (StatusCode::CREATED, Json(json!({ "ok": true }))) }),
    );
    let addr = serve(stub).await;
    let client = client_for(ClientConfig::new(format!("http://{addr}")));

    assert!(client.create("Buy milk", "").await);

    let state = client.state();
    assert!(!state.loading);
    assert_eq!(
        state.alert.map(|alert| alert.message),
        Some(messages::CREATED.to_string())
    );
}

#[tokio::test]
async fn unreachable_server_raises_the_load_alert() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = client_for(ClientConfig::new(format!("http://{addr}")));

    assert!(!client.mount().await);
    let state = client.state();
    assert!(!state.loading);
    assert_eq!(
        state.alert.map(|alert| alert.message),
        Some(messages::LOAD_FAILED.to_string())
    );
}
