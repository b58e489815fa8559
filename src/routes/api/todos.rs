use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use serde_json::Value;

use crate::{
    db::{dao::RecordId, entities::todo},
    error::AppError,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        todo_service::{TODO_NOT_FOUND, TodoService},
        validation::{validate_create, validate_update},
    },
    state::AppState,
};

const BASE_PATH: &str = "/todos";
const DELETED_MESSAGE: &str = "Todo deleted successfully";

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(BASE_PATH, get(list_todos).post(create_todo))
        .route(
            &format!("{BASE_PATH}/{{id}}"),
            get(show_todo)
                .put(update_todo)
                .patch(update_todo)
                .delete(delete_todo),
        )
        .with_state(state)
}

async fn list_todos(State(state): State<Arc<AppState>>) -> ApiResult<Vec<TodoResponse>> {
    let todos = todo_service_from_state(state.as_ref()).list_all().await?;
    JsonApiResponse::ok(todos.into_iter().map(TodoResponse::from).collect())
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TodoResponse> {
    let payload = json_body(body)?;
    let new_todo = validate_create(&payload)?;
    let todo = todo_service_from_state(state.as_ref())
        .create(new_todo)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, todo.into())
}

async fn show_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<TodoResponse> {
    let id = todo_id(id)?;
    let todo = todo_service_from_state(state.as_ref()).get(id).await?;
    JsonApiResponse::ok(todo.into())
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<RecordId>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TodoResponse> {
    let id = todo_id(id)?;
    let todo_service = todo_service_from_state(state.as_ref());
    // A missing row wins over a bad body.
    todo_service.get(id).await?;
    let payload = json_body(body)?;
    let patch = validate_update(&payload)?;
    let todo = todo_service.update(id, patch).await?;
    JsonApiResponse::ok(todo.into())
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<DeleteResponse> {
    let id = todo_id(id)?;
    todo_service_from_state(state.as_ref()).delete(id).await?;
    JsonApiResponse::ok(DeleteResponse {
        message: DELETED_MESSAGE,
    })
}

// An id that cannot name a row is reported like a missing row.
fn todo_id(id: Result<Path<RecordId>, PathRejection>) -> Result<RecordId, AppError> {
    id.map(|Path(id)| id)
        .map_err(|_| AppError::not_found(TODO_NOT_FOUND))
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| AppError::new(rejection.status(), rejection.body_text()))
}

impl From<todo::Model> for TodoResponse {
    fn from(model: todo::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            is_done: model.is_done,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn todo_service_from_state(state: &AppState) -> TodoService {
    ServiceContext::from_state(state).todo()
}
