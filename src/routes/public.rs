use axum::{Router, routing::get};
use serde_json::{Value, json};

use crate::response::{ApiResult, JsonApiResponse};

pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> ApiResult<Value> {
    JsonApiResponse::ok(json!({ "status": "ok" }))
}
