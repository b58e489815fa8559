use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{error::AppError, services::validation::ValidationErrors};

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

/// Successful JSON payload; the body is `data` itself.
#[derive(Debug)]
pub struct JsonApiResponse<T: Serialize> {
    pub status: StatusCode,
    pub data: T,
}

impl<T: Serialize> JsonApiResponse<T> {
    pub fn ok(data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::OK, data)
    }

    pub fn with_status(status: StatusCode, data: T) -> ApiResult<T> {
        Ok(Self { status, data })
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.data)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a ValidationErrors>,
}

impl<'a> ErrorBody<'a> {
    pub fn from_error(err: &'a AppError) -> Self {
        Self {
            status: err.status().as_u16(),
            message: err.message(),
            errors: err.field_errors(),
        }
    }
}

pub fn error_response(err: &AppError) -> Response {
    (err.status(), Json(ErrorBody::from_error(err))).into_response()
}

pub fn log_app_error(err: &AppError, status: StatusCode) {
    tracing::error!(status = status.as_u16(), error = %err, "request failed");
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log_app_error(&self, status);
        }
        error_response(&self)
    }
}

#[cfg(test)]
mod tests {
    use axum::{body, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use super::JsonApiResponse;
    use crate::{error::AppError, services::validation::ValidationErrors};

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be json")
    }

    #[tokio::test]
    async fn success_body_is_bare_data() {
        let response = JsonApiResponse::with_status(StatusCode::CREATED, json!({ "id": 1 }))
            .expect("always ok")
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await, json!({ "id": 1 }));
    }

    #[tokio::test]
    async fn not_found_omits_field_errors() {
        let response = AppError::not_found("Todo not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "status": 404, "message": "Todo not found" })
        );
    }

    #[tokio::test]
    async fn validation_error_carries_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "The title field is required.");
        errors.add("is_done", "The is_done field must be true or false.");

        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({
                "status": 422,
                "message": "The title field is required. (and 1 more error)",
                "errors": {
                    "title": ["The title field is required."],
                    "is_done": ["The is_done field must be true or false."],
                },
            })
        );
    }
}
