use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderName, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::AppState};

pub const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

/// Rejects mutating requests whose `X-CSRF-TOKEN` differs from the configured
/// token. Without a configured token every request passes.
pub async fn csrf_guard(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.csrf.token.as_deref() else {
        return next.run(req).await;
    };

    if !is_mutating(req.method()) {
        return next.run(req).await;
    }

    let supplied = req
        .headers()
        .get(&CSRF_HEADER)
        .and_then(|value| value.to_str().ok());

    if supplied != Some(expected) {
        tracing::warn!(method = %req.method(), uri = %req.uri(), "csrf token mismatch");
        return AppError::token_mismatch().into_response();
    }

    next.run(req).await
}

fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
