use std::sync::Arc;

use axum::{Router, middleware};

use crate::{middleware::csrf_guard, state::AppState};

use super::todos;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(todos::router(state.clone()))
        .route_layer(middleware::from_fn_with_state(state, csrf_guard))
}
