//! Fixtures shared by unit and integration tests.

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;

use crate::{
    config::{AppConfig, DatabaseConfig},
    db::connection,
    routes::build_app,
    state::AppState,
};

pub const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// Defaults pointed at a private in-memory SQLite database.
pub fn test_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: MEMORY_DATABASE_URL.to_string(),
            max_connections: 1,
            min_idle: 1,
        },
        ..AppConfig::default()
    }
}

pub async fn test_state_with(config: AppConfig) -> anyhow::Result<Arc<AppState>> {
    let db = connection::connect(&config.database).await?;
    Ok(AppState::new(config, db))
}

/// State over a fresh, schema-synced in-memory database.
pub async fn test_state() -> anyhow::Result<Arc<AppState>> {
    test_state_with(test_config()).await
}

pub async fn test_state_with_csrf(token: &str) -> anyhow::Result<Arc<AppState>> {
    let mut config = test_config();
    config.csrf.token = Some(token.to_string());
    test_state_with(config).await
}

/// Wraps an existing connection (e.g. a `MockDatabase`) without touching the schema.
pub fn state_for(db: DatabaseConnection) -> Arc<AppState> {
    AppState::new(test_config(), db)
}

pub fn test_app(state: Arc<AppState>) -> Router {
    build_app(state)
}
