use std::net::SocketAddr;

use anyhow::Context;

use todo_app::{
    config::AppConfig, db::connection, logging::init_tracing, routes::build_app, state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        eprintln!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.logging);

    let db = connection::connect(&cfg.database).await?;

    let addr: SocketAddr = format!("{}:{}", cfg.general.host, cfg.general.port)
        .parse()
        .context("invalid host/port")?;
    if cfg.csrf.token.is_none() {
        tracing::warn!("csrf.token is not set; X-CSRF-TOKEN will not be checked");
    }

    let state = AppState::new(cfg, db);
    let app = build_app(state);

    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
