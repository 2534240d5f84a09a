use std::error::Error;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use timetable_server::config::ServerConfig;
use timetable_server::tabular::SourceReader;
use timetable_server::timetable::{IndexCache, Timetable};
use timetable_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;
    info!(
        data_dir = %config.data_dir.display(),
        cache = ?config.cache_path,
        "starting timetable server"
    );

    let timetable = Timetable::new(
        config.data_dir.clone(),
        Arc::new(SourceReader::new()),
        config.cache_path.clone().map(IndexCache::new),
    );

    // Serve the persisted index while the sources are read
    if let Some(schedules) = timetable.warm_start().await {
        info!(schedules, "loaded persisted index");
    }

    if let Err(e) = timetable.regenerate().await {
        error!(error = %e, "initial build failed");
    }

    let app = create_router(AppState::new(timetable));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
