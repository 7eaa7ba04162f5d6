use budget_tracker::api;
use budget_tracker::config::CONFIG;
use budget_tracker::core::services::TrackerService;
use budget_tracker::infrastructure::{
    logging::in_memory::InMemoryLogging, session::in_memory::InMemorySessions, storage::in_memory::InMemoryStorage,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&CONFIG.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!(config = ?*CONFIG, "Budget Tracker API starting up");

    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let sessions = InMemorySessions::new();
    let service = Arc::new(TrackerService::new(storage, logging, sessions, CONFIG.auth_settings()));

    let app = api::router(service, &CONFIG);

    let addr: SocketAddr = format!("{}:{}", CONFIG.host, CONFIG.port).parse()?;
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Budget Tracker API shutting down");
        })
        .await?;

    Ok(())
}
