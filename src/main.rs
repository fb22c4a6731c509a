//! Pocket Watch - A state-managed HTTP server for a persistent stopwatch counter
//!
//! This is the main entry point for the pocket-watch application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pocket_watch::{
    config::Config,
    state::AppState,
    store::{FileStore, KvStore, MemoryStore},
    api::create_router,
    tasks::ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pocket_watch={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pocket-watch server v1.2.0");
    info!("Configuration: host={}, port={}, store={}",
          config.host, config.port,
          if config.ephemeral { "memory".to_string() } else { config.store.display().to_string() });

    // Open the persistence backend
    let store: Arc<dyn KvStore> = if config.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::open(&config.store))
    };

    // Create application state, restoring the persisted counter
    let state = Arc::new(AppState::new(store, config.port, config.host.clone()));

    // Start the ticker background task
    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        ticker_task(ticker_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /play   - Start the counter");
    info!("  POST /pause  - Pause the counter");
    info!("  POST /reset  - Reset the counter to zero");
    info!("  GET  /status - Check counter state and display");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
