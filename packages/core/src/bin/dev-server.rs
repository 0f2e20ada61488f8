//! Development HTTP Server Binary
//!
//! Standalone binary exposing the timeline node contract as a REST API
//! backed by the in-memory store, for frontend integration and manual
//! contract testing.
//!
//! # Usage
//!
//! ```bash
//! # Default settings (port 3400)
//! cargo run --bin dev-server
//!
//! # Custom port
//! DEV_SERVER_PORT=3402 cargo run --bin dev-server
//! ```
//!
//! # Environment Variables
//!
//! - `DEV_SERVER_PORT`: server port (default: 3400)
//! - `RUST_LOG`: logging level (e.g. "info", "debug")
//!
//! # Security
//!
//! DEVELOPMENT ONLY. No authentication beyond the `x-user-id` viewer
//! header, loopback bind, data vanishes on exit.

use std::sync::Arc;

use journey_core::api::{router, AppState};
use journey_core::config::ServerConfig;
use journey_core::services::{HierarchyService, OwnershipPolicy, TimelineNodeService};
use journey_core::{MemoryStore, MemoryUserDirectory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    tracing::info!("Journey dev server starting on {}", config.bind_addr());

    let store = Arc::new(MemoryStore::new());
    let users = Arc::new(MemoryUserDirectory::new());

    let nodes = Arc::new(TimelineNodeService::new(store.clone()));
    let hierarchy = Arc::new(
        HierarchyService::new(store, Arc::new(OwnershipPolicy)).with_user_directory(users),
    );

    let app = router(AppState::new(nodes, hierarchy));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Listening on http://{}", config.bind_addr());
    axum::serve(listener, app).await?;

    Ok(())
}
