use std::sync::Arc;

use auction_api::agents::{AiBiddingCoordinator, BidderRegistry};
use auction_api::api::{self, AppState};
use auction_api::config::AppConfig;
use auction_api::domain::auction::AuctionService;
use auction_api::events::EventBus;
use auction_api::infrastructure::roster::JsonPlayerRoster;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration (.env first, then the environment)
    let config = Arc::new(AppConfig::from_env());
    tracing::info!(?config, "Configuration loaded");

    // Wire the auction core
    let auction = Arc::new(AuctionService::new(EventBus::new()));
    let registry = BidderRegistry::new();
    let roster = Arc::new(JsonPlayerRoster::new(config.roster_path.clone()));

    let coordinator = match AiBiddingCoordinator::spawn(
        Arc::clone(&auction),
        registry.clone(),
        config.coordinator.clone(),
    ) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start AI bidding coordinator");
            std::process::exit(1);
        }
    };

    let app = api::router(AppState::new(auction, registry, roster, Arc::clone(&config)));

    // Start server
    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "Failed to bind address");
            std::process::exit(1);
        }
    };
    tracing::info!("Server listening on {}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server failed");
    }

    if let Err(e) = coordinator.shutdown().await {
        tracing::error!(error = %e, "AI bidding coordinator did not shut down cleanly");
    }
    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
