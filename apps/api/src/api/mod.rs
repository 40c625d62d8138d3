// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::{auction, stream};
pub use state::AppState;

/// Builds the HTTP router over the shared auction state
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(auction::health_check))
        // Auction commands
        .route("/auction/start", post(auction::start_auction))
        .route("/auction/bid", post(auction::place_bid))
        .route("/auction/pass", post(auction::pass))
        .route("/auction/next", post(auction::nominate_next))
        .route("/auction/finalize", post(auction::finalize_sale))
        // Queries
        .route("/auction/state", get(auction::get_state))
        .route("/auction/events", get(stream::stream_events))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
