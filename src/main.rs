//! Walletgate application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Connect to Redis
//! 3. Build router with auth routes
//! 4. Apply security headers middleware
//! 5. Start Axum server

use std::sync::Arc;
use tower_http::cors::CorsLayer;
use walletgate::{
    auth::middleware::AppState, auth::session::Sessions, config::Config,
    eligibility::NoopRefresher, middleware::security_headers, routes,
};

#[tokio::main]
async fn main() {
    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!("Starting walletgate on {}", config.bind_addr);

    // Connect to Redis
    let redis_client = redis::Client::open(config.redis_url.as_str()).expect("Invalid Redis URL");

    // Verify Redis connection
    redis_client
        .get_multiplexed_async_connection()
        .await
        .expect("Failed to connect to Redis");

    // Build shared state. The eligibility recomputation workers run out of
    // process; in-process wiring stays a no-op.
    let sessions = Sessions::new(&config.jwt_secret, config.session_ttl_secs);
    let state = AppState {
        redis: redis_client,
        config: Arc::new(config.clone()),
        sessions,
        refresher: Arc::new(NoopRefresher),
    };

    // Explicit CORS: deny all cross-origin requests (single-origin deployment).
    // CorsLayer::new() with no allowed origins rejects all CORS preflight requests.
    let cors = CorsLayer::new();

    let app = routes::api_router()
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state);

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
