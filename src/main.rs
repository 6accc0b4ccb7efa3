#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use axum::Extension;
use axum::extract::DefaultBodyLimit;
use portfolio_server::middleware::rate_limit::{RateLimiter, rate_limit_middleware};
use portfolio_server::{AppCore, api, config::ServerConfig, middleware};
use std::sync::Arc;

// Generous cap for full-document updates; individual uploads are checked
// against the configured file-size limit separately.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() {
    // Initialize tracing logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,portfolio_server=debug".into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting portfolio content server");

    let config = ServerConfig::load().expect("Failed to load configuration");
    let addr = format!("{}:{}", config.host, config.port);

    let cors = middleware::cors::build_cors_layer(&config.allowed_origins);
    let limiter = RateLimiter::new(config.rate_limit_per_minute);

    let core = Arc::new(AppCore::new(config).expect("Failed to initialize application state"));

    let app = api::router(core)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(rate_limit_middleware))
        .layer(Extension(limiter));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Portfolio server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
