//! Registration Service - Entry point.

use registration_service::{
    api::create_router,
    config::{Config, LogFormat},
    RateLimiter, RegistrationService, Registry,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    let subscriber = tracing_subscriber::registry().with(filter);
    match config.log.format {
        LogFormat::Json => subscriber.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => subscriber.with(tracing_subscriber::fmt::layer()).init(),
    }

    info!("Starting Registration Service");

    let limiter = RateLimiter::new(
        config.rate_limit.max_requests(),
        config.rate_limit.window(),
    );
    info!(
        max_requests = config.rate_limit.max_requests(),
        window = ?config.rate_limit.window(),
        "Rate limiting per client address"
    );

    let service = RegistrationService::new(Registry::new(), limiter);
    let app = create_router(service);

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Client addresses are needed for rate limiting
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();

    if let Err(e) = axum::serve(listener, make_service)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Registration Service stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
