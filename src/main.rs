/// Main application entry point
use nasa_explorer::config::AppConfig;
use nasa_explorer::handlers::AppState;
use nasa_explorer::routes::build_router;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");
    if config.uses_demo_key() {
        warn!("NASA_API_KEY not set; falling back to DEMO_KEY, which is heavily rate limited");
    }

    // Wire clients and services
    let state = AppState::from_config(&config)?;

    // Build router
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("nasa_explorer service listening on 0.0.0.0:{}", config.port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
