/// Basker API server entry point
use basker::{config::ServerConfig, context::AppContext, error::BaskerResult, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> BaskerResult<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Basker API v{}", env!("CARGO_PKG_VERSION"));

    // Create application context
    let ctx = AppContext::new(config)?;

    if !ctx.config.admin.allow_review_retransition {
        tracing::info!("Reviewed verification requests are final");
    }

    // Start server
    server::serve(ctx).await?;

    Ok(())
}
