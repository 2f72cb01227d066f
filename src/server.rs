/// HTTP server setup and routing
use crate::{
    auth::ACTOR_HEADER,
    context::AppContext,
    error::{BaskerError, BaskerResult},
    rate_limit::rate_limit_middleware,
};
use axum::{
    http::{header, HeaderName, Method, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use std::{net::SocketAddr, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// How often fully refilled rate-limit buckets are dropped
const RATE_LIMIT_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Build the main application router
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(ACTOR_HEADER)]);

    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .fallback(not_found)
        .with_state(ctx.clone())
        .layer(middleware::from_fn_with_state(ctx, rate_limit_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "NotFound",
            "message": "Endpoint not found"
        })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> BaskerResult<()> {
    let addr = ctx.bind_address();

    info!("Basker API listening on {}", addr);
    info!("   Admins: {}", ctx.config.admin.admin_dids.join(", "));
    info!("   Report service: {}", ctx.config.moderation.report_service_url);

    if let Some(limiter) = ctx.rate_limiter.clone() {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(RATE_LIMIT_PRUNE_INTERVAL);
            loop {
                interval.tick().await;
                limiter.retain_recent();
            }
        });
    }

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BaskerError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| BaskerError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
