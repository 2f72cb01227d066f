/// Public profile lookup proxy
use crate::{context::AppContext, error::BaskerResult};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/profile/:actor", get(get_profile))
}

/// Fetch a public profile by handle or DID
async fn get_profile(
    State(ctx): State<AppContext>,
    Path(actor): Path<String>,
) -> BaskerResult<Json<serde_json::Value>> {
    Ok(Json(ctx.profile_client.get_profile(&actor).await?))
}
