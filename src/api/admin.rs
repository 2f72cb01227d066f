/// Admin API Endpoints
/// Capability status and review of employment verification requests
use crate::{
    admin::{AdminPermission, ReviewDecision, VerificationRequest},
    api::{json_body, required_field},
    auth::{AdminActor, OptionalActor},
    context::AppContext,
    error::{BaskerError, BaskerResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Build admin API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/admin/status", get(admin_status))
        .route("/api/admin/verification-requests", get(list_verification_requests))
        .route(
            "/api/admin/verification-requests/:id",
            get(get_verification_request).put(update_verification_request),
        )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminStatusResponse {
    is_admin: bool,
    permissions: Vec<AdminPermission>,
}

/// Report whether the caller is an admin; never fails
async fn admin_status(
    State(ctx): State<AppContext>,
    actor: OptionalActor,
) -> Json<AdminStatusResponse> {
    let (is_admin, permissions) = match actor.did.as_deref() {
        Some(did) => (
            ctx.admin_gate.is_admin(did),
            ctx.admin_gate.permissions(did).into_iter().collect(),
        ),
        None => (false, Vec::new()),
    };

    Json(AdminStatusResponse {
        is_admin,
        permissions,
    })
}

/// List every verification request in submission order
async fn list_verification_requests(
    State(ctx): State<AppContext>,
    _admin: AdminActor,
) -> Json<Vec<VerificationRequest>> {
    Json(ctx.verification_registry.list().await)
}

async fn get_verification_request(
    State(ctx): State<AppContext>,
    _admin: AdminActor,
    Path(id): Path<String>,
) -> BaskerResult<Json<VerificationRequest>> {
    ctx.verification_registry
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| BaskerError::NotFound(format!("Verification request {} not found", id)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateVerificationBody {
    status: Option<String>,
    #[serde(default)]
    admin_notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateVerificationResponse {
    message: String,
    request: VerificationRequest,
}

/// Approve or reject a verification request
async fn update_verification_request(
    State(ctx): State<AppContext>,
    admin: AdminActor,
    Path(id): Path<String>,
    payload: Result<Json<UpdateVerificationBody>, JsonRejection>,
) -> BaskerResult<Json<UpdateVerificationResponse>> {
    let body = json_body(payload)?;
    let decision = ReviewDecision::from_str(&required_field(body.status, "status")?)?;

    let request = ctx
        .verification_registry
        .update(&id, decision, body.admin_notes, Some(admin.did))
        .await?;

    Ok(Json(UpdateVerificationResponse {
        message: format!("Verification request {}", request.status.as_str()),
        request,
    }))
}
