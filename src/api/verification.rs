/// Verification request submission (open to any caller)
use crate::{
    admin::{NewVerificationRequest, VerificationRequest},
    api::{json_body, required_field},
    context::AppContext,
    error::BaskerResult,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/verification-requests", post(submit_verification_request))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitVerificationBody {
    user_id: Option<String>,
    company_id: Option<String>,
    evidence: Option<String>,
    #[serde(default)]
    documents: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct SubmitVerificationResponse {
    message: String,
    request: VerificationRequest,
}

async fn submit_verification_request(
    State(ctx): State<AppContext>,
    payload: Result<Json<SubmitVerificationBody>, JsonRejection>,
) -> BaskerResult<Json<SubmitVerificationResponse>> {
    let body = json_body(payload)?;

    // All fields are checked before anything is stored
    let new = NewVerificationRequest {
        user_id: required_field(body.user_id, "userId")?,
        company_id: required_field(body.company_id, "companyId")?,
        evidence: required_field(body.evidence, "evidence")?,
        documents: body.documents,
    };

    let request = ctx.verification_registry.submit(new).await;

    Ok(Json(SubmitVerificationResponse {
        message: "Verification request submitted".to_string(),
        request,
    }))
}
