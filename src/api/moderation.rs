/// Moderation API Endpoints
/// Moderator management and report handling
use crate::{
    api::{json_body, required_field},
    auth::{Actor, ModeratorActor, OptionalActor},
    context::AppContext,
    error::{BaskerError, BaskerResult},
    moderation::{
        ModeratorCapability, ModeratorRecord, PermissionBundle, Report, ReportAck, ReportFilter,
        ReportInput, ReportSubject, Resolution, ResolutionAction, ResolveReportInput,
    },
};
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Build moderation API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/moderation/status", get(moderation_status))
        .route("/api/moderation/ozone-config", get(ozone_config))
        // Reports
        .route("/api/moderation/reports", get(list_reports).post(create_report))
        .route("/api/moderation/reports/:id/resolve", post(resolve_report))
        // Moderator management
        .route(
            "/api/moderation/moderators",
            get(list_moderators).post(add_moderator),
        )
        .route("/api/moderation/moderators/:did", delete(remove_moderator))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModerationStatusResponse {
    is_moderator: bool,
    permissions: Option<PermissionBundle>,
}

async fn moderation_status(
    State(ctx): State<AppContext>,
    actor: OptionalActor,
) -> Json<ModerationStatusResponse> {
    let Some(did) = actor.did.as_deref() else {
        return Json(ModerationStatusResponse {
            is_moderator: false,
            permissions: None,
        });
    };

    Json(ModerationStatusResponse {
        is_moderator: ctx.moderation_registry.is_moderator(did).await,
        permissions: ctx.moderation_registry.permissions(did).await,
    })
}

async fn ozone_config(
    State(ctx): State<AppContext>,
    _moderator: ModeratorActor,
) -> Json<serde_json::Value> {
    Json(json!({
        "ozoneUrl": ctx.config.moderation.ozone_url,
        "serviceUrl": ctx.config.moderation.report_service_url,
    }))
}

// ============================================================================
// Reports
// ============================================================================

/// List reports (currently always empty; see ReportBackend::list_reports)
async fn list_reports(
    State(ctx): State<AppContext>,
    moderator: ModeratorActor,
    filter: Result<Query<ReportFilter>, QueryRejection>,
) -> BaskerResult<Json<Vec<Report>>> {
    moderator.require(ModeratorCapability::ReviewReports)?;

    let Query(filter) = filter
        .map_err(|e| BaskerError::Validation(format!("Invalid query: {}", e.body_text())))?;

    Ok(Json(ctx.moderation_registry.reports(&filter).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateReportBody {
    reason_type: Option<String>,
    #[serde(default)]
    reason: Option<String>,
    subject: Option<SubjectBody>,
}

#[derive(Debug, Deserialize)]
struct SubjectBody {
    uri: Option<String>,
    cid: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateReportResponse {
    message: String,
    report: ReportAck,
}

/// File a report with the moderation service on behalf of the caller
async fn create_report(
    State(ctx): State<AppContext>,
    actor: Actor,
    payload: Result<Json<CreateReportBody>, JsonRejection>,
) -> BaskerResult<Json<CreateReportResponse>> {
    let body = json_body(payload)?;

    let reason_type = required_field(body.reason_type, "reasonType")?;
    let subject = body
        .subject
        .ok_or_else(|| BaskerError::Validation("subject is required".to_string()))?;
    let subject = ReportSubject {
        uri: required_field(subject.uri, "subject.uri")?,
        cid: required_field(subject.cid, "subject.cid")?,
    };

    let input = ReportInput {
        reason_type,
        reason: body.reason,
        subject,
    };

    let report = ctx
        .moderation_registry
        .create_report(input, &actor.did)
        .await?;

    Ok(Json(CreateReportResponse {
        message: "Report submitted".to_string(),
        report,
    }))
}

#[derive(Debug, Deserialize)]
struct ResolveReportBody {
    action: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResolveReportResponse {
    message: String,
    result: Resolution,
}

async fn resolve_report(
    State(ctx): State<AppContext>,
    moderator: ModeratorActor,
    Path(report_id): Path<String>,
    payload: Result<Json<ResolveReportBody>, JsonRejection>,
) -> BaskerResult<Json<ResolveReportResponse>> {
    moderator.require(ModeratorCapability::ReviewReports)?;

    let body = json_body(payload)?;
    let action = ResolutionAction::from_str(&required_field(body.action, "action")?)?;

    let result = ctx
        .moderation_registry
        .resolve_report(ResolveReportInput {
            report_id,
            action,
            note: body.note,
            moderator_id: moderator.did,
        })
        .await?;

    Ok(Json(ResolveReportResponse {
        message: format!("Report resolved with action {}", result.action.as_str()),
        result,
    }))
}

// ============================================================================
// Moderator management
// ============================================================================

async fn list_moderators(
    State(ctx): State<AppContext>,
    _moderator: ModeratorActor,
) -> Json<Vec<ModeratorRecord>> {
    Json(ctx.moderation_registry.list_moderators().await)
}

#[derive(Debug, Deserialize)]
struct AddModeratorBody {
    did: Option<String>,
    handle: Option<String>,
    #[serde(default)]
    permissions: PermissionBundle,
}

#[derive(Debug, Serialize)]
struct AddModeratorResponse {
    message: String,
    moderator: ModeratorRecord,
}

async fn add_moderator(
    State(ctx): State<AppContext>,
    moderator: ModeratorActor,
    payload: Result<Json<AddModeratorBody>, JsonRejection>,
) -> BaskerResult<Json<AddModeratorResponse>> {
    let body = json_body(payload)?;
    let did = required_field(body.did, "did")?;
    let handle = required_field(body.handle, "handle")?;

    let record = ctx
        .moderation_registry
        .add_moderator(&did, &handle, body.permissions, &moderator.did)
        .await;

    Ok(Json(AddModeratorResponse {
        message: format!("Moderator {} added", record.did),
        moderator: record,
    }))
}

async fn remove_moderator(
    State(ctx): State<AppContext>,
    _moderator: ModeratorActor,
    Path(did): Path<String>,
) -> BaskerResult<Json<serde_json::Value>> {
    if !ctx.moderation_registry.remove_moderator(&did).await {
        return Err(BaskerError::NotFound(format!("Moderator {}", did)));
    }

    Ok(Json(json!({
        "message": format!("Moderator {} removed", did),
    })))
}
