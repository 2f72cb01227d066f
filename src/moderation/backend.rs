/// External report backends
///
/// Report storage and enforcement live in the AT Protocol moderation
/// service, not in this process. `ReportBackend` is the seam to it.
use crate::{
    error::{BaskerError, BaskerResult},
    moderation::{Report, ReportAck, ReportFilter, ReportInput, Resolution},
};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, info, warn};

/// Moderation backend trait
///
/// Implementations must:
/// - forward `create_report` to the moderation service and return its acknowledgment
/// - surface any service failure as an error (no retries, no local fallback)
/// - apply `resolve_report` to the service before returning Ok
#[async_trait]
pub trait ReportBackend: Send + Sync {
    /// Submit a report on behalf of `reported_by`
    async fn create_report(&self, input: &ReportInput, reported_by: &str) -> BaskerResult<ReportAck>;

    /// Query reports known to the moderation service
    async fn list_reports(&self, filter: &ReportFilter) -> BaskerResult<Vec<Report>>;

    /// Carry out an already-authorized resolution
    async fn resolve_report(&self, resolution: &Resolution) -> BaskerResult<()>;
}

/// Backend that acknowledges everything and stores nothing
#[derive(Debug, Default)]
pub struct NoopReportBackend {
    next_id: AtomicI64,
}

impl NoopReportBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportBackend for NoopReportBackend {
    async fn create_report(&self, input: &ReportInput, reported_by: &str) -> BaskerResult<ReportAck> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ReportAck {
            id,
            reason_type: input.reason_type.clone(),
            reason: input.reason.clone(),
            subject: input.subject.clone(),
            reported_by: reported_by.to_string(),
            created_at: Utc::now(),
        })
    }

    async fn list_reports(&self, _filter: &ReportFilter) -> BaskerResult<Vec<Report>> {
        Ok(Vec::new())
    }

    async fn resolve_report(&self, _resolution: &Resolution) -> BaskerResult<()> {
        Ok(())
    }
}

/// com.atproto.moderation.createReport input
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateReportBody<'a> {
    reason_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    subject: StrongRefBody<'a>,
}

#[derive(Debug, Serialize)]
struct StrongRefBody<'a> {
    #[serde(rename = "$type")]
    record_type: &'static str,
    uri: &'a str,
    cid: &'a str,
}

/// Subset of the createReport output we keep
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateReportOutput {
    id: i64,
    created_at: chrono::DateTime<Utc>,
}

/// Backend talking to an AT Protocol service over XRPC
pub struct AtprotoReportBackend {
    http_client: reqwest::Client,
    service_url: String,
    access_token: Option<String>,
}

impl AtprotoReportBackend {
    pub fn new(
        http_client: reqwest::Client,
        service_url: impl Into<String>,
        access_token: Option<String>,
    ) -> Self {
        Self {
            http_client,
            service_url: service_url.into().trim_end_matches('/').to_string(),
            access_token,
        }
    }
}

#[async_trait]
impl ReportBackend for AtprotoReportBackend {
    async fn create_report(&self, input: &ReportInput, reported_by: &str) -> BaskerResult<ReportAck> {
        let url = format!("{}/xrpc/com.atproto.moderation.createReport", self.service_url);

        let body = CreateReportBody {
            reason_type: &input.reason_type,
            reason: input.reason.as_deref(),
            subject: StrongRefBody {
                record_type: "com.atproto.repo.strongRef",
                uri: &input.subject.uri,
                cid: &input.subject.cid,
            },
        };

        let mut request = self.http_client.post(&url).json(&body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BaskerError::Upstream(format!("createReport request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("createReport rejected by {}: {} {}", self.service_url, status, text);
            return Err(BaskerError::Upstream(format!(
                "createReport failed with {}: {}",
                status, text
            )));
        }

        let output: CreateReportOutput = response
            .json()
            .await
            .map_err(|e| BaskerError::Upstream(format!("Invalid createReport response: {}", e)))?;

        info!("Report {} created upstream for {}", output.id, input.subject.uri);

        Ok(ReportAck {
            id: output.id,
            reason_type: input.reason_type.clone(),
            reason: input.reason.clone(),
            subject: input.subject.clone(),
            reported_by: reported_by.to_string(),
            created_at: output.created_at,
        })
    }

    async fn list_reports(&self, filter: &ReportFilter) -> BaskerResult<Vec<Report>> {
        // TODO: query tools.ozone.moderation.queryStatuses once an Ozone service credential is configured
        debug!("Report listing not connected to Ozone; filter {:?}", filter);
        Ok(Vec::new())
    }

    async fn resolve_report(&self, resolution: &Resolution) -> BaskerResult<()> {
        // TODO: emit tools.ozone.moderation.emitEvent for the resolution once Ozone is connected
        debug!(
            "Resolution of report {} ({}) recorded locally only",
            resolution.report_id,
            resolution.action.as_str()
        );
        Ok(())
    }
}
