/// Moderation System
///
/// Moderator grants are held in process; reports themselves belong to the
/// AT Protocol moderation service and are reached through a `ReportBackend`.

pub mod backend;
pub mod permissions;
pub mod registry;

pub use backend::{AtprotoReportBackend, NoopReportBackend, ReportBackend};
pub use permissions::{ModeratorCapability, ModeratorRecord, PermissionBundle, ResolutionAction};
pub use registry::ModerationRegistry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reported content, identified by record URI and content hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSubject {
    pub uri: String,
    pub cid: String,
}

/// A report to be filed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    /// e.g. `com.atproto.moderation.defs#reasonSpam`
    pub reason_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub subject: ReportSubject,
}

/// Acknowledgment returned by the moderation service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAck {
    pub id: i64,
    pub reason_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub subject: ReportSubject,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
}

/// A report as known to the moderation service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub reason_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub subject: ReportSubject,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Report query filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    pub status: Option<String>,
    pub limit: Option<u32>,
}

/// A moderator's request to act on a report
#[derive(Debug, Clone)]
pub struct ResolveReportInput {
    pub report_id: String,
    pub action: ResolutionAction,
    pub note: Option<String>,
    pub moderator_id: String,
}

/// Recorded outcome of acting on a report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub report_id: String,
    pub action: ResolutionAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub resolved_by: String,
    pub resolved_at: DateTime<Utc>,
}
