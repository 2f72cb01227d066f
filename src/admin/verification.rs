/// Employment Verification Request Registry
use crate::error::{BaskerError, BaskerResult};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

const ID_SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 8;

/// Verification request lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, VerificationStatus::Pending)
    }
}

/// Outcome an admin may record on a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub fn from_str(s: &str) -> BaskerResult<Self> {
        match s {
            "approved" => Ok(ReviewDecision::Approved),
            "rejected" => Ok(ReviewDecision::Rejected),
            _ => Err(BaskerError::Validation(format!(
                "Invalid status: {} (expected approved or rejected)",
                s
            ))),
        }
    }
}

impl From<ReviewDecision> for VerificationStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => VerificationStatus::Approved,
            ReviewDecision::Rejected => VerificationStatus::Rejected,
        }
    }
}

/// A user's claim of employment awaiting admin confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub id: String,
    pub user_id: String,
    pub company_id: String,
    pub evidence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,
    pub status: VerificationStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Fields supplied by the submitting user
#[derive(Debug, Clone)]
pub struct NewVerificationRequest {
    pub user_id: String,
    pub company_id: String,
    pub evidence: String,
    pub documents: Option<Vec<String>>,
}

/// Policy for reviewing requests that already reached a terminal state
#[derive(Debug, Clone, Copy)]
pub struct ReviewPolicy {
    pub allow_retransition: bool,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            allow_retransition: true,
        }
    }
}

/// In-memory registry of verification requests, in submission order
#[derive(Clone)]
pub struct VerificationRegistry {
    requests: Arc<RwLock<Vec<VerificationRequest>>>,
    policy: ReviewPolicy,
}

impl VerificationRegistry {
    pub fn new(policy: ReviewPolicy) -> Self {
        Self {
            requests: Arc::new(RwLock::new(Vec::new())),
            policy,
        }
    }

    /// Store a new request in the `pending` state.
    ///
    /// Required fields are checked by the route layer, not here.
    pub async fn submit(&self, new: NewVerificationRequest) -> VerificationRequest {
        let mut requests = self.requests.write().await;

        let mut id = generate_request_id();
        while requests.iter().any(|r| r.id == id) {
            id = generate_request_id();
        }

        let request = VerificationRequest {
            id,
            user_id: new.user_id,
            company_id: new.company_id,
            evidence: new.evidence,
            documents: new.documents,
            status: VerificationStatus::Pending,
            submitted_at: Utc::now(),
            admin_notes: None,
            reviewed_by: None,
            reviewed_at: None,
        };

        requests.push(request.clone());

        info!(
            "Verification request {} submitted by {} for {}",
            request.id, request.user_id, request.company_id
        );

        request
    }

    /// All requests in insertion order
    pub async fn list(&self) -> Vec<VerificationRequest> {
        self.requests.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<VerificationRequest> {
        self.requests.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Record an admin decision on a request.
    ///
    /// Callers must have confirmed the `verify_work` capability first.
    pub async fn update(
        &self,
        id: &str,
        decision: ReviewDecision,
        admin_notes: Option<String>,
        reviewer: Option<String>,
    ) -> BaskerResult<VerificationRequest> {
        let mut requests = self.requests.write().await;

        let request = requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| BaskerError::NotFound(format!("Verification request {}", id)))?;

        if request.status.is_terminal() && !self.policy.allow_retransition {
            return Err(BaskerError::Conflict(format!(
                "Verification request {} is already {}",
                id,
                request.status.as_str()
            )));
        }

        if request.status.is_terminal() {
            debug!(
                "Re-reviewing verification request {} (was {})",
                id,
                request.status.as_str()
            );
        }

        request.status = decision.into();
        request.admin_notes = admin_notes;
        request.reviewed_by = reviewer;
        request.reviewed_at = Some(Utc::now());

        info!(
            "Verification request {} marked {} by {}",
            id,
            request.status.as_str(),
            request.reviewed_by.as_deref().unwrap_or("unknown")
        );

        Ok(request.clone())
    }
}

/// `<millis in base36>-<random suffix>`
fn generate_request_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_SUFFIX_CHARSET[rng.gen_range(0..ID_SUFFIX_CHARSET.len())] as char)
        .collect();

    format!("{}-{}", to_base36(millis), suffix)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
