/// Moderator permission bundles and records
use crate::error::{BaskerError, BaskerResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Individual moderator capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModeratorCapability {
    ReviewReports,
    IssueLabels,
    TakedownContent,
    SuspendAccounts,
}

impl ModeratorCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeratorCapability::ReviewReports => "canReviewReports",
            ModeratorCapability::IssueLabels => "canIssueLabels",
            ModeratorCapability::TakedownContent => "canTakedownContent",
            ModeratorCapability::SuspendAccounts => "canSuspendAccounts",
        }
    }
}

/// Fixed set of four independent moderator capabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionBundle {
    pub can_review_reports: bool,
    pub can_issue_labels: bool,
    pub can_takedown_content: bool,
    pub can_suspend_accounts: bool,
}

impl PermissionBundle {
    /// Bundle with every capability set
    pub fn full() -> Self {
        Self {
            can_review_reports: true,
            can_issue_labels: true,
            can_takedown_content: true,
            can_suspend_accounts: true,
        }
    }

    pub fn has(&self, capability: ModeratorCapability) -> bool {
        match capability {
            ModeratorCapability::ReviewReports => self.can_review_reports,
            ModeratorCapability::IssueLabels => self.can_issue_labels,
            ModeratorCapability::TakedownContent => self.can_takedown_content,
            ModeratorCapability::SuspendAccounts => self.can_suspend_accounts,
        }
    }

    /// An empty bundle authorizes nothing, same as having no record
    pub fn is_empty(&self) -> bool {
        !(self.can_review_reports
            || self.can_issue_labels
            || self.can_takedown_content
            || self.can_suspend_accounts)
    }
}

/// A granted moderator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeratorRecord {
    pub did: String,
    pub handle: String,
    pub permissions: PermissionBundle,
    pub added_by: String,
    pub added_at: DateTime<Utc>,
}

/// Actions a moderator can take when resolving a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionAction {
    /// Dismiss the report, leaving content in place
    Approve,
    Remove,
    Label,
    Suspend,
}

impl ResolutionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionAction::Approve => "approve",
            ResolutionAction::Remove => "remove",
            ResolutionAction::Label => "label",
            ResolutionAction::Suspend => "suspend",
        }
    }

    pub fn from_str(s: &str) -> BaskerResult<Self> {
        match s {
            "approve" => Ok(ResolutionAction::Approve),
            "remove" => Ok(ResolutionAction::Remove),
            "label" => Ok(ResolutionAction::Label),
            "suspend" => Ok(ResolutionAction::Suspend),
            _ => Err(BaskerError::Validation(format!("Invalid action: {}", s))),
        }
    }

    /// Capability needed beyond being a moderator, if any
    pub fn required_capability(&self) -> Option<ModeratorCapability> {
        match self {
            ResolutionAction::Approve => None,
            ResolutionAction::Remove => Some(ModeratorCapability::TakedownContent),
            ResolutionAction::Label => Some(ModeratorCapability::IssueLabels),
            ResolutionAction::Suspend => Some(ModeratorCapability::SuspendAccounts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_capabilities() {
        assert_eq!(ResolutionAction::Approve.required_capability(), None);
        assert_eq!(
            ResolutionAction::Remove.required_capability(),
            Some(ModeratorCapability::TakedownContent)
        );
        assert_eq!(
            ResolutionAction::Label.required_capability(),
            Some(ModeratorCapability::IssueLabels)
        );
        assert_eq!(
            ResolutionAction::Suspend.required_capability(),
            Some(ModeratorCapability::SuspendAccounts)
        );
    }

    #[test]
    fn test_bundle_wire_format() {
        let bundle: PermissionBundle =
            serde_json::from_str(r#"{"canReviewReports":true,"canIssueLabels":true}"#).unwrap();
        assert!(bundle.has(ModeratorCapability::ReviewReports));
        assert!(bundle.has(ModeratorCapability::IssueLabels));
        assert!(!bundle.has(ModeratorCapability::TakedownContent));
        assert!(!bundle.is_empty());

        assert!(PermissionBundle::default().is_empty());
        assert!(!PermissionBundle::full().is_empty());
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!(ResolutionAction::from_str("remove").unwrap(), ResolutionAction::Remove);
        assert!(ResolutionAction::from_str("Remove").is_err());
        assert!(ResolutionAction::from_str("ban").is_err());
    }
}
