/// Moderation Registry
use crate::{
    error::{BaskerError, BaskerResult},
    moderation::{
        ModeratorRecord, PermissionBundle, Report, ReportAck, ReportBackend, ReportFilter,
        ReportInput, Resolution, ResolveReportInput,
    },
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Moderator grants plus report forwarding
#[derive(Clone)]
pub struct ModerationRegistry {
    moderators: Arc<RwLock<HashMap<String, ModeratorRecord>>>,
    backend: Arc<dyn ReportBackend>,
}

impl ModerationRegistry {
    /// Create a registry seeded with one moderator holding every capability
    pub fn new(seed_did: &str, seed_handle: &str, backend: Arc<dyn ReportBackend>) -> Self {
        let seed = ModeratorRecord {
            did: seed_did.to_string(),
            handle: seed_handle.to_string(),
            permissions: PermissionBundle::full(),
            added_by: "system".to_string(),
            added_at: Utc::now(),
        };

        let mut moderators = HashMap::new();
        moderators.insert(seed.did.clone(), seed);

        Self {
            moderators: Arc::new(RwLock::new(moderators)),
            backend,
        }
    }

    pub async fn is_moderator(&self, did: &str) -> bool {
        self.moderators.read().await.contains_key(did)
    }

    pub async fn permissions(&self, did: &str) -> Option<PermissionBundle> {
        self.moderators.read().await.get(did).map(|m| m.permissions)
    }

    /// Insert or overwrite a moderator.
    ///
    /// `added_by` is recorded as-is; the caller is responsible for gating.
    pub async fn add_moderator(
        &self,
        did: &str,
        handle: &str,
        permissions: PermissionBundle,
        added_by: &str,
    ) -> ModeratorRecord {
        let record = ModeratorRecord {
            did: did.to_string(),
            handle: handle.to_string(),
            permissions,
            added_by: added_by.to_string(),
            added_at: Utc::now(),
        };

        let previous = self
            .moderators
            .write()
            .await
            .insert(did.to_string(), record.clone());

        if previous.is_some() {
            info!("Moderator {} updated by {}", did, added_by);
        } else {
            info!("Moderator {} ({}) added by {}", did, handle, added_by);
        }

        record
    }

    /// Returns true if a record existed and was removed
    pub async fn remove_moderator(&self, did: &str) -> bool {
        let removed = self.moderators.write().await.remove(did).is_some();
        if removed {
            info!("Moderator {} removed", did);
        }
        removed
    }

    /// All moderators, oldest grant first
    pub async fn list_moderators(&self) -> Vec<ModeratorRecord> {
        let mut moderators: Vec<ModeratorRecord> =
            self.moderators.read().await.values().cloned().collect();
        moderators.sort_by(|a, b| a.added_at.cmp(&b.added_at).then(a.did.cmp(&b.did)));
        moderators
    }

    /// Forward a report to the moderation service
    pub async fn create_report(&self, input: ReportInput, reported_by: &str) -> BaskerResult<ReportAck> {
        self.backend.create_report(&input, reported_by).await
    }

    pub async fn reports(&self, filter: &ReportFilter) -> BaskerResult<Vec<Report>> {
        self.backend.list_reports(filter).await
    }

    /// Authorize and record a moderator's resolution of a report
    pub async fn resolve_report(&self, input: ResolveReportInput) -> BaskerResult<Resolution> {
        // A record with no capabilities does not authorize anything
        let permissions = self
            .permissions(&input.moderator_id)
            .await
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                warn!("Report resolution attempted by non-moderator {}", input.moderator_id);
                BaskerError::NotAuthorized(format!("{} is not a moderator", input.moderator_id))
            })?;

        if let Some(capability) = input.action.required_capability() {
            if !permissions.has(capability) {
                warn!(
                    "Moderator {} lacks {} for action {}",
                    input.moderator_id,
                    capability.as_str(),
                    input.action.as_str()
                );
                return Err(BaskerError::NotAuthorized(format!(
                    "Action {} requires {}",
                    input.action.as_str(),
                    capability.as_str()
                )));
            }
        }

        let resolution = Resolution {
            report_id: input.report_id,
            action: input.action,
            note: input.note,
            resolved_by: input.moderator_id,
            resolved_at: Utc::now(),
        };

        self.backend.resolve_report(&resolution).await?;

        info!(
            "Report {} resolved with {} by {}",
            resolution.report_id,
            resolution.action.as_str(),
            resolution.resolved_by
        );

        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moderation::{NoopReportBackend, ReportSubject, ResolutionAction};
    use async_trait::async_trait;

    const SEED: &str = "did:plc:uw2cz5hnxy2i6jbmh6t2i7hi";

    fn registry() -> ModerationRegistry {
        ModerationRegistry::new(SEED, "basker.bsky.social", Arc::new(NoopReportBackend::new()))
    }

    fn resolve(moderator: &str, action: ResolutionAction) -> ResolveReportInput {
        ResolveReportInput {
            report_id: "42".to_string(),
            action,
            note: None,
            moderator_id: moderator.to_string(),
        }
    }

    fn report_input() -> ReportInput {
        ReportInput {
            reason_type: "com.atproto.moderation.defs#reasonRude".to_string(),
            reason: None,
            subject: ReportSubject {
                uri: "at://did:plc:bob/app.bsky.feed.post/3k".to_string(),
                cid: "bafyreib".to_string(),
            },
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl ReportBackend for FailingBackend {
        async fn create_report(&self, _: &ReportInput, _: &str) -> BaskerResult<ReportAck> {
            Err(BaskerError::Upstream("service unavailable".to_string()))
        }

        async fn list_reports(&self, _: &ReportFilter) -> BaskerResult<Vec<Report>> {
            Ok(Vec::new())
        }

        async fn resolve_report(&self, _: &Resolution) -> BaskerResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_seeded_moderator() {
        let registry = registry();

        assert!(registry.is_moderator(SEED).await);
        assert_eq!(registry.permissions(SEED).await, Some(PermissionBundle::full()));
        assert_eq!(registry.list_moderators().await.len(), 1);
    }

    #[tokio::test]
    async fn test_seeded_moderator_resolves_every_action() {
        let registry = registry();

        for action in [
            ResolutionAction::Approve,
            ResolutionAction::Remove,
            ResolutionAction::Label,
            ResolutionAction::Suspend,
        ] {
            let resolution = registry.resolve_report(resolve(SEED, action)).await.unwrap();
            assert_eq!(resolution.resolved_by, SEED);
            assert_eq!(resolution.action, action);
        }
    }

    #[tokio::test]
    async fn test_unknown_moderator_cannot_resolve() {
        let registry = registry();

        let err = registry
            .resolve_report(resolve("did:plc:stranger", ResolutionAction::Approve))
            .await
            .unwrap_err();
        assert!(matches!(err, BaskerError::NotAuthorized(_)));
    }

    #[tokio::test]
    async fn test_empty_bundle_cannot_resolve() {
        let registry = registry();
        registry
            .add_moderator("did:plc:erin", "erin.bsky.social", PermissionBundle::default(), SEED)
            .await;
        assert!(registry.is_moderator("did:plc:erin").await);

        for action in [ResolutionAction::Approve, ResolutionAction::Remove] {
            let err = registry
                .resolve_report(resolve("did:plc:erin", action))
                .await
                .unwrap_err();
            assert!(matches!(err, BaskerError::NotAuthorized(_)));
        }
    }

    #[tokio::test]
    async fn test_remove_requires_takedown() {
        let registry = registry();
        let reviewer_only = PermissionBundle {
            can_review_reports: true,
            ..PermissionBundle::default()
        };
        registry
            .add_moderator("did:plc:carol", "carol.bsky.social", reviewer_only, SEED)
            .await;

        let err = registry
            .resolve_report(resolve("did:plc:carol", ResolutionAction::Remove))
            .await
            .unwrap_err();
        assert!(matches!(err, BaskerError::NotAuthorized(_)));

        let approved = registry
            .resolve_report(resolve("did:plc:carol", ResolutionAction::Approve))
            .await
            .unwrap();
        assert_eq!(approved.resolved_by, "did:plc:carol");

        let with_takedown = PermissionBundle {
            can_takedown_content: true,
            ..reviewer_only
        };
        registry
            .add_moderator("did:plc:carol", "carol.bsky.social", with_takedown, SEED)
            .await;
        let removed = registry
            .resolve_report(resolve("did:plc:carol", ResolutionAction::Remove))
            .await
            .unwrap();
        assert_eq!(removed.resolved_by, "did:plc:carol");
    }

    #[tokio::test]
    async fn test_add_then_remove_moderator() {
        let registry = registry();
        registry
            .add_moderator("did:plc:dave", "dave.bsky.social", PermissionBundle::full(), SEED)
            .await;
        assert!(registry.is_moderator("did:plc:dave").await);
        assert_eq!(registry.list_moderators().await.len(), 2);

        assert!(registry.remove_moderator("did:plc:dave").await);
        assert!(!registry.is_moderator("did:plc:dave").await);
        assert!(registry.permissions("did:plc:dave").await.is_none());

        assert!(!registry.remove_moderator("did:plc:dave").await);
    }

    #[tokio::test]
    async fn test_readd_overwrites() {
        let registry = registry();
        registry
            .add_moderator("did:plc:erin", "erin.old", PermissionBundle::full(), SEED)
            .await;
        registry
            .add_moderator("did:plc:erin", "erin.new", PermissionBundle::default(), SEED)
            .await;

        let erin: Vec<ModeratorRecord> = registry
            .list_moderators()
            .await
            .into_iter()
            .filter(|m| m.did == "did:plc:erin")
            .collect();
        assert_eq!(erin.len(), 1);
        assert_eq!(erin[0].handle, "erin.new");
        assert!(erin[0].permissions.is_empty());
    }

    #[tokio::test]
    async fn test_create_report_propagates_failure() {
        let registry = ModerationRegistry::new(SEED, "basker.bsky.social", Arc::new(FailingBackend));

        let err = registry
            .create_report(report_input(), "did:plc:alice")
            .await
            .unwrap_err();
        assert!(matches!(err, BaskerError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_reports_are_empty_without_backend_query() {
        let registry = registry();
        registry.create_report(report_input(), "did:plc:alice").await.unwrap();

        let reports = registry.reports(&ReportFilter::default()).await.unwrap();
        assert!(reports.is_empty());
    }
}
