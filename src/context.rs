/// Application context and dependency injection
use crate::{
    admin::{AdminGate, ReviewPolicy, VerificationRegistry},
    config::ServerConfig,
    error::BaskerResult,
    identity::{build_http_client, ProfileClient},
    moderation::{AtprotoReportBackend, ModerationRegistry, ReportBackend},
    rate_limit::{RateLimitConfig, RateLimiter},
};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub admin_gate: Arc<AdminGate>,
    pub verification_registry: Arc<VerificationRegistry>,
    pub moderation_registry: Arc<ModerationRegistry>,
    pub profile_client: Arc<ProfileClient>,
    pub rate_limiter: Option<Arc<RateLimiter>>,
}

impl AppContext {
    /// Create a new application context reporting to the configured AT Protocol service
    pub fn new(config: ServerConfig) -> BaskerResult<Self> {
        let http_client = build_http_client(config.upstream.timeout_secs)?;
        let backend = Arc::new(AtprotoReportBackend::new(
            http_client,
            config.moderation.report_service_url.clone(),
            config.moderation.report_access_token.clone(),
        ));

        Self::with_report_backend(config, backend)
    }

    /// Create a context around a specific report backend
    pub fn with_report_backend(
        config: ServerConfig,
        backend: Arc<dyn ReportBackend>,
    ) -> BaskerResult<Self> {
        // Validate configuration
        config.validate()?;

        let admin_gate = Arc::new(AdminGate::new(config.admin.admin_dids.iter().cloned()));

        let verification_registry = Arc::new(VerificationRegistry::new(ReviewPolicy {
            allow_retransition: config.admin.allow_review_retransition,
        }));

        let moderation_registry = Arc::new(ModerationRegistry::new(
            &config.moderation.seed_moderator_did,
            &config.moderation.seed_moderator_handle,
            backend,
        ));

        let http_client = build_http_client(config.upstream.timeout_secs)?;
        let profile_client = Arc::new(ProfileClient::new(
            http_client,
            config.upstream.appview_url.clone(),
        ));

        let rate_limiter = if config.rate_limit.enabled {
            tracing::info!(
                "Rate limiting enabled at {} req/s",
                config.rate_limit.requests_per_second
            );
            Some(Arc::new(RateLimiter::new(RateLimitConfig::from_rps(
                config.rate_limit.requests_per_second,
            ))))
        } else {
            tracing::info!("Rate limiting disabled");
            None
        };

        Ok(Self {
            config: Arc::new(config),
            admin_gate,
            verification_registry,
            moderation_registry,
            profile_client,
            rate_limiter,
        })
    }

    /// Get bind address
    pub fn bind_address(&self) -> String {
        format!(
            "{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
