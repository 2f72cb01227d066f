/// Configuration management for the Basker API server
use crate::error::{BaskerError, BaskerResult};
use serde::{Deserialize, Serialize};
use std::env;

/// DID of the operator account that is both the default admin and the seeded moderator
pub const DEFAULT_OPERATOR_DID: &str = "did:plc:uw2cz5hnxy2i6jbmh6t2i7hi";

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub admin: AdminConfig,
    pub moderation: ModerationConfig,
    pub upstream: UpstreamConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Admin subsystem configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Static admin identifier set, fixed for the process lifetime
    pub admin_dids: Vec<String>,
    /// Whether approved/rejected requests may be reviewed again
    pub allow_review_retransition: bool,
}

/// Moderation subsystem configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    pub seed_moderator_did: String,
    pub seed_moderator_handle: String,
    /// Ozone console URL surfaced to moderators
    pub ozone_url: String,
    /// Service receiving com.atproto.moderation.createReport
    pub report_service_url: String,
    pub report_access_token: Option<String>,
}

/// External AT Protocol services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// AppView used for public profile lookups
    pub appview_url: String,
    /// None leaves upstream calls without a deadline
    pub timeout_secs: Option<u64>,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_second: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                hostname: "0.0.0.0".to_string(),
                port: 3001,
            },
            admin: AdminConfig {
                admin_dids: vec![DEFAULT_OPERATOR_DID.to_string()],
                allow_review_retransition: true,
            },
            moderation: ModerationConfig {
                seed_moderator_did: DEFAULT_OPERATOR_DID.to_string(),
                seed_moderator_handle: "basker.bsky.social".to_string(),
                ozone_url: "https://ozone.basker.app".to_string(),
                report_service_url: "https://bsky.social".to_string(),
                report_access_token: None,
            },
            upstream: UpstreamConfig {
                appview_url: "https://public.api.bsky.app".to_string(),
                timeout_secs: None,
            },
            rate_limit: RateLimitConfig {
                enabled: true,
                requests_per_second: 100,
            },
            logging: LoggingConfig {
                level: "basker=debug,tower_http=debug".to_string(),
                json: false,
            },
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_did_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> BaskerResult<Self> {
        dotenv::dotenv().ok();

        let defaults = ServerConfig::default();

        let hostname = env::var("BASKER_HOSTNAME").unwrap_or(defaults.service.hostname);
        let port = match env::var("BASKER_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| BaskerError::Validation(format!("Invalid port number: {}", raw)))?,
            Err(_) => defaults.service.port,
        };

        let admin_dids = env::var("BASKER_ADMIN_DIDS")
            .map(|raw| parse_did_list(&raw))
            .unwrap_or(defaults.admin.admin_dids);
        let allow_review_retransition = env_bool(
            "BASKER_ALLOW_REVIEW_RETRANSITION",
            defaults.admin.allow_review_retransition,
        );

        let seed_moderator_did = env::var("BASKER_SEED_MODERATOR_DID")
            .unwrap_or(defaults.moderation.seed_moderator_did);
        let seed_moderator_handle = env::var("BASKER_SEED_MODERATOR_HANDLE")
            .unwrap_or(defaults.moderation.seed_moderator_handle);
        let ozone_url = env::var("BASKER_OZONE_URL").unwrap_or(defaults.moderation.ozone_url);
        let report_service_url = env::var("BASKER_REPORT_SERVICE_URL")
            .unwrap_or(defaults.moderation.report_service_url);
        let report_access_token = env::var("BASKER_REPORT_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        let appview_url =
            env::var("BASKER_APPVIEW_URL").unwrap_or(defaults.upstream.appview_url);
        let timeout_secs = match env::var("BASKER_UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => Some(raw.parse().map_err(|_| {
                BaskerError::Validation(format!("Invalid upstream timeout: {}", raw))
            })?),
            Err(_) => None,
        };

        let rate_limit_enabled =
            env_bool("BASKER_RATE_LIMITS_ENABLED", defaults.rate_limit.enabled);
        let requests_per_second = env::var("BASKER_RATE_LIMIT_RPS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_limit.requests_per_second);

        let level = env::var("RUST_LOG").unwrap_or(defaults.logging.level);
        let json = env::var("BASKER_LOG_FORMAT")
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(ServerConfig {
            service: ServiceConfig { hostname, port },
            admin: AdminConfig {
                admin_dids,
                allow_review_retransition,
            },
            moderation: ModerationConfig {
                seed_moderator_did,
                seed_moderator_handle,
                ozone_url,
                report_service_url,
                report_access_token,
            },
            upstream: UpstreamConfig {
                appview_url,
                timeout_secs,
            },
            rate_limit: RateLimitConfig {
                enabled: rate_limit_enabled,
                requests_per_second,
            },
            logging: LoggingConfig { level, json },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> BaskerResult<()> {
        if self.service.hostname.is_empty() {
            return Err(BaskerError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.admin.admin_dids.is_empty() {
            return Err(BaskerError::Validation(
                "At least one admin DID must be configured".to_string(),
            ));
        }

        if self.moderation.seed_moderator_did.trim().is_empty() {
            return Err(BaskerError::Validation(
                "Seed moderator DID cannot be empty".to_string(),
            ));
        }

        for (name, url) in [
            ("appview", &self.upstream.appview_url),
            ("report service", &self.moderation.report_service_url),
            ("ozone", &self.moderation.ozone_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(BaskerError::Validation(format!(
                    "Invalid {} URL: {}",
                    name, url
                )));
            }
        }

        Ok(())
    }
}
