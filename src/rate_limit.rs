/// Rate Limiting System
use crate::{
    auth::extract_actor_did,
    context::AppContext,
    error::{BaskerError, BaskerResult},
};
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter as GovernorLimiter};
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc};

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per second for each caller presenting an actor DID
    pub identified_rps: u32,
    /// Requests per second for each anonymous peer address
    pub anonymous_rps: u32,
    /// Requests per second for admins and moderators on their endpoints
    pub privileged_rps: u32,
    /// Burst size
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::from_rps(100)
    }
}

impl RateLimitConfig {
    /// Derive the tiers from the identified-caller rate
    pub fn from_rps(identified_rps: u32) -> Self {
        Self {
            identified_rps,
            anonymous_rps: (identified_rps / 10).max(1),
            privileged_rps: identified_rps.saturating_mul(10),
            burst_size: (identified_rps / 2).max(1),
        }
    }
}

/// Key used for anonymous callers whose peer address is unknown
const UNKNOWN_PEER: &str = "unknown";

fn quota(rps: u32, burst: u32) -> Quota {
    let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
    Quota::per_second(rps).allow_burst(burst)
}

/// Rate limiter manager, one bucket per caller key in each tier
#[derive(Clone)]
pub struct RateLimiter {
    identified: Arc<DefaultKeyedRateLimiter<String>>,
    anonymous: Arc<DefaultKeyedRateLimiter<String>>,
    privileged: Arc<DefaultKeyedRateLimiter<String>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            identified: Arc::new(GovernorLimiter::keyed(quota(
                config.identified_rps,
                config.burst_size,
            ))),
            anonymous: Arc::new(GovernorLimiter::keyed(quota(
                config.anonymous_rps,
                config.burst_size / 5,
            ))),
            privileged: Arc::new(GovernorLimiter::keyed(quota(
                config.privileged_rps,
                config.burst_size.saturating_mul(2),
            ))),
        }
    }

    fn check(limiter: &DefaultKeyedRateLimiter<String>, key: &str) -> BaskerResult<()> {
        limiter
            .check_key(&key.to_string())
            .map_err(|_| BaskerError::RateLimitExceeded {
                retry_after: std::time::Duration::from_secs(1),
            })
    }

    /// Check the bucket of an identified caller
    pub fn check_identified(&self, did: &str) -> BaskerResult<()> {
        Self::check(&self.identified, did)
    }

    /// Check the bucket of an anonymous peer
    pub fn check_anonymous(&self, peer: &str) -> BaskerResult<()> {
        Self::check(&self.anonymous, peer)
    }

    /// Check the bucket of an admin or moderator
    pub fn check_privileged(&self, did: &str) -> BaskerResult<()> {
        Self::check(&self.privileged, did)
    }

    /// Drop buckets that have fully refilled
    pub fn retain_recent(&self) {
        self.identified.retain_recent();
        self.anonymous.retain_recent();
        self.privileged.retain_recent();
    }
}

fn is_privileged_path(path: &str) -> bool {
    path.starts_with("/api/admin") || path.starts_with("/api/moderation")
}

/// Rate limiting middleware
///
/// Identified callers are limited per DID. The privileged tier applies only
/// when that DID is a configured admin or a registered moderator. Anonymous
/// callers are limited per peer address.
pub async fn rate_limit_middleware(
    State(ctx): State<AppContext>,
    request: Request,
    next: Next,
) -> Response {
    let Some(limiter) = ctx.rate_limiter.as_ref() else {
        return next.run(request).await;
    };

    let path = request.uri().path().to_string();

    let result = match extract_actor_did(request.headers()) {
        Some(did) => {
            let privileged = is_privileged_path(&path)
                && (ctx.admin_gate.is_admin(&did)
                    || ctx.moderation_registry.is_moderator(&did).await);
            if privileged {
                limiter.check_privileged(&did)
            } else {
                limiter.check_identified(&did)
            }
        }
        None => {
            let peer = request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
                .unwrap_or_else(|| UNKNOWN_PEER.to_string());
            limiter.check_anonymous(&peer)
        }
    };

    match result {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::warn!("Rate limit exceeded on {}", path);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = RateLimiter::new(RateLimitConfig::default());

        // Should allow first request
        assert_ok!(limiter.check_identified("did:plc:alice"));
        assert_ok!(limiter.check_anonymous("127.0.0.1"));
        assert_ok!(limiter.check_privileged("did:plc:alice"));
    }

    #[test]
    fn test_anonymous_tier_is_tighter() {
        let limiter = RateLimiter::new(RateLimitConfig::from_rps(10));

        // anonymous burst is 1, identified burst is 5
        assert_ok!(limiter.check_anonymous("10.0.0.1"));
        assert_err!(limiter.check_anonymous("10.0.0.1"));
        for _ in 0..5 {
            assert_ok!(limiter.check_identified("did:plc:alice"));
        }
    }

    #[test]
    fn test_burst_limit() {
        let limiter = RateLimiter::new(RateLimitConfig {
            identified_rps: 10,
            anonymous_rps: 5,
            privileged_rps: 100,
            burst_size: 5,
        });

        for _ in 0..5 {
            assert!(limiter.check_identified("did:plc:alice").is_ok());
        }

        // Should hit rate limit after burst
        assert!(matches!(
            limiter.check_identified("did:plc:alice"),
            Err(BaskerError::RateLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_callers_have_separate_buckets() {
        let limiter = RateLimiter::new(RateLimitConfig::from_rps(10));

        for _ in 0..5 {
            assert_ok!(limiter.check_identified("did:plc:alice"));
        }
        assert_err!(limiter.check_identified("did:plc:alice"));
        assert_ok!(limiter.check_identified("did:plc:bob"));

        assert_ok!(limiter.check_anonymous("10.0.0.1"));
        assert_err!(limiter.check_anonymous("10.0.0.1"));
        assert_ok!(limiter.check_anonymous("10.0.0.2"));
    }

    #[test]
    fn test_privileged_paths() {
        assert!(is_privileged_path("/api/admin/status"));
        assert!(is_privileged_path("/api/moderation/reports"));
        assert!(!is_privileged_path("/api/verification-requests"));
        assert!(!is_privileged_path("/health"));
    }

    #[test]
    fn test_tiers_from_rps() {
        let config = RateLimitConfig::from_rps(100);
        assert_eq!(config.anonymous_rps, 10);
        assert_eq!(config.privileged_rps, 1000);
        assert_eq!(config.burst_size, 50);

        let tiny = RateLimitConfig::from_rps(1);
        assert_eq!(tiny.anonymous_rps, 1);
        assert_eq!(tiny.burst_size, 1);
    }
}
