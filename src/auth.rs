/// Actor identity extractors
///
/// Callers identify themselves with a DID in the `x-user-did` header. The
/// header is trusted as-is: no signature or session is verified here, so
/// anything placed behind these extractors is only as strong as the proxy
/// or client that sets the header.
use crate::{
    admin::AdminPermission,
    context::AppContext,
    error::BaskerError,
    moderation::{ModeratorCapability, PermissionBundle},
};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};

/// Header carrying the caller's actor DID
pub const ACTOR_HEADER: &str = "x-user-did";

/// Extract the actor DID from request headers
pub fn extract_actor_did(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Caller that may or may not have identified itself
#[derive(Debug, Clone)]
pub struct OptionalActor {
    pub did: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppContext> for OptionalActor {
    type Rejection = BaskerError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalActor {
            did: extract_actor_did(&parts.headers),
        })
    }
}

/// Identified caller - 401 without the actor header
#[derive(Debug, Clone)]
pub struct Actor {
    pub did: String,
}

#[async_trait]
impl FromRequestParts<AppContext> for Actor {
    type Rejection = BaskerError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let did = extract_actor_did(&parts.headers).ok_or_else(|| {
            BaskerError::MissingIdentity(format!("Missing {} header", ACTOR_HEADER))
        })?;

        Ok(Actor { did })
    }
}

/// Admin caller holding `verify_work`
#[derive(Debug, Clone)]
pub struct AdminActor {
    pub did: String,
}

#[async_trait]
impl FromRequestParts<AppContext> for AdminActor {
    type Rejection = BaskerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let Actor { did } = Actor::from_request_parts(parts, state).await?;

        if !state
            .admin_gate
            .check_permission(&did, AdminPermission::VerifyWork)
        {
            tracing::warn!("AdminActor: {} lacks {}", did, AdminPermission::VerifyWork.as_str());
            return Err(BaskerError::NotAuthorized(format!(
                "{} permission required",
                AdminPermission::VerifyWork.as_str()
            )));
        }

        Ok(AdminActor { did })
    }
}

/// Caller with a moderator record carrying at least one capability
#[derive(Debug, Clone)]
pub struct ModeratorActor {
    pub did: String,
    pub permissions: PermissionBundle,
}

impl ModeratorActor {
    /// Require a specific capability on top of being a moderator
    pub fn require(&self, capability: ModeratorCapability) -> Result<(), BaskerError> {
        if self.permissions.has(capability) {
            Ok(())
        } else {
            tracing::warn!("ModeratorActor: {} lacks {}", self.did, capability.as_str());
            Err(BaskerError::NotAuthorized(format!(
                "{} permission required",
                capability.as_str()
            )))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppContext> for ModeratorActor {
    type Rejection = BaskerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let Actor { did } = Actor::from_request_parts(parts, state).await?;

        let permissions = state
            .moderation_registry
            .permissions(&did)
            .await
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                tracing::warn!("ModeratorActor: {} is not a moderator", did);
                BaskerError::NotAuthorized("Moderator access required".to_string())
            })?;

        Ok(ModeratorActor { did, permissions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_actor_did() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_actor_did(&headers), None);

        headers.insert(ACTOR_HEADER, HeaderValue::from_static("  "));
        assert_eq!(extract_actor_did(&headers), None);

        headers.insert(ACTOR_HEADER, HeaderValue::from_static(" did:plc:alice "));
        assert_eq!(extract_actor_did(&headers).as_deref(), Some("did:plc:alice"));
    }

    #[test]
    fn test_moderator_require() {
        let actor = ModeratorActor {
            did: "did:plc:carol".to_string(),
            permissions: PermissionBundle {
                can_issue_labels: true,
                ..PermissionBundle::default()
            },
        };

        assert!(actor.require(ModeratorCapability::IssueLabels).is_ok());
        assert!(matches!(
            actor.require(ModeratorCapability::ReviewReports),
            Err(BaskerError::NotAuthorized(_))
        ));
    }
}
