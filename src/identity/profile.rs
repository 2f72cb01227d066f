/// Public profile lookup against the Bluesky AppView
use crate::error::{BaskerError, BaskerResult};
use reqwest::StatusCode;
use tracing::debug;

/// Proxies app.bsky.actor.getProfile
#[derive(Clone)]
pub struct ProfileClient {
    http_client: reqwest::Client,
    appview_url: String,
}

impl ProfileClient {
    pub fn new(http_client: reqwest::Client, appview_url: impl Into<String>) -> Self {
        Self {
            http_client,
            appview_url: appview_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL queried for an actor (handle or DID)
    pub fn profile_url(&self, actor: &str) -> String {
        format!(
            "{}/xrpc/app.bsky.actor.getProfile?actor={}",
            self.appview_url,
            urlencoding::encode(actor)
        )
    }

    /// Fetch the public profile of a handle or DID, returned verbatim
    pub async fn get_profile(&self, actor: &str) -> BaskerResult<serde_json::Value> {
        let actor = actor.trim();
        if actor.is_empty() {
            return Err(BaskerError::Validation("Actor is required".to_string()));
        }

        let url = self.profile_url(actor);
        debug!("Fetching profile for {}", actor);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| BaskerError::Upstream(format!("Failed to fetch profile: {}", e)))?;

        match response.status() {
            status if status.is_success() => response
                .json()
                .await
                .map_err(|e| BaskerError::Upstream(format!("Invalid profile response: {}", e))),
            // AppView answers unknown actors with 400 InvalidRequest
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                Err(BaskerError::NotFound(format!("Profile {}", actor)))
            }
            status => Err(BaskerError::Upstream(format!(
                "AppView returned error: {}",
                status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url_encodes_actor() {
        let client = ProfileClient::new(reqwest::Client::new(), "https://public.api.bsky.app/");
        assert_eq!(
            client.profile_url("did:plc:alice"),
            "https://public.api.bsky.app/xrpc/app.bsky.actor.getProfile?actor=did%3Aplc%3Aalice"
        );
    }

    #[tokio::test]
    async fn test_empty_actor_rejected_without_request() {
        let client = ProfileClient::new(reqwest::Client::new(), "http://127.0.0.1:9");
        let err = client.get_profile("   ").await.unwrap_err();
        assert!(matches!(err, BaskerError::Validation(_)));
    }
}
