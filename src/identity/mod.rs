/// Identity and profile lookups
///
/// Profiles live in users' AT Protocol repositories; this server only
/// proxies public reads of them.

pub mod profile;

pub use profile::ProfileClient;

use crate::error::{BaskerError, BaskerResult};
use std::time::Duration;

/// User-Agent sent on upstream requests
pub const USER_AGENT: &str = concat!("Basker/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by upstream AT Protocol calls
pub fn build_http_client(timeout_secs: Option<u64>) -> BaskerResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder
        .build()
        .map_err(|e| BaskerError::Internal(format!("Failed to create HTTP client: {}", e)))
}
