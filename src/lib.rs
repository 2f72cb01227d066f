/// Basker - link-in-bio API server
///
/// Profile data lives in users' AT Protocol repositories. This server
/// proxies public profile reads and runs the two workflows that need a
/// trusted operator: employment verification review and content moderation.

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod identity;
pub mod moderation;
pub mod rate_limit;
pub mod server;

pub use context::AppContext;
pub use error::{BaskerError, BaskerResult};
