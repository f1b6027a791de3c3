//! Modview service clients
//!
//! Thin, single-request wrappers around the remote moderation service. Each
//! operation issues exactly one HTTP call and maps its outcome onto
//! [`ClientError`]; retries, timeouts beyond the transport default and
//! request serialization are left to the caller.

pub mod admin;
pub mod http;
pub mod moderation;
pub mod upload;

// Re-export commonly used types and traits
pub use admin::{AdminClient, AdminTokenService};
pub use http::ApiClient;
pub use moderation::{ModerationClient, ModerationService};
pub use upload::ImageUpload;

pub use modview_core::{ClientError, ClientResult};
