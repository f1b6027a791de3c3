// ABOUTME: Core types, severity scale and error taxonomy for Modview
// ABOUTME: Foundational package shared by the credential store, service clients and the UI

pub mod error;
pub mod request;
pub mod severity;
pub mod types;
pub mod utils;

// Re-export main types
pub use types::{
    AdminTokenRecord, CategoryRating, CreateTokenRequest, Credential, CredentialScope, ErrorBody,
    ModerationVerdict,
};

// Re-export the error taxonomy
pub use error::{ClientError, ClientResult};

// Re-export request state tracking
pub use request::{Action, RequestState};

// Re-export the severity scale
pub use severity::{color, label, Severity, SeverityLevel, NEUTRAL_COLOR, UNKNOWN_LABEL};

// Re-export utilities
pub use utils::mask_token;
