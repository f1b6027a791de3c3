// ABOUTME: Error taxonomy for every user-triggered action
// ABOUTME: Validation failures never reach the network; API and transport failures carry display text

use crate::types::CredentialScope;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// A required text field was blank. Carries the inline message to show.
    #[error("{0}")]
    EmptyInput(String),

    #[error("{}", .0.missing_message())]
    NoCredential(CredentialScope),

    #[error("Deletion was not confirmed")]
    NotConfirmed,

    /// Non-2xx response. `message` is the server's `detail` or a status-derived fallback.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request failed before a usable response was obtained
    #[error("{0}")]
    Transport(String),
}

impl ClientError {
    pub fn empty_input(message: impl Into<String>) -> Self {
        Self::EmptyInput(message.into())
    }

    /// Build an API error, preferring the server-provided detail
    pub fn api(status: u16, detail: Option<String>) -> Self {
        let message = detail.unwrap_or_else(|| format!("HTTP error! status: {}", status));
        Self::Api { status, message }
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Validation errors are raised before any request is made
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ClientError::EmptyInput(_) | ClientError::NoCredential(_) | ClientError::NotConfirmed
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text shown inline next to the triggering control
    pub fn display_message(&self) -> String {
        if self.is_validation() {
            self.to_string()
        } else {
            format!("Error: {}", self)
        }
    }
}
