// ABOUTME: Error types for the credential store
// ABOUTME: Blank input, unreadable credential files and filesystem failures

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Please enter a token")]
    EmptyInput,

    #[error("Invalid credential file: {0}")]
    Format(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthError {
    pub fn is_empty_input(&self) -> bool {
        matches!(self, AuthError::EmptyInput)
    }
}
