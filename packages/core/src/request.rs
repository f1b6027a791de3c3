// ABOUTME: Per-action request state used to enforce one in-flight call per action
// ABOUTME: Idle -> Pending -> Succeeded/Failed, with Pending rejecting new triggers

use crate::error::ClientError;
use std::fmt;

/// Every independent user action that can issue a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    ModerateImage,
    AuthenticateAdmin,
    CreateToken,
    LoadTokens,
    DeleteToken,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::ModerateImage,
        Action::AuthenticateAdmin,
        Action::CreateToken,
        Action::LoadTokens,
        Action::DeleteToken,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::ModerateImage => "moderate image",
            Action::AuthenticateAdmin => "authenticate admin",
            Action::CreateToken => "create token",
            Action::LoadTokens => "load tokens",
            Action::DeleteToken => "delete token",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, RequestState::Idle)
    }

    pub fn succeeded(&self) -> Option<&T> {
        match self {
            RequestState::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Enter `Pending`. Returns false, leaving the state untouched, if a call is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = RequestState::Pending;
        true
    }

    /// Leave `Pending` with the outcome of the call
    pub fn resolve(&mut self, result: Result<T, ClientError>) {
        *self = match result {
            Ok(payload) => RequestState::Succeeded(payload),
            Err(err) => RequestState::Failed(err.display_message()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_rejects_second_call() {
        let mut state: RequestState<()> = RequestState::default();
        assert!(state.is_idle());
        assert!(state.begin());
        assert!(state.is_pending());
        assert!(!state.begin());
        assert!(state.is_pending());
    }

    #[test]
    fn test_resolve_success_and_failure() {
        let mut state: RequestState<u32> = RequestState::default();
        state.begin();
        state.resolve(Ok(7));
        assert_eq!(state.succeeded(), Some(&7));

        assert!(state.begin());
        state.resolve(Err(ClientError::api(500, None)));
        assert_eq!(state.failure(), Some("Error: HTTP error! status: 500"));
        assert!(state.succeeded().is_none());
    }

    #[test]
    fn test_can_retry_after_failure() {
        let mut state: RequestState<()> = RequestState::Failed("boom".to_string());
        assert!(state.begin());
    }
}
