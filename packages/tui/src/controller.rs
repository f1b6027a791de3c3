//! View state controller.
//!
//! Mediates between UI triggers and the service clients. Each action owns a
//! [`RequestState`]; a trigger validates its preconditions, moves the action
//! to `Pending` and spawns the single network call, which reports back through
//! a [`Completion`] that the UI loop hands to [`ViewController::apply`].
//! Triggers received while an action is `Pending` are rejected without a call.

use std::collections::BTreeMap;
use std::sync::Arc;

use modview_auth::{AuthResult, Session};
use modview_client::{AdminTokenService, ImageUpload, ModerationService};
use modview_core::{
    mask_token, Action, AdminTokenRecord, ClientError, ClientResult, CredentialScope,
    ModerationVerdict, RequestState,
};
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Outcome of one spawned network call
#[derive(Debug)]
pub enum Completion {
    Moderated(ClientResult<ModerationVerdict>),
    /// Admin authentication shares its round trip with the first listing
    AdminAuthenticated {
        candidate: String,
        result: ClientResult<Vec<AdminTokenRecord>>,
    },
    TokenCreated(ClientResult<AdminTokenRecord>),
    TokensLoaded(ClientResult<Vec<AdminTokenRecord>>),
    TokenDeleted {
        target: String,
        result: ClientResult<()>,
    },
}

impl Completion {
    pub fn action(&self) -> Action {
        match self {
            Completion::Moderated(_) => Action::ModerateImage,
            Completion::AdminAuthenticated { .. } => Action::AuthenticateAdmin,
            Completion::TokenCreated(_) => Action::CreateToken,
            Completion::TokensLoaded(_) => Action::LoadTokens,
            Completion::TokenDeleted { .. } => Action::DeleteToken,
        }
    }
}

/// Why a trigger did not start a call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TriggerError {
    #[error("{0} is already in progress")]
    Busy(Action),
    #[error(transparent)]
    Invalid(#[from] ClientError),
}

/// A one-line status message next to a control
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub success: bool,
}

impl StatusLine {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }
}

pub struct ViewController {
    session: Session,
    moderation: Arc<dyn ModerationService>,
    admin: Arc<dyn AdminTokenService>,
    completions: UnboundedSender<Completion>,

    moderate: RequestState<ModerationVerdict>,
    authenticate: RequestState<()>,
    create: RequestState<AdminTokenRecord>,
    load: RequestState<Vec<AdminTokenRecord>>,
    delete: RequestState<String>,

    /// Last fetched listing, kept while a refresh is in flight
    tokens: Vec<AdminTokenRecord>,
    /// Row whose delete control is currently disabled
    deleting: Option<String>,
    /// A create/delete finished while a listing was already in flight
    reload_queued: bool,
    /// Inline validation messages per action
    notices: BTreeMap<Action, String>,
    token_status: Option<StatusLine>,
}

impl ViewController {
    pub fn new(
        session: Session,
        moderation: Arc<dyn ModerationService>,
        admin: Arc<dyn AdminTokenService>,
        completions: UnboundedSender<Completion>,
    ) -> Self {
        let token_status = session
            .restored_from_storage()
            .then(|| StatusLine::success("Token loaded from storage"));

        Self {
            session,
            moderation,
            admin,
            completions,
            moderate: RequestState::default(),
            authenticate: RequestState::default(),
            create: RequestState::default(),
            load: RequestState::default(),
            delete: RequestState::default(),
            tokens: Vec::new(),
            deleting: None,
            reload_queued: false,
            notices: BTreeMap::new(),
            token_status,
        }
    }

    // ------------------------------------------------------------------
    // Credential entry
    // ------------------------------------------------------------------

    /// Store the user token. Synchronous; no network call.
    pub fn submit_user_token(&mut self, raw: &str) -> AuthResult<()> {
        match self.session.set_user_token(raw) {
            Ok(()) => {
                self.token_status = Some(StatusLine::success("Token set successfully!"));
                self.notices.remove(&Action::ModerateImage);
                Ok(())
            }
            Err(e) => {
                let text = if e.is_empty_input() {
                    e.to_string()
                } else {
                    format!("Error: {}", e)
                };
                self.token_status = Some(StatusLine::error(text));
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Triggers
    // ------------------------------------------------------------------

    pub fn trigger_moderation(&mut self, upload: Option<ImageUpload>) -> Result<(), TriggerError> {
        let action = Action::ModerateImage;
        self.ensure_not_pending(action)?;
        let token = self.require_credential(action, CredentialScope::User)?;
        let upload = match upload {
            Some(upload) => upload,
            None => {
                return Err(self.reject(action, ClientError::empty_input("Please select an image file")))
            }
        };

        self.start(action);
        info!(file = %upload.file_name, size = upload.size(), "Submitting image for moderation");

        let service = Arc::clone(&self.moderation);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = service.submit_image(&token, &upload).await;
            let _ = completions.send(Completion::Moderated(result));
        });
        Ok(())
    }

    /// Verify a candidate admin token. It is only kept if the service accepts it.
    pub fn trigger_authenticate(&mut self, raw: &str) -> Result<(), TriggerError> {
        let action = Action::AuthenticateAdmin;
        self.ensure_not_pending(action)?;
        let candidate = raw.trim().to_string();
        if candidate.is_empty() {
            return Err(self.reject(action, ClientError::empty_input("Please enter an admin token")));
        }

        self.start(action);
        info!("Authenticating admin token {}", mask_token(&candidate));

        let service = Arc::clone(&self.admin);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = service.verify_admin(&candidate).await;
            let _ = completions.send(Completion::AdminAuthenticated { candidate, result });
        });
        Ok(())
    }

    pub fn trigger_create_token(&mut self, is_admin: bool) -> Result<(), TriggerError> {
        let action = Action::CreateToken;
        self.ensure_not_pending(action)?;
        let token = self.require_credential(action, CredentialScope::Admin)?;

        self.start(action);
        info!(is_admin, "Creating token");

        let service = Arc::clone(&self.admin);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = service.create_token(&token, is_admin).await;
            let _ = completions.send(Completion::TokenCreated(result));
        });
        Ok(())
    }

    pub fn trigger_load_tokens(&mut self) -> Result<(), TriggerError> {
        let action = Action::LoadTokens;
        self.ensure_not_pending(action)?;
        let token = self.require_credential(action, CredentialScope::Admin)?;

        self.start(action);
        debug!("Loading token list");

        let service = Arc::clone(&self.admin);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = service.list_tokens(&token).await;
            let _ = completions.send(Completion::TokensLoaded(result));
        });
        Ok(())
    }

    /// Revoke `target`. `confirmed` must come from an explicit user confirmation.
    pub fn trigger_delete_token(&mut self, target: &str, confirmed: bool) -> Result<(), TriggerError> {
        let action = Action::DeleteToken;
        self.ensure_not_pending(action)?;
        let token = self.require_credential(action, CredentialScope::Admin)?;
        let target = target.trim().to_string();
        if target.is_empty() {
            return Err(self.reject(action, ClientError::empty_input("No token selected")));
        }
        if !confirmed {
            return Err(self.reject(action, ClientError::NotConfirmed));
        }

        self.start(action);
        self.deleting = Some(target.clone());
        info!("Deleting token {}", mask_token(&target));

        let service = Arc::clone(&self.admin);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = service.delete_token(&token, &target).await;
            let _ = completions.send(Completion::TokenDeleted { target, result });
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------

    pub fn apply(&mut self, completion: Completion) {
        let action = completion.action();
        if !self.state_is_pending(action) {
            debug!("Completion for {} arrived while not pending", action);
        }

        match completion {
            Completion::Moderated(result) => {
                log_outcome(action, &result);
                self.moderate.resolve(result);
            }
            Completion::AdminAuthenticated { candidate, result } => {
                log_outcome(action, &result);
                match result {
                    Ok(tokens) => {
                        self.session.set_admin_token(&candidate);
                        self.authenticate = RequestState::Succeeded(());
                        self.tokens = tokens.clone();
                        if !self.load.is_pending() {
                            self.load = RequestState::Succeeded(tokens);
                        }
                    }
                    Err(e) => {
                        // No verified admin credential means no admin UI
                        self.session.clear_admin_token();
                        self.tokens.clear();
                        if !self.load.is_pending() {
                            self.load = RequestState::Idle;
                        }
                        self.authenticate.resolve(Err(e));
                    }
                }
            }
            Completion::TokenCreated(result) => {
                log_outcome(action, &result);
                let succeeded = result.is_ok();
                self.create.resolve(result);
                if succeeded {
                    self.refresh_tokens();
                }
            }
            Completion::TokensLoaded(result) => {
                log_outcome(action, &result);
                if let Ok(tokens) = &result {
                    self.tokens = tokens.clone();
                }
                self.load.resolve(result);
                if std::mem::take(&mut self.reload_queued) {
                    self.refresh_tokens();
                }
            }
            Completion::TokenDeleted { target, result } => {
                log_outcome(action, &result);
                self.deleting = None;
                match result {
                    Ok(()) => {
                        self.delete = RequestState::Succeeded(target);
                        self.refresh_tokens();
                    }
                    Err(e) => self.delete.resolve(Err(e)),
                }
            }
        }
    }

    /// Apply completions until no action is pending, e.g. for one-shot commands
    pub async fn settle(&mut self, completions: &mut UnboundedReceiver<Completion>) {
        while self.any_pending() {
            match completions.recv().await {
                Some(completion) => self.apply(completion),
                None => break,
            }
        }
    }

    // ------------------------------------------------------------------
    // Presentation accessors
    // ------------------------------------------------------------------

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn admin_visible(&self) -> bool {
        self.session.has_admin()
    }

    pub fn moderation_state(&self) -> &RequestState<ModerationVerdict> {
        &self.moderate
    }

    pub fn authenticate_state(&self) -> &RequestState<()> {
        &self.authenticate
    }

    pub fn create_state(&self) -> &RequestState<AdminTokenRecord> {
        &self.create
    }

    pub fn load_state(&self) -> &RequestState<Vec<AdminTokenRecord>> {
        &self.load
    }

    pub fn delete_state(&self) -> &RequestState<String> {
        &self.delete
    }

    /// Cached token list. Empty while no admin credential is held.
    pub fn tokens(&self) -> &[AdminTokenRecord] {
        if self.admin_visible() {
            &self.tokens
        } else {
            &[]
        }
    }

    pub fn deleting(&self) -> Option<&str> {
        self.deleting.as_deref()
    }

    pub fn notice(&self, action: Action) -> Option<&str> {
        self.notices.get(&action).map(String::as_str)
    }

    pub fn token_status(&self) -> Option<&StatusLine> {
        self.token_status.as_ref()
    }

    /// The control for `action` is disabled exactly while this is true
    pub fn is_busy(&self, action: Action) -> bool {
        self.state_is_pending(action)
    }

    pub fn any_pending(&self) -> bool {
        Action::ALL.iter().any(|action| self.state_is_pending(*action))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn state_is_pending(&self, action: Action) -> bool {
        match action {
            Action::ModerateImage => self.moderate.is_pending(),
            Action::AuthenticateAdmin => self.authenticate.is_pending(),
            Action::CreateToken => self.create.is_pending(),
            Action::LoadTokens => self.load.is_pending(),
            Action::DeleteToken => self.delete.is_pending(),
        }
    }

    fn ensure_not_pending(&self, action: Action) -> Result<(), TriggerError> {
        if self.state_is_pending(action) {
            debug!("Ignoring {} trigger while a call is in flight", action);
            return Err(TriggerError::Busy(action));
        }
        Ok(())
    }

    fn require_credential(
        &mut self,
        action: Action,
        scope: CredentialScope,
    ) -> Result<String, TriggerError> {
        match self.session.credential(scope) {
            Some(credential) => Ok(credential.value.clone()),
            None => Err(self.reject(action, ClientError::NoCredential(scope))),
        }
    }

    fn reject(&mut self, action: Action, err: ClientError) -> TriggerError {
        warn!("Rejected {}: {}", action, err);
        self.notices.insert(action, err.display_message());
        TriggerError::Invalid(err)
    }

    fn start(&mut self, action: Action) {
        let started = match action {
            Action::ModerateImage => self.moderate.begin(),
            Action::AuthenticateAdmin => self.authenticate.begin(),
            Action::CreateToken => self.create.begin(),
            Action::LoadTokens => self.load.begin(),
            Action::DeleteToken => self.delete.begin(),
        };
        debug_assert!(started, "{} started while pending", action);
        self.notices.remove(&action);
    }

    // Exactly one listing follows every successful create/delete
    fn refresh_tokens(&mut self) {
        if self.load.is_pending() {
            self.reload_queued = true;
            return;
        }
        if let Err(e) = self.trigger_load_tokens() {
            debug!("Token list refresh not started: {}", e);
        }
    }
}

fn log_outcome<T>(action: Action, result: &ClientResult<T>) {
    match result {
        Ok(_) => info!("{} succeeded", action),
        Err(e) => warn!("{} failed: {}", action, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    /// Services that must never be reached
    struct Unreachable;

    #[async_trait]
    impl ModerationService for Unreachable {
        async fn submit_image(&self, _: &str, _: &ImageUpload) -> ClientResult<ModerationVerdict> {
            unreachable!("moderation service called")
        }
    }

    #[async_trait]
    impl AdminTokenService for Unreachable {
        async fn list_tokens(&self, _: &str) -> ClientResult<Vec<AdminTokenRecord>> {
            unreachable!("list called")
        }
        async fn create_token(&self, _: &str, _: bool) -> ClientResult<AdminTokenRecord> {
            unreachable!("create called")
        }
        async fn delete_token(&self, _: &str, _: &str) -> ClientResult<()> {
            unreachable!("delete called")
        }
    }

    fn controller() -> (ViewController, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = ViewController::new(
            Session::in_memory(),
            Arc::new(Unreachable),
            Arc::new(Unreachable),
            tx,
        );
        (controller, rx)
    }

    #[test]
    fn test_user_token_status_lines() {
        let (mut controller, _rx) = controller();
        assert!(controller.token_status().is_none());

        assert!(controller.submit_user_token("   ").is_err());
        assert_eq!(
            controller.token_status(),
            Some(&StatusLine::error("Please enter a token"))
        );
        assert_eq!(controller.session().user_token(), None);

        controller.submit_user_token("  abc123  ").unwrap();
        assert_eq!(
            controller.token_status(),
            Some(&StatusLine::success("Token set successfully!"))
        );
        assert_eq!(controller.session().user_token(), Some("abc123"));
    }

    #[test]
    fn test_restored_token_is_announced() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let session = Session::open(modview_auth::MemoryTokenStore::with_token("saved"));
        let controller =
            ViewController::new(session, Arc::new(Unreachable), Arc::new(Unreachable), tx);

        assert_eq!(
            controller.token_status(),
            Some(&StatusLine::success("Token loaded from storage"))
        );
    }

    #[test]
    fn test_guards_reject_without_spawning() {
        let (mut controller, mut rx) = controller();

        let err = controller
            .trigger_moderation(Some(ImageUpload::new("a.png", vec![1])))
            .unwrap_err();
        assert_eq!(err, TriggerError::Invalid(ClientError::NoCredential(CredentialScope::User)));
        assert_eq!(controller.notice(Action::ModerateImage), Some("Please set a token first"));
        assert!(controller.moderation_state().is_idle());

        assert!(controller.trigger_authenticate("  ").is_err());
        assert!(controller.trigger_create_token(false).is_err());
        assert!(controller.trigger_load_tokens().is_err());
        assert!(controller.trigger_delete_token("abc", true).is_err());

        assert!(!controller.any_pending());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_missing_image_is_reported() {
        let (mut controller, _rx) = controller();
        controller.submit_user_token("abc123").unwrap();

        let err = controller.trigger_moderation(None).unwrap_err();
        assert_eq!(
            err,
            TriggerError::Invalid(ClientError::empty_input("Please select an image file"))
        );
        assert!(controller.moderation_state().is_idle());
    }
}
