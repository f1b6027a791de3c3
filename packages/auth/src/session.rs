// ABOUTME: Session object owning both credential slots
// ABOUTME: The user token is persisted on every change, the admin token never leaves memory

use modview_core::{mask_token, Credential, CredentialScope};
use tracing::{debug, info, warn};

use crate::error::{AuthError, AuthResult};
use crate::storage::{MemoryTokenStore, TokenPersistence};

/// Holds at most one user credential and at most one admin credential.
/// Setting a slot overwrites it.
pub struct Session {
    store: Box<dyn TokenPersistence>,
    user: Option<Credential>,
    admin: Option<Credential>,
    restored: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user_token().map(mask_token))
            .field("admin", &self.admin_token().map(mask_token))
            .finish()
    }
}

impl Session {
    /// Open a session, restoring the durable user token if one was saved.
    /// An unreadable store is logged and treated as empty.
    pub fn open(store: impl TokenPersistence + 'static) -> Self {
        let user = match store.load() {
            Ok(Some(token)) => {
                debug!("Restored user token {}", mask_token(&token));
                Some(Credential::new(token, CredentialScope::User))
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Could not load stored user token: {}", e);
                None
            }
        };

        Self {
            restored: user.is_some(),
            store: Box::new(store),
            user,
            admin: None,
        }
    }

    /// A session backed by memory only
    pub fn in_memory() -> Self {
        Self::open(MemoryTokenStore::new())
    }

    /// Whether the user token came from storage when the session was opened
    pub fn restored_from_storage(&self) -> bool {
        self.restored
    }

    pub fn user_token(&self) -> Option<&str> {
        self.user.as_ref().map(|c| c.value.as_str())
    }

    /// Trim and store the user token. Blank input leaves everything untouched.
    pub fn set_user_token(&mut self, raw: &str) -> AuthResult<()> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(AuthError::EmptyInput);
        }

        // Persist first so memory never runs ahead of storage
        self.store.save(token)?;
        self.user = Some(Credential::new(token, CredentialScope::User));
        info!("User token set ({})", mask_token(token));
        Ok(())
    }

    pub fn clear_user_token(&mut self) -> AuthResult<()> {
        self.store.clear()?;
        self.user = None;
        info!("User token cleared");
        Ok(())
    }

    pub fn admin_token(&self) -> Option<&str> {
        self.admin.as_ref().map(|c| c.value.as_str())
    }

    pub fn has_admin(&self) -> bool {
        self.admin.is_some()
    }

    /// Keep an admin token for this process only. Blank input clears the slot.
    pub fn set_admin_token(&mut self, raw: &str) {
        let token = raw.trim();
        if token.is_empty() {
            self.clear_admin_token();
            return;
        }
        self.admin = Some(Credential::new(token, CredentialScope::Admin));
        debug!("Admin token set ({})", mask_token(token));
    }

    pub fn clear_admin_token(&mut self) {
        if self.admin.take().is_some() {
            debug!("Admin token cleared");
        }
    }

    pub fn credential(&self, scope: CredentialScope) -> Option<&Credential> {
        match scope {
            CredentialScope::User => self.user.as_ref(),
            CredentialScope::Admin => self.admin.as_ref(),
        }
    }
}
