use async_trait::async_trait;
use modview_core::{AdminTokenRecord, ClientResult, CreateTokenRequest};
use reqwest::Method;
use tracing::info;

use crate::http::ApiClient;

const TOKENS_PATH: &str = "/auth/tokens";

/// Token management. Every call needs a token with admin scope.
#[async_trait]
pub trait AdminTokenService: Send + Sync {
    /// Check that `token` carries admin scope and return the current listing.
    ///
    /// The service has no dedicated verify endpoint, so a successful listing
    /// stands in for verification. Implementations backed by a dedicated
    /// endpoint override this and may return an empty listing.
    async fn verify_admin(&self, token: &str) -> ClientResult<Vec<AdminTokenRecord>> {
        self.list_tokens(token).await
    }

    async fn list_tokens(&self, token: &str) -> ClientResult<Vec<AdminTokenRecord>>;

    async fn create_token(&self, token: &str, is_admin: bool) -> ClientResult<AdminTokenRecord>;

    /// Revoke `target`. Irreversible: callers must confirm with the user first.
    async fn delete_token(&self, token: &str, target: &str) -> ClientResult<()>;
}

/// `GET|POST /auth/tokens`, `DELETE /auth/tokens/{token}`
#[derive(Debug, Clone)]
pub struct AdminClient {
    api: ApiClient,
}

impl AdminClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AdminTokenService for AdminClient {
    async fn list_tokens(&self, token: &str) -> ClientResult<Vec<AdminTokenRecord>> {
        let request = self.api.authorized(Method::GET, TOKENS_PATH, token);
        let tokens: Vec<AdminTokenRecord> = self.api.send_json(request).await?;
        info!("Listed {} tokens", tokens.len());
        Ok(tokens)
    }

    async fn create_token(&self, token: &str, is_admin: bool) -> ClientResult<AdminTokenRecord> {
        let request = self
            .api
            .authorized(Method::POST, TOKENS_PATH, token)
            .json(&CreateTokenRequest { is_admin });
        let record: AdminTokenRecord = self.api.send_json(request).await?;
        info!(is_admin, "Created token");
        Ok(record)
    }

    async fn delete_token(&self, token: &str, target: &str) -> ClientResult<()> {
        let path = format!("{}/{}", TOKENS_PATH, urlencoding::encode(target));
        let request = self.api.authorized(Method::DELETE, &path, token);
        // Success bodies are informational only and may be empty
        self.api.send(request).await?;
        info!("Deleted token");
        Ok(())
    }
}
