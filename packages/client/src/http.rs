use modview_core::{mask_token, ClientError, ClientResult, ErrorBody};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Shared HTTP plumbing for the moderation service.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request carrying `Authorization: Bearer <token>`
    pub fn authorized(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {} (token {})", method, url, mask_token(token));
        self.client.request(method, url).bearer_auth(token)
    }

    /// Send a request, converting transport failures and non-2xx responses
    pub async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!("Request failed before a response arrived: {}", e);
            ClientError::transport(e)
        })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Send a request and decode a JSON success body
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| {
            warn!("Could not decode response body: {}", e);
            ClientError::transport(e)
        })
    }
}

/// Build an API error from a non-2xx response, preferring the body's `detail`
pub async fn error_from_response(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message());

    warn!(status, detail = ?detail, "Service returned an error");
    ClientError::api(status, detail)
}
