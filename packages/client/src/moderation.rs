use async_trait::async_trait;
use modview_core::{ClientError, ClientResult, ModerationVerdict};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::info;

use crate::http::ApiClient;
use crate::upload::ImageUpload;

/// Multipart field the service reads the image from
const FILE_FIELD: &str = "file";

#[async_trait]
pub trait ModerationService: Send + Sync {
    /// Submit one image for classification. `token` must be non-empty.
    async fn submit_image(&self, token: &str, upload: &ImageUpload) -> ClientResult<ModerationVerdict>;
}

/// `POST /moderate`
#[derive(Debug, Clone)]
pub struct ModerationClient {
    api: ApiClient,
}

impl ModerationClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ModerationService for ModerationClient {
    async fn submit_image(&self, token: &str, upload: &ImageUpload) -> ClientResult<ModerationVerdict> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(upload.mime.as_ref())
            .map_err(ClientError::transport)?;
        let form = Form::new().part(FILE_FIELD, part);

        let request = self
            .api
            .authorized(Method::POST, "/moderate", token)
            .multipart(form);

        let verdict: ModerationVerdict = self.api.send_json(request).await?;
        info!(
            file = %upload.file_name,
            is_safe = verdict.is_safe,
            confidence = verdict.confidence,
            "Moderation verdict received"
        );
        Ok(verdict)
    }
}
