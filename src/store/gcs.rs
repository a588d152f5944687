//! Cloud Storage object uploads via the JSON API

use super::{ObjectStore, StoreError};
use crate::config::StoreConfig;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// Uploads distribution files to one bucket
pub struct GcsStore {
    client: Client,
    base_url: String,
    bucket: String,
    access_token: Option<String>,
}

impl GcsStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.storage_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            access_token: config.access_token.clone(),
        })
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/storage/v1/b/{}/o", self.base_url, self.bucket)
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StoreError> {
        if self.bucket.is_empty() {
            return Err(StoreError::Unavailable(
                "store.bucket (or STORAGE_BUCKET_NAME) is not set".to_string(),
            ));
        }

        let size = body.len();
        let mut request = self
            .client
            .post(self.upload_url())
            .query(&[("uploadType", "media"), ("name", key)])
            .header(CONTENT_TYPE, content_type)
            .body(body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        tracing::debug!(bucket = %self.bucket, key = %key, bytes = size, "Uploaded object");
        Ok(())
    }
}
