use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::contentful::models::{AssetPayload, EntryPayload, RemoteAsset, RemoteEntry};
use crate::contentful::{handle_response, ContentfulError};

const CONTENT_TYPE_HEADER: &str = "X-Contentful-Content-Type";
const VERSION_HEADER: &str = "X-Contentful-Version";
const PAYLOAD_MIME: &str = "application/vnd.contentful.management.v1+json";

// Asset processing is asynchronous on the platform side; poll until the
// file URL appears.
const PROCESSING_ATTEMPTS: u32 = 20;
const PROCESSING_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Writer against the management API host: entry and asset creation,
/// publishing, and asset processing.
#[derive(Clone)]
pub struct ManagementClient {
    http: Client,
    base_url: String,
    token: String,
    space_id: String,
    environment_id: String,
}

impl ManagementClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: "https://api.contentful.com".to_string(),
            token: config.management_token.clone(),
            space_id: config.space_id.clone(),
            environment_id: config.environment_id.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/spaces/{}/environments/{}{}",
            self.base_url, self.space_id, self.environment_id, path
        )
    }

    /// Create an entry, letting the platform assign its identity.
    pub async fn create_entry(
        &self,
        content_type_id: &str,
        payload: &EntryPayload,
    ) -> Result<RemoteEntry, ContentfulError> {
        let response = self
            .http
            .post(self.url("/entries"))
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, PAYLOAD_MIME)
            .header(CONTENT_TYPE_HEADER, content_type_id)
            .json(payload)
            .send()
            .await?;

        handle_response(response).await
    }

    /// Create an entry under a caller-supplied stable identity, used for
    /// deterministic dedup (persons).
    pub async fn create_entry_with_id(
        &self,
        content_type_id: &str,
        id: &str,
        payload: &EntryPayload,
    ) -> Result<RemoteEntry, ContentfulError> {
        let response = self
            .http
            .put(self.url(&format!("/entries/{}", id)))
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, PAYLOAD_MIME)
            .header(CONTENT_TYPE_HEADER, content_type_id)
            .json(payload)
            .send()
            .await?;

        handle_response(response).await
    }

    pub async fn publish_entry(
        &self,
        id: &str,
        version: i64,
    ) -> Result<RemoteEntry, ContentfulError> {
        debug!("Publishing entry {}", id);
        let response = self
            .http
            .put(self.url(&format!("/entries/{}/published", id)))
            .bearer_auth(&self.token)
            .header(VERSION_HEADER, version)
            .send()
            .await?;

        handle_response(response).await
    }

    pub async fn get_asset(&self, id: &str) -> Result<RemoteAsset, ContentfulError> {
        let response = self
            .http
            .get(self.url(&format!("/assets/{}", id)))
            .bearer_auth(&self.token)
            .send()
            .await?;

        handle_response(response).await
    }

    pub async fn create_asset_with_id(
        &self,
        id: &str,
        payload: &AssetPayload,
    ) -> Result<RemoteAsset, ContentfulError> {
        let response = self
            .http
            .put(self.url(&format!("/assets/{}", id)))
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, PAYLOAD_MIME)
            .json(payload)
            .send()
            .await?;

        handle_response(response).await
    }

    /// Trigger processing of one locale's file. The platform responds
    /// before processing completes.
    pub async fn process_asset(&self, id: &str, locale: &str) -> Result<(), ContentfulError> {
        let response = self
            .http
            .put(self.url(&format!("/assets/{}/files/{}/process", id, locale)))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            handle_response::<serde_json::Value>(response).await.map(|_| ())
        }
    }

    /// Process every locale that carries a file, then poll until the
    /// platform has finished. Returns the refreshed asset, whose version
    /// is needed for publishing.
    pub async fn process_for_all_locales(
        &self,
        asset: &RemoteAsset,
    ) -> Result<RemoteAsset, ContentfulError> {
        let locales = asset.file_locales();
        for locale in &locales {
            self.process_asset(&asset.sys.id, locale).await?;
        }

        for _ in 0..PROCESSING_ATTEMPTS {
            let refreshed = self.get_asset(&asset.sys.id).await?;
            if locales.iter().all(|locale| refreshed.is_processed(locale)) {
                return Ok(refreshed);
            }
            tokio::time::sleep(PROCESSING_POLL_INTERVAL).await;
        }

        Err(ContentfulError::ProcessingIncomplete(asset.sys.id.clone()))
    }

    pub async fn publish_asset(
        &self,
        id: &str,
        version: i64,
    ) -> Result<RemoteAsset, ContentfulError> {
        debug!("Publishing asset {}", id);
        let response = self
            .http
            .put(self.url(&format!("/assets/{}/published", id)))
            .bearer_auth(&self.token)
            .header(VERSION_HEADER, version)
            .send()
            .await?;

        handle_response(response).await
    }
}
