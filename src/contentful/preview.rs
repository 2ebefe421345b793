use reqwest::Client;

use crate::config::Config;
use crate::contentful::models::{EntryCollection, RemoteAsset, RemoteEntry};
use crate::contentful::{handle_response, ContentfulError};

/// Reader against the preview API host. Used for dedup lookups so that
/// unpublished entries from earlier runs are found too.
#[derive(Clone)]
pub struct PreviewClient {
    http: Client,
    base_url: String,
    token: String,
    space_id: String,
    environment_id: String,
}

impl PreviewClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: "https://preview.contentful.com".to_string(),
            token: config.preview_token.clone(),
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

    pub async fn get_entry(&self, id: &str) -> Result<RemoteEntry, ContentfulError> {
        let response = self
            .http
            .get(self.url(&format!("/entries/{}", id)))
            .bearer_auth(&self.token)
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

    /// Search for a single entry by content type and field equality.
    pub async fn find_entry(
        &self,
        content_type_id: &str,
        field_name: &str,
        value: &str,
    ) -> Result<Option<RemoteEntry>, ContentfulError> {
        let field_param = format!("fields.{}", field_name);
        let response = self
            .http
            .get(self.url("/entries"))
            .bearer_auth(&self.token)
            .query(&[
                ("content_type", content_type_id),
                (field_param.as_str(), value),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let collection: EntryCollection = handle_response(response).await?;
        if collection.total > 0 {
            Ok(collection.items.into_iter().next())
        } else {
            Ok(None)
        }
    }
}
