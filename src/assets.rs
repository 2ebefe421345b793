use serde_json::json;
use tracing::{info, warn};

use crate::contentful::models::{AssetFields, AssetPayload, RemoteAsset};
use crate::contentful::{ContentfulError, ManagementClient, PreviewClient};
use crate::identity::hashed_sys_id;
use crate::langmap::LangMap;

/// Resolved download URL for a legacy file. Only spaces need escaping;
/// the names otherwise arrive URL-safe.
fn file_url(file_name: &str) -> String {
    format!(
        "https://pro.europeana.eu/files/{}",
        file_name.replace(' ', "%20")
    )
}

/// Load the asset for a legacy image file, creating it remotely when it
/// does not exist yet. The asset id is a content hash of the resolved
/// URL, so repeated runs land on the same asset instead of duplicating
/// it. Failures are logged and resolve to `None`; an unattainable image
/// never sinks the record being migrated.
pub async fn load_or_create_asset_for_image(
    management: &ManagementClient,
    preview: &PreviewClient,
    file_name: &str,
    title: Option<&str>,
) -> Option<RemoteAsset> {
    info!("Resolving asset <{}>", file_name);

    let url = file_url(file_name);
    let asset_id = hashed_sys_id(&url);

    if let Some(asset) = load_asset(preview, &asset_id).await {
        info!("[EXISTS] {}", asset_id);
        return Some(asset);
    }

    if let Err(e) = create_and_publish(management, &asset_id, &url, title, file_name).await {
        warn!("Asset creation for <{}> failed: {}", file_name, e);
        return None;
    }

    load_asset(preview, &asset_id).await
}

async fn load_asset(preview: &PreviewClient, asset_id: &str) -> Option<RemoteAsset> {
    preview.get_asset(asset_id).await.ok()
}

async fn create_and_publish(
    management: &ManagementClient,
    id: &str,
    url: &str,
    title: Option<&str>,
    file_name: &str,
) -> Result<(), ContentfulError> {
    let content_type = probe_content_type(url).await?;

    // Assets may not be published without a title. Fall back to the
    // bare file name.
    let title = title
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .unwrap_or_else(|| bare_file_name(file_name).to_string());

    let payload = AssetPayload {
        fields: AssetFields {
            title: LangMap::of(title),
            file: LangMap::of(json!({
                "contentType": content_type,
                "fileName": file_name,
                "upload": url,
            })),
        },
    };

    let asset = management.create_asset_with_id(id, &payload).await?;
    let processed = management.process_for_all_locales(&asset).await?;
    let version = processed.sys.version.unwrap_or(1);
    management.publish_asset(&processed.sys.id, version).await?;

    info!("[NEW] {}", asset.sys.id);
    Ok(())
}

fn bare_file_name(file_name: &str) -> &str {
    file_name.rsplit('/').next().unwrap_or(file_name)
}

/// The platform needs the file's content type up front; probe it with a
/// metadata request against the source.
async fn probe_content_type(url: &str) -> Result<String, ContentfulError> {
    let response = reqwest::Client::new().head(url).send().await?;
    Ok(response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_escapes_spaces() {
        assert_eq!(
            file_url("some image.jpg"),
            "https://pro.europeana.eu/files/some%20image.jpg"
        );
        assert_eq!(
            file_url("europeana-pro/hero.jpg"),
            "https://pro.europeana.eu/files/europeana-pro/hero.jpg"
        );
    }

    #[test]
    fn test_asset_identity_is_idempotent() {
        let first = hashed_sys_id(&file_url("some image.jpg"));
        let second = hashed_sys_id(&file_url("some image.jpg"));
        assert_eq!(first, second);
        assert_eq!(first, "1fd302596e17c161eaa74fba798566e1");
    }

    #[test]
    fn test_bare_file_name() {
        assert_eq!(bare_file_name("europeana-pro/hero.jpg"), "hero.jpg");
        assert_eq!(bare_file_name("hero.jpg"), "hero.jpg");
    }
}
