pub mod blog_posting;
pub mod category;
pub mod embed;
pub mod image_with_attribution;
pub mod link;
pub mod person;
pub mod rich_text;

pub use blog_posting::BlogPosting;
pub use category::Category;
pub use embed::Embed;
pub use image_with_attribution::ImageWithAttribution;
pub use link::Link;
pub use person::Person;
pub use rich_text::RichText;

use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::config::{PublishMode, TRANSLATION_LOCALES};
use crate::contentful::models::{EntryPayload, Metadata, RemoteEntry};
use crate::contentful::{ContentfulError, ManagementClient};

/// Field-mapping contract implemented by each content type variant.
/// Variants are plain value structs; `fields` is pure.
pub trait EntryModel {
    /// Content type tag in the target space
    const CONTENT_TYPE_ID: &'static str;
    /// Whether entries of this type enter the translation workflow.
    /// Embeds are raw markup and stay untranslated.
    const TRANSLATE: bool = true;

    fn fields(&self) -> Map<String, Value>;
}

fn metadata<E: EntryModel>() -> Metadata {
    if E::TRANSLATE {
        Metadata {
            tags: TRANSLATION_LOCALES
                .iter()
                .map(|locale| {
                    json!({
                        "sys": {
                            "type": "Link",
                            "linkType": "Tag",
                            "id": format!("translate.{}", locale),
                        }
                    })
                })
                .collect(),
        }
    } else {
        Metadata::default()
    }
}

/// Submit an entry for creation, either under a caller-supplied stable
/// identity (deterministic dedup, e.g. persons) or letting the platform
/// assign one.
pub async fn create<E: EntryModel>(
    management: &ManagementClient,
    entry: &E,
    sys_id: Option<&str>,
) -> Result<RemoteEntry, ContentfulError> {
    info!("Creating `{}` entry", E::CONTENT_TYPE_ID);

    let payload = EntryPayload {
        fields: entry.fields(),
        metadata: metadata::<E>(),
    };

    match sys_id {
        Some(id) => {
            management
                .create_entry_with_id(E::CONTENT_TYPE_ID, id, &payload)
                .await
        }
        None => management.create_entry(E::CONTENT_TYPE_ID, &payload).await,
    }
}

/// Create then publish. With `PublishMode::FireAndForget` the publish
/// call is detached and its outcome never observed: if the process exits
/// first, the entry stays unpublished with no local record of the gap.
pub async fn create_and_publish<E: EntryModel>(
    management: &ManagementClient,
    entry: &E,
    sys_id: Option<&str>,
    mode: PublishMode,
) -> Result<RemoteEntry, ContentfulError> {
    let created = create(management, entry, sys_id).await?;
    let version = created.sys.version.unwrap_or(1);

    match mode {
        PublishMode::Await => {
            management.publish_entry(&created.sys.id, version).await?;
        }
        PublishMode::FireAndForget => {
            let management = management.clone();
            let id = created.sys.id.clone();
            tokio::spawn(async move {
                if let Err(e) = management.publish_entry(&id, version).await {
                    warn!("Detached publish of {} failed: {}", id, e);
                }
            });
        }
    }

    Ok(created)
}
