use tracing::{info, warn};

use crate::assets;
use crate::config::{find_tag, DEFAULT_LOCALE};
use crate::contentful::models::RemoteEntry;
use crate::contentful::ContentfulError;
use crate::entries::{
    self, BlogPosting, Category, Embed, EntryModel, ImageWithAttribution, Link, Person, RichText,
};
use crate::legacy::models::{
    classify_body, classify_group, first_string, publish_enabled, Attribution, BodyKind,
    CoreFields, FieldGroup, FileRef, Section,
};
use crate::markdown;
use crate::migrate::{MigrateError, MigrationContext, PersonRef};

const SITE: &str = "dataspace-culturalheritage.eu";

/// Migrate every eligible post in sequence, honoring the configured
/// batch limit and offset.
pub async fn create_all(ctx: &mut MigrationContext) -> Result<(), MigrateError> {
    let post_ids = ctx
        .legacy
        .fetch_post_ids(ctx.config.posts_limit, ctx.config.posts_offset)
        .await?;
    let count = post_ids.len();

    for (i, id) in post_ids.iter().enumerate() {
        info!("Post {}/{}", i + 1, count);
        create_one(ctx, *id).await?;
    }

    Ok(())
}

/// Migrate a single post record: core fields, cross-references, the
/// composite body, then the entry itself.
pub async fn create_one(ctx: &mut MigrationContext, id: i64) -> Result<(), MigrateError> {
    let record = ctx
        .legacy
        .fetch_content_record(id, "posts")
        .await?
        .ok_or(MigrateError::RecordNotFound(id))?;

    let groups = record.sorted_groups();
    let core = groups
        .first()
        .map(CoreFields::from_group)
        .unwrap_or_default();

    // The core group's own body becomes the leading composite section.
    let mut sections: Vec<FieldGroup> = groups.iter().skip(1).cloned().collect();
    if let Some(body) = &core.body {
        sections.insert(0, FieldGroup::with_body(body.clone()));
    }

    info!(
        "Creating entry for post \"{}\" [ID={}]",
        core.slug.as_deref().unwrap_or(""),
        id
    );

    let mut entry = BlogPosting {
        name: core.title.clone().or_else(|| record.title.clone()),
        identifier: core.slug.clone(),
        date_published: record.published_at.map(|dt| dt.and_utc().to_rfc3339()),
        site: Some(SITE.to_string()),
        ..Default::default()
    };

    entry.authors = resolve_authors(ctx, &core.authors).await?;
    entry.categories = resolve_categories(ctx, &record.taxonomy_slugs()).await?;

    // The teaser may carry markup; the description field is plain text.
    if let Some(teaser) = &core.teaser {
        entry.description = Some(markdown::plain_text(teaser));
    }
    entry.introduction = core.intro.clone();

    if let Some(image) = &core.image {
        entry.primary_image =
            create_image_with_attribution(ctx, image, &core.attribution, true).await?;
    }

    let post_title = entry.name.clone().unwrap_or_default();
    let (has_part, associated_media) = create_sections(ctx, &sections, &post_title).await?;
    entry.has_part = has_part;
    entry.associated_media = associated_media;

    entries::create_and_publish(&ctx.management, &entry, None, ctx.config.publish_mode).await?;

    Ok(())
}

/// Resolve legacy author ids to person entry links. Lookups go through
/// the cache first; a person that is not in the target space yet is
/// warned about and the link omitted, with the miss cached.
async fn resolve_authors(
    ctx: &mut MigrationContext,
    author_ids: &[i64],
) -> Result<Vec<String>, MigrateError> {
    let mut links = Vec::new();

    for author_id in author_ids {
        info!("Looking up person entry for author [ID={}]", author_id);

        if !ctx.persons.contains_key(author_id) {
            let sys_id = Person::sys_id_from_legacy_id(*author_id);
            let resolved = match ctx.preview.get_entry(&sys_id).await {
                Ok(remote) => {
                    let name = remote
                        .field_str("name", DEFAULT_LOCALE)
                        .unwrap_or_default()
                        .to_string();
                    Some(PersonRef {
                        sys_id: remote.sys.id,
                        name,
                    })
                }
                Err(ContentfulError::NotFound) => None,
                Err(e) => return Err(e.into()),
            };
            ctx.persons.insert(*author_id, resolved);
        }

        match ctx.persons.get(author_id).and_then(|person| person.as_ref()) {
            Some(person) => {
                info!("Found: {}", person.name);
                links.push(person.sys_id.clone());
            }
            None => warn!("Person entry for author {} not found", author_id),
        }
    }

    Ok(links)
}

/// Map taxonomy slugs through the tag allow-list, then resolve each to
/// a category entry: cache, then remote search by identifier, then
/// create-and-publish on miss. Unmapped slugs are dropped.
async fn resolve_categories(
    ctx: &mut MigrationContext,
    slugs: &[String],
) -> Result<Vec<String>, MigrateError> {
    let mut links = Vec::new();

    for slug in slugs {
        let Some(tag) = find_tag(slug) else {
            info!("Dropping unmapped tag \"{}\"", slug);
            continue;
        };

        if !ctx.categories.contains_key(slug) {
            info!("Looking up category entry for tag \"{}\"", slug);

            let sys_id = match ctx
                .preview
                .find_entry(Category::CONTENT_TYPE_ID, "identifier", slug)
                .await?
            {
                Some(remote) => remote.sys.id,
                None => {
                    let category = Category {
                        name: Some(tag.name.to_string()),
                        identifier: Some(tag.identifier.to_string()),
                    };
                    let created = entries::create_and_publish(
                        &ctx.management,
                        &category,
                        None,
                        ctx.config.publish_mode,
                    )
                    .await?;
                    created.sys.id
                }
            };
            ctx.categories.insert(slug.clone(), Some(sys_id));
        }

        if let Some(Some(sys_id)) = ctx.categories.get(slug) {
            links.push(sys_id.clone());
        }
    }

    Ok(links)
}

/// Walk the composite body groups, creating one sub-entry per section.
/// Returns (hasPart entry ids, associatedMedia asset ids). Unknown
/// group shapes are skipped with a warning, never fatal.
async fn create_sections(
    ctx: &mut MigrationContext,
    groups: &[FieldGroup],
    post_title: &str,
) -> Result<(Vec<String>, Vec<String>), MigrateError> {
    let mut has_part = Vec::new();
    let mut associated_media = Vec::new();

    for group in groups {
        let publish = publish_enabled(group);

        match classify_group(group) {
            Section::Body(html) => {
                if let Some(id) = create_body_part(ctx, &html, post_title, publish).await? {
                    has_part.push(id);
                }
            }
            Section::Resources(resource_ids) => {
                let ids = create_resource_links(ctx, &resource_ids, publish).await?;
                has_part.extend(ids);
            }
            Section::Image { image, attribution } => {
                if let Some(id) =
                    create_image_with_attribution(ctx, &image, &attribution, publish).await?
                {
                    has_part.push(id);
                }
            }
            Section::File(file) => {
                if let Some(id) = create_associated_media(ctx, &file).await? {
                    associated_media.push(id);
                }
            }
            Section::Unknown(keys) => {
                warn!("Ignoring field group with unknown keys {:?}", keys);
            }
        }
    }

    Ok((has_part, associated_media))
}

/// One HTML body section: direct embeds keep their markup, lite video
/// widgets are rewritten into standard iframes, everything else becomes
/// a rich text entry.
async fn create_body_part(
    ctx: &MigrationContext,
    html: &str,
    post_title: &str,
    publish: bool,
) -> Result<Option<String>, MigrateError> {
    if html.trim().is_empty() {
        warn!("Skipping body section with no content");
        return Ok(None);
    }

    info!("Creating post section");

    let created = match classify_body(html) {
        BodyKind::DirectEmbed => {
            let embed = Embed {
                name: Some(format!("Embed for {}", post_title)),
                embed: Some(html.to_string()),
            };
            create_part(ctx, &embed, publish).await?
        }
        BodyKind::LiteYouTube(video_id) => {
            let embed = Embed {
                name: Some(format!("YouTube embed for {}", post_title)),
                embed: Some(format!(
                    r#"<iframe src="https://www.youtube.com/embed/{}" title="YouTube"></iframe>"#,
                    video_id
                )),
            };
            create_part(ctx, &embed, publish).await?
        }
        BodyKind::LiteVimeo(video_id) => {
            let embed = Embed {
                name: Some(format!("Vimeo embed for {}", post_title)),
                embed: Some(format!(
                    r#"<iframe src="https://player.vimeo.com/video/{}" title="Vimeo"></iframe>"#,
                    video_id
                )),
            };
            create_part(ctx, &embed, publish).await?
        }
        BodyKind::RichText => {
            let part = RichText {
                headline: None,
                text: html.to_string(),
            };
            create_part(ctx, &part, publish).await?
        }
    };

    Ok(Some(created.sys.id))
}

/// Resource references become link entries. A resource missing its text
/// or url is skipped with a warning.
async fn create_resource_links(
    ctx: &MigrationContext,
    resource_ids: &[i64],
    publish: bool,
) -> Result<Vec<String>, MigrateError> {
    let mut ids = Vec::new();

    for resource_id in resource_ids {
        let Some(resource) = ctx
            .legacy
            .fetch_content_record(*resource_id, "resources")
            .await?
        else {
            warn!("Resource record {} not found", resource_id);
            continue;
        };

        // Resource fields live on the record's core group.
        let data = resource
            .fields
            .iter()
            .find(|group| group.order.is_none())
            .map(|group| &group.data);
        let text = data.and_then(|data| first_string(data, "buttontext"));
        let url = data.and_then(|data| first_string(data, "htmllink"));

        match (text, url) {
            (Some(text), Some(url)) => {
                let link = Link {
                    text: Some(text),
                    url,
                };
                let created = create_part(ctx, &link, publish).await?;
                ids.push(created.sys.id);
            }
            _ => warn!("Unable to get text and url for resource link"),
        }
    }

    Ok(ids)
}

/// An image section: resolve (or create) the backing asset, then wrap
/// it in an attribution entry. A validation rejection leaves the image
/// out rather than failing the post.
async fn create_image_with_attribution(
    ctx: &MigrationContext,
    image: &FileRef,
    attribution: &Attribution,
    publish: bool,
) -> Result<Option<String>, MigrateError> {
    let Some(file_name) = image.file_name() else {
        info!("No image file");
        return Ok(None);
    };

    let title = attribution.title.clone().or_else(|| image.title.clone());

    let asset = assets::load_or_create_asset_for_image(
        &ctx.management,
        &ctx.preview,
        file_name,
        title.as_deref(),
    )
    .await;

    let entry = ImageWithAttribution {
        name: title,
        image: asset.map(|asset| asset.sys.id),
        creator: attribution.creator.clone(),
        provider: attribution.holder.clone(),
        license: attribution.license.clone(),
        url: attribution.link.clone(),
    };

    match create_part(ctx, &entry, publish).await {
        Ok(created) => Ok(Some(created.sys.id)),
        Err(ContentfulError::Validation(message)) => {
            warn!("Image attribution entry rejected: {}", message);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// A standalone file attached to the post, stored as an asset link.
async fn create_associated_media(
    ctx: &MigrationContext,
    file: &FileRef,
) -> Result<Option<String>, MigrateError> {
    info!("Creating post associated media");

    let Some(file_name) = file.file_name() else {
        warn!("Ignoring file group without a file name");
        return Ok(None);
    };

    let asset = assets::load_or_create_asset_for_image(
        &ctx.management,
        &ctx.preview,
        file_name,
        file.title.as_deref(),
    )
    .await;

    Ok(asset.map(|asset| asset.sys.id))
}

/// Honor the section's enabled flag: publish immediately, or create as
/// a draft.
async fn create_part<E: EntryModel>(
    ctx: &MigrationContext,
    entry: &E,
    publish: bool,
) -> Result<RemoteEntry, ContentfulError> {
    if publish {
        entries::create_and_publish(&ctx.management, entry, None, ctx.config.publish_mode).await
    } else {
        entries::create(&ctx.management, entry, None).await
    }
}
