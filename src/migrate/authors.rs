use tracing::{info, warn};

use crate::entries::{self, Person};
use crate::migrate::{MigrateError, MigrationContext};

/// Migrate every author referenced by any post.
pub async fn create_all(ctx: &mut MigrationContext) -> Result<(), MigrateError> {
    let author_ids = ctx.legacy.fetch_author_ids().await?;
    let count = author_ids.len();

    for (i, id) in author_ids.iter().enumerate() {
        info!("Author {}/{}", i + 1, count);
        create_one(ctx, *id).await?;
    }

    Ok(())
}

/// Migrate one author as a person entry under its derived stable id, so
/// re-runs update rather than duplicate.
pub async fn create_one(ctx: &mut MigrationContext, id: i64) -> Result<(), MigrateError> {
    info!("Creating entry for person {}", id);

    let Some(person) = ctx.legacy.fetch_person_fields(id).await? else {
        warn!("No person content entry found for id {}", id);
        return Ok(());
    };

    let sys_id = Person::sys_id_from_legacy_id(id);

    let name = format!(
        "{} {}",
        person.first_name.unwrap_or_default(),
        person.last_name.unwrap_or_default()
    )
    .trim()
    .to_string();

    let entry = Person {
        name: Some(name),
        affiliation: person.company,
        url: None,
    };

    entries::create_and_publish(
        &ctx.management,
        &entry,
        Some(&sys_id),
        ctx.config.publish_mode,
    )
    .await?;

    Ok(())
}
