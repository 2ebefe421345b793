pub mod authors;
pub mod posts;

use std::collections::HashMap;

use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::contentful::{ContentfulError, ManagementClient, PreviewClient};
use crate::legacy::LegacyDb;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("legacy store query failed: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Contentful(#[from] ContentfulError),
    #[error("no content record found for id {0}")]
    RecordNotFound(i64),
}

/// Cached result of a person lookup.
#[derive(Debug, Clone)]
pub struct PersonRef {
    pub sys_id: String,
    pub name: String,
}

/// Everything an orchestrator needs, threaded explicitly through the
/// migration calls: the collaborating clients plus the process-lifetime
/// memoization caches. Negative lookup results are cached too, so a
/// missing person is queried remotely at most once per run.
pub struct MigrationContext {
    pub config: Config,
    pub legacy: LegacyDb,
    pub management: ManagementClient,
    pub preview: PreviewClient,
    pub(crate) persons: HashMap<i64, Option<PersonRef>>,
    pub(crate) categories: HashMap<String, Option<String>>,
}

impl MigrationContext {
    pub fn new(
        config: Config,
        legacy: LegacyDb,
        management: ManagementClient,
        preview: PreviewClient,
    ) -> Self {
        Self {
            config,
            legacy,
            management,
            preview,
            persons: HashMap::new(),
            categories: HashMap::new(),
        }
    }
}
