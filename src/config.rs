use thiserror::Error;

pub const DEFAULT_LOCALE: &str = "en-GB";

/// Locales enrolled in the translation workflow. Translated entry types
/// are tagged `translate.{locale}` for each of these at creation time.
pub const TRANSLATION_LOCALES: &[&str] = &[
    "de-DE", "es-ES", "fr-FR", "it-IT", "nl-NL", "pl-PL",
];

/// How entry publishes are awaited. FireAndForget detaches the publish
/// confirmation: faster bulk runs, but a crash mid-run can leave entries
/// created and never published, with no local record of the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    Await,
    FireAndForget,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Runtime configuration, collected once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Legacy store connection string
    pub mysql_url: String,
    /// Management API credentials
    pub management_token: String,
    pub space_id: String,
    pub environment_id: String,
    /// Preview API credentials (read side, used for dedup lookups)
    pub preview_token: String,
    /// Optional batching of the post candidate set
    pub posts_limit: Option<u64>,
    pub posts_offset: Option<u64>,
    pub publish_mode: PublishMode,
}

impl Config {
    /// Load configuration from the environment. A `.env` file, when
    /// present, has already been merged in by `main`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let publish_mode = match std::env::var("SKIP_ENTRY_PUBLISH_AWAIT").as_deref() {
            Ok("1") => PublishMode::FireAndForget,
            _ => PublishMode::Await,
        };

        Ok(Self {
            mysql_url: require("MYSQL_URL")?,
            management_token: require("CTF_CMA_ACCESS_TOKEN")?,
            space_id: require("CTF_SPACE_ID")?,
            environment_id: require("CTF_ENVIRONMENT_ID")?,
            preview_token: require("CTF_CPA_ACCESS_TOKEN")?,
            posts_limit: integer_var("MIGRATE_POSTS_LIMIT"),
            posts_offset: integer_var("MIGRATE_POSTS_OFFSET"),
            publish_mode,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

/// Malformed numeric values are ignored rather than rejected, so a
/// stray `MIGRATE_POSTS_LIMIT=all` falls back to the full record set.
fn integer_var(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// A category known to the target space. Legacy taxonomy slugs are only
/// migrated when they map onto one of these definitions, either by
/// identifier or through the legacy aliases in `from`.
pub struct TagDefinition {
    pub name: &'static str,
    pub identifier: &'static str,
    pub from: &'static [&'static str],
}

pub static TAG_DEFINITIONS: &[TagDefinition] = &[
    TagDefinition {
        name: "3D content",
        identifier: "3d",
        from: &["3d", "3d-content"],
    },
    TagDefinition {
        name: "Art",
        identifier: "art",
        from: &["art", "arts"],
    },
    TagDefinition {
        name: "Audiovisual",
        identifier: "audiovisual",
        from: &["audiovisual", "av", "film"],
    },
    TagDefinition {
        name: "Copyright",
        identifier: "copyright",
        from: &["copyright", "licensing"],
    },
    TagDefinition {
        name: "Data quality",
        identifier: "data-quality",
        from: &["data-quality", "metadata-quality"],
    },
    TagDefinition {
        name: "Education",
        identifier: "education",
        from: &["education", "e-learning", "elearning"],
    },
    TagDefinition {
        name: "Fashion",
        identifier: "fashion",
        from: &["fashion"],
    },
    TagDefinition {
        name: "Impact",
        identifier: "impact",
        from: &["impact", "impact-assessment"],
    },
    TagDefinition {
        name: "Multilinguality",
        identifier: "multilinguality",
        from: &["multilinguality", "translation"],
    },
    TagDefinition {
        name: "Newspapers",
        identifier: "newspapers",
        from: &["newspapers", "press"],
    },
    TagDefinition {
        name: "Research",
        identifier: "research",
        from: &["research", "digital-humanities"],
    },
];

pub fn find_tag(slug: &str) -> Option<&'static TagDefinition> {
    TAG_DEFINITIONS
        .iter()
        .find(|tag| tag.identifier == slug || tag.from.contains(&slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tag_by_identifier_and_alias() {
        assert_eq!(find_tag("newspapers").unwrap().identifier, "newspapers");
        assert_eq!(find_tag("press").unwrap().identifier, "newspapers");
        assert!(find_tag("knitting").is_none());
    }
}
