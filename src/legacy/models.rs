use std::collections::HashMap;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value};

static EMBED_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(iframe|script)[ >]").unwrap());
static VIDEO_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r#"videoid="([^"]+)""#).unwrap());

/// One ordered segment of a record's body: the raw field name → value
/// map plus its sort position. The group without a position is the
/// record's core field set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldGroup {
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl FieldGroup {
    /// Synthetic body-only group, used to re-queue a core body as the
    /// leading composite section.
    pub fn with_body(body: String) -> Self {
        let mut data = Map::new();
        data.insert("body".to_string(), json!([body]));
        Self { order: None, data }
    }
}

/// A row from the legacy store with its decomposed field groups and
/// taxonomy tags. Read-only input.
#[derive(Debug, Clone)]
pub struct ContentRecord {
    pub id: i64,
    pub title: Option<String>,
    pub published_at: Option<NaiveDateTime>,
    pub fields: Vec<FieldGroup>,
    pub taxonomy: HashMap<String, Vec<String>>,
}

impl ContentRecord {
    /// Field groups in body order. The core group carries no sort
    /// position and sorts first.
    pub fn sorted_groups(&self) -> Vec<FieldGroup> {
        let mut groups = self.fields.clone();
        groups.sort_by_key(|group| group.order.unwrap_or(i64::MIN));
        groups
    }

    /// All taxonomy slugs across types, empty ones dropped.
    pub fn taxonomy_slugs(&self) -> Vec<String> {
        self.taxonomy
            .values()
            .flatten()
            .filter(|slug| !slug.is_empty())
            .cloned()
            .collect()
    }
}

/// Person fields aggregated by the legacy store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonFields {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

/// Reference to a stored file, as embedded in image and singlefile
/// groups. Older records use `file` where newer ones use `filename`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileRef {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl FileRef {
    pub fn file_name(&self) -> Option<&str> {
        self.filename.as_deref().or(self.file.as_deref())
    }
}

/// Image attribution fields, carried alongside the image under prefixed
/// keys (`image_attribution_*` on the core group, `attribution_*` on
/// section groups).
#[derive(Debug, Clone, Default)]
pub struct Attribution {
    pub creator: Option<String>,
    pub holder: Option<String>,
    pub license: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
}

impl Attribution {
    pub fn from_data(data: &Map<String, Value>, prefix: &str) -> Self {
        let field = |name: &str| first_string(data, &format!("{}{}", prefix, name));
        Self {
            creator: field("creator"),
            holder: field("holder"),
            license: field("license"),
            link: field("link"),
            title: field("title"),
        }
    }
}

/// The core (first) field group of a post record, parsed into the
/// fields the migration consumes.
#[derive(Debug, Clone, Default)]
pub struct CoreFields {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub authors: Vec<i64>,
    pub teaser: Option<String>,
    pub intro: Option<String>,
    pub body: Option<String>,
    pub image: Option<FileRef>,
    pub attribution: Attribution,
}

impl CoreFields {
    pub fn from_group(group: &FieldGroup) -> Self {
        let data = &group.data;
        Self {
            title: first_string(data, "title"),
            slug: first_string(data, "slug"),
            authors: int_array(data, "authors"),
            teaser: first_string(data, "teaser"),
            intro: first_string(data, "intro"),
            body: first_string(data, "body"),
            image: data.get("image").and_then(parse_file_ref),
            attribution: Attribution::from_data(data, "image_attribution_"),
        }
    }
}

/// Recognized shapes of a composite body group. Classification happens
/// before any transformation; shapes outside this set are rejected, not
/// guessed at.
#[derive(Debug, Clone)]
pub enum Section {
    /// HTML body content (rich text or some flavor of embed)
    Body(String),
    /// References to standalone resource records, migrated as links
    Resources(Vec<i64>),
    /// An image with attribution metadata
    Image {
        image: FileRef,
        attribution: Attribution,
    },
    /// A standalone file attached to the post
    File(FileRef),
    /// Anything else: skipped with a warning upstream
    Unknown(Vec<String>),
}

pub fn classify_group(group: &FieldGroup) -> Section {
    let data = &group.data;

    if data.contains_key("body") {
        return Section::Body(first_string(data, "body").unwrap_or_default());
    }
    if data.contains_key("selected_resources") {
        return Section::Resources(int_array(data, "selected_resources"));
    }
    if data.contains_key("image") {
        return Section::Image {
            image: data.get("image").and_then(parse_file_ref).unwrap_or_default(),
            attribution: Attribution::from_data(data, "attribution_"),
        };
    }
    if data.contains_key("singlefile") {
        return Section::File(
            data.get("singlefile")
                .and_then(parse_file_ref)
                .unwrap_or_default(),
        );
    }

    Section::Unknown(data.keys().cloned().collect())
}

/// Whether a section group should be published immediately or left as a
/// draft. Anything but an explicit flag defaults to publishing.
pub fn publish_enabled(group: &FieldGroup) -> bool {
    match group.data.get("enabled") {
        Some(Value::Array(items)) => items.first().and_then(Value::as_str) == Some("enabled"),
        _ => true,
    }
}

/// Flavors of HTML body content.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    /// Markup already containing an iframe or script embed
    DirectEmbed,
    /// A lite-youtube widget, to be rewritten into a standard iframe
    LiteYouTube(String),
    /// A lite-vimeo widget, same treatment
    LiteVimeo(String),
    RichText,
}

pub fn classify_body(html: &str) -> BodyKind {
    if EMBED_MARKUP.is_match(html) {
        return BodyKind::DirectEmbed;
    }
    if html.contains("<lite-youtube ") {
        if let Some(captures) = VIDEO_ID.captures(html) {
            return BodyKind::LiteYouTube(captures[1].to_string());
        }
    }
    if html.contains("<lite-vimeo ") {
        if let Some(captures) = VIDEO_ID.captures(html) {
            return BodyKind::LiteVimeo(captures[1].to_string());
        }
    }
    BodyKind::RichText
}

/// Field values arrive as JSON arrays of strings; the first element is
/// the value in the default locale.
pub fn first_string(data: &Map<String, Value>, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::Array(items) => items
            .first()
            .and_then(Value::as_str)
            .map(|s| s.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Id lists may arrive as numbers or numeric strings.
pub fn int_array(data: &Map<String, Value>, key: &str) -> Vec<i64> {
    match data.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_file_ref(value: &Value) -> Option<FileRef> {
    match value {
        Value::Object(_) => serde_json::from_value(value.clone()).ok(),
        _ => None,
    }
}
