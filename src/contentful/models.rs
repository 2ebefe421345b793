use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::langmap::LangMap;

/// System metadata assigned by the platform.
#[derive(Debug, Clone, Deserialize)]
pub struct Sys {
    pub id: String,
    #[serde(default)]
    pub version: Option<i64>,
}

/// An entry as returned by either API host.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEntry {
    pub sys: Sys,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RemoteEntry {
    /// Read a text field. The management host keys field values by
    /// locale; the preview host resolves them to the requested locale
    /// already. Accept both shapes.
    pub fn field_str(&self, name: &str, locale: &str) -> Option<&str> {
        let value = self.fields.get(name)?;
        match value {
            Value::String(s) => Some(s),
            Value::Object(_) => value.get(locale)?.as_str(),
            _ => None,
        }
    }
}

/// A binary asset as returned by either API host.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteAsset {
    pub sys: Sys,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RemoteAsset {
    /// Processing is complete once the platform has rewritten the file's
    /// upload reference into a served URL.
    pub fn is_processed(&self, locale: &str) -> bool {
        self.fields
            .get("file")
            .and_then(|file| file.get(locale))
            .and_then(|localized| localized.get("url"))
            .and_then(Value::as_str)
            .is_some()
    }

    /// Locales that carry a file and therefore need processing.
    pub fn file_locales(&self) -> Vec<String> {
        match self.fields.get("file") {
            Some(Value::Object(locales)) => locales.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Search result wrapper from the preview host.
#[derive(Debug, Deserialize)]
pub struct EntryCollection {
    pub total: u64,
    #[serde(default)]
    pub items: Vec<RemoteEntry>,
}

/// Entry creation payload: typed field set plus locale-tag metadata for
/// translation workflow membership.
#[derive(Debug, Serialize)]
pub struct EntryPayload {
    pub fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

#[derive(Debug, Serialize, Default)]
pub struct Metadata {
    pub tags: Vec<Value>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct AssetPayload {
    pub fields: AssetFields,
}

#[derive(Debug, Serialize)]
pub struct AssetFields {
    pub title: LangMap,
    pub file: LangMap,
}
