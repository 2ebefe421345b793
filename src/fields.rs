use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use crate::langmap::LangMap;
use crate::markdown;

pub const MAX_LENGTH_SHORT: usize = 255;
pub const MAX_LENGTH_LONG: usize = 50000;

/// Target kind for link references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Entry,
    Asset,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Entry => "Entry",
            LinkType::Asset => "Asset",
        }
    }
}

/// Apply a handler to a raw locale-keyed value, per locale and per array
/// element when the value is a sequence. Non-LangMap input is lifted
/// under the default locale first. Output has the same shape as input.
pub fn typecast_one_or_many<F>(raw: impl Into<LangMap>, handler: F) -> LangMap
where
    F: Fn(&Value) -> Value,
{
    let langmap = raw.into();
    let mut typecast = LangMap::new();

    for (locale, value) in langmap.iter() {
        let converted = match value {
            Value::Array(elements) => Value::Array(elements.iter().map(&handler).collect()),
            other => handler(other),
        };
        typecast.insert(locale, converted);
    }

    typecast
}

/// Truncate string values to `max` characters, ellipsis included: the
/// boundary is `max - 1` characters plus `…`, never exceeding `max`.
pub fn text_field(raw: impl Into<LangMap>, max: Option<usize>) -> LangMap {
    typecast_one_or_many(raw, |value| match (value, max) {
        (Value::String(s), Some(max)) if s.chars().count() > max => {
            let truncated: String = s.chars().take(max - 1).collect();
            Value::String(format!("{}…", truncated))
        }
        (other, _) => other.clone(),
    })
}

pub fn short_text_field(raw: impl Into<LangMap>) -> LangMap {
    text_field(raw, Some(MAX_LENGTH_SHORT))
}

pub fn long_text_field(raw: impl Into<LangMap>) -> LangMap {
    text_field(raw, Some(MAX_LENGTH_LONG))
}

/// Parse raw date strings into RFC 3339. The legacy store emits
/// `YYYY-MM-DD HH:MM:SS`; anything unparseable passes through raw and is
/// rejected by the management API at publish time.
pub fn date_field(raw: impl Into<LangMap>) -> LangMap {
    typecast_one_or_many(raw, |value| match value {
        Value::String(s) => parse_datetime(s)
            .map(Value::String)
            .unwrap_or_else(|| value.clone()),
        other => other.clone(),
    })
}

fn parse_datetime(raw: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.to_rfc3339());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().to_rfc3339());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().to_rfc3339());
    }
    None
}

/// Wrap target identities into link reference structures. An empty input
/// sequence yields an empty reference sequence, which is distinct from
/// the field being absent altogether.
pub fn link_field(raw: impl Into<LangMap>, link_type: LinkType) -> LangMap {
    typecast_one_or_many(raw, |value| {
        json!({
            "sys": {
                "type": "Link",
                "linkType": link_type.as_str(),
                "id": value,
            }
        })
    })
}

/// Trim string values; everything else passes through.
pub fn trim_field(raw: impl Into<LangMap>) -> LangMap {
    typecast_one_or_many(raw, |value| match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        other => other.clone(),
    })
}

/// Convert HTML fragments to Markdown text.
pub fn markdown_text_field(raw: impl Into<LangMap>) -> LangMap {
    typecast_one_or_many(raw, |value| match value {
        Value::String(s) => Value::String(markdown::html_to_markdown(s)),
        other => other.clone(),
    })
}

/// Lift an optional owned string into a JSON value.
pub fn opt_string(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::String(s.clone()),
        None => Value::Null,
    }
}

/// Lift a sequence of identities into a JSON array value.
pub fn id_array(ids: &[String]) -> Value {
    Value::Array(ids.iter().map(|id| Value::String(id.clone())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LOCALE;
    use serde_json::json;

    #[test]
    fn test_truncation_boundary() {
        let result = text_field(Value::String("abcdefghijk".into()), Some(10));
        assert_eq!(
            result.get(DEFAULT_LOCALE),
            Some(&Value::String("abcdefghi…".into()))
        );
        // 9 characters plus the ellipsis glyph, 10 total
        let truncated = result.get(DEFAULT_LOCALE).unwrap().as_str().unwrap();
        assert_eq!(truncated.chars().count(), 10);
    }

    #[test]
    fn test_short_text_within_limit_unchanged() {
        let result = short_text_field(Value::String("short enough".into()));
        assert_eq!(
            result.get(DEFAULT_LOCALE),
            Some(&Value::String("short enough".into()))
        );
    }

    #[test]
    fn test_text_field_applies_per_array_element() {
        let result = text_field(json!(["abcdefghijk", "ok"]), Some(10));
        assert_eq!(
            result.get(DEFAULT_LOCALE),
            Some(&json!(["abcdefghi…", "ok"]))
        );
    }

    #[test]
    fn test_link_field_single() {
        let result = link_field(Value::String("abc123".into()), LinkType::Entry);
        assert_eq!(
            result.get(DEFAULT_LOCALE),
            Some(&json!({"sys": {"type": "Link", "linkType": "Entry", "id": "abc123"}}))
        );
    }

    #[test]
    fn test_link_field_asset_kind() {
        let result = link_field(json!(["a1"]), LinkType::Asset);
        assert_eq!(
            result.get(DEFAULT_LOCALE),
            Some(&json!([{"sys": {"type": "Link", "linkType": "Asset", "id": "a1"}}]))
        );
    }

    #[test]
    fn test_link_field_empty_sequence_is_present() {
        let result = link_field(json!([]), LinkType::Entry);
        assert_eq!(result.get(DEFAULT_LOCALE), Some(&json!([])));
        assert!(!result.is_empty());

        // An absent field produces no locales at all.
        let absent = link_field(Value::Null, LinkType::Entry);
        assert!(absent.get(DEFAULT_LOCALE).is_none());
    }

    #[test]
    fn test_date_field_parses_legacy_shape() {
        let result = date_field(Value::String("2021-03-15 09:30:00".into()));
        assert_eq!(
            result.get(DEFAULT_LOCALE),
            Some(&Value::String("2021-03-15T09:30:00+00:00".into()))
        );
    }

    #[test]
    fn test_date_field_passes_through_garbage() {
        let result = date_field(Value::String("not a date".into()));
        assert_eq!(
            result.get(DEFAULT_LOCALE),
            Some(&Value::String("not a date".into()))
        );
    }

    #[test]
    fn test_trim_field() {
        let result = trim_field(Value::String("  padded  ".into()));
        assert_eq!(result.get(DEFAULT_LOCALE), Some(&Value::String("padded".into())));
    }
}
