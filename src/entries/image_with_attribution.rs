use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::entries::EntryModel;
use crate::fields::{self, LinkType};
use crate::langmap::LangMap;
use crate::rights;

// Legacy attribution links point at assorted renditions of item detail
// pages; all of them collapse onto the canonical item URI.
static ITEM_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"europeana\.eu(/portal)?/([a-z][a-z]/)?(record|item)(/[0-9]+/[^/.#$]+)").unwrap()
});

/// An image section with attribution metadata, linking the stored asset.
#[derive(Debug, Clone, Default)]
pub struct ImageWithAttribution {
    pub name: Option<String>,
    /// Sys id of the backing asset
    pub image: Option<String>,
    pub creator: Option<String>,
    pub provider: Option<String>,
    pub license: Option<String>,
    pub url: Option<String>,
}

fn normalise_url(raw: LangMap) -> LangMap {
    fields::typecast_one_or_many(raw, |value| {
        let Value::String(url) = value else {
            return value.clone();
        };

        if let Some(captures) = ITEM_URL.captures(url) {
            return Value::String(format!("http://data.europeana.eu/item{}", &captures[4]));
        }

        if url.starts_with("www.") {
            return Value::String(format!("https://{}", url));
        }

        if url.starts_with("http://") || url.starts_with("https://") {
            value.clone()
        } else {
            // no recognized scheme: better no link than a broken one
            Value::Null
        }
    })
}

impl EntryModel for ImageWithAttribution {
    const CONTENT_TYPE_ID: &'static str = "imageWithAttribution";

    fn fields(&self) -> Map<String, Value> {
        let mut title = self.name.clone();
        let mut resolved_rights = self
            .license
            .as_deref()
            .map(str::trim)
            .and_then(rights::rights_from_abbreviation)
            .map(String::from);

        // No usable abbreviation: some records carry the license inside
        // the image title instead. A single unambiguous token wins and
        // is stripped from the title.
        if resolved_rights.is_none() {
            if let Some(name) = self.name.as_deref() {
                if let Some(extracted) = rights::extract_rights_from_title(name.trim()) {
                    resolved_rights = Some(extracted.rights.to_string());
                    title = Some(extracted.title);
                }
            }
        }

        let license = resolved_rights.or_else(|| self.license.clone());

        let mut map = Map::new();
        map.insert(
            "name".to_string(),
            fields::short_text_field(fields::opt_string(&title)).into(),
        );
        map.insert(
            "image".to_string(),
            fields::link_field(fields::opt_string(&self.image), LinkType::Asset).into(),
        );
        map.insert(
            "creator".to_string(),
            fields::short_text_field(fields::opt_string(&self.creator)).into(),
        );
        map.insert(
            "provider".to_string(),
            fields::short_text_field(fields::opt_string(&self.provider)).into(),
        );
        map.insert(
            "license".to_string(),
            fields::short_text_field(fields::opt_string(&license)).into(),
        );
        map.insert(
            "url".to_string(),
            fields::long_text_field(normalise_url(fields::trim_field(fields::opt_string(
                &self.url,
            ))))
            .into(),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LOCALE;
    use serde_json::json;

    fn normalised(url: &str) -> Value {
        let map = normalise_url(LangMap::of(url));
        map.get(DEFAULT_LOCALE).cloned().unwrap_or(Value::Null)
    }

    #[test]
    fn test_item_detail_urls_collapse_to_canonical_form() {
        assert_eq!(
            normalised("https://www.europeana.eu/en/item/2024903/photography_ProvidedCHO_X"),
            json!("http://data.europeana.eu/item/2024903/photography_ProvidedCHO_X")
        );
        assert_eq!(
            normalised("https://www.europeana.eu/portal/record/90402/SK_A_2344"),
            json!("http://data.europeana.eu/item/90402/SK_A_2344")
        );
    }

    #[test]
    fn test_bare_www_upgraded_to_https() {
        assert_eq!(normalised("www.example.org/page"), json!("https://www.example.org/page"));
    }

    #[test]
    fn test_unrecognized_scheme_dropped() {
        assert_eq!(normalised("ftp://example.org/file"), Value::Null);
        // dropping turns the whole field empty since null is falsy
        let map = normalise_url(LangMap::of("not a url"));
        assert_eq!(map.get(DEFAULT_LOCALE), Some(&Value::Null));
    }

    #[test]
    fn test_https_url_kept() {
        assert_eq!(
            normalised("https://museum.example.org/collection"),
            json!("https://museum.example.org/collection")
        );
    }

    #[test]
    fn test_license_resolved_from_abbreviation() {
        let entry = ImageWithAttribution {
            name: Some("A painting".to_string()),
            license: Some("CC-BY".to_string()),
            ..Default::default()
        };
        let fields = entry.fields();
        assert_eq!(
            fields["license"],
            json!({"en-GB": "http://creativecommons.org/licenses/by/4.0/"})
        );
        assert_eq!(fields["name"], json!({"en-GB": "A painting"}));
    }

    #[test]
    fn test_license_recovered_from_title_and_stripped() {
        let entry = ImageWithAttribution {
            name: Some("A painting (CC0) from the museum".to_string()),
            license: None,
            ..Default::default()
        };
        let fields = entry.fields();
        assert_eq!(
            fields["license"],
            json!({"en-GB": "http://creativecommons.org/publicdomain/zero/1.0/"})
        );
        assert_eq!(fields["name"], json!({"en-GB": "A painting from the museum"}));
    }

    #[test]
    fn test_unknown_license_passes_through_raw() {
        let entry = ImageWithAttribution {
            name: Some("Untitled".to_string()),
            license: Some("All rights reserved".to_string()),
            ..Default::default()
        };
        assert_eq!(
            entry.fields()["license"],
            json!({"en-GB": "All rights reserved"})
        );
    }
}
