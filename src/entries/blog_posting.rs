use serde_json::{Map, Value};

use crate::entries::EntryModel;
use crate::fields::{self, LinkType};

const MAX_LENGTH_INTRODUCTION: usize = 550;

/// A migrated blog post. Cross-references hold the sys ids of already
/// created entries and assets; link shaping happens in `fields`.
#[derive(Debug, Clone, Default)]
pub struct BlogPosting {
    pub name: Option<String>,
    pub identifier: Option<String>,
    pub date_published: Option<String>,
    pub description: Option<String>,
    pub introduction: Option<String>,
    pub site: Option<String>,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
    pub primary_image: Option<String>,
    pub has_part: Vec<String>,
    pub associated_media: Vec<String>,
}

impl EntryModel for BlogPosting {
    const CONTENT_TYPE_ID: &'static str = "blogPosting";

    fn fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "associatedMedia".to_string(),
            fields::link_field(fields::id_array(&self.associated_media), LinkType::Asset).into(),
        );
        map.insert(
            "author".to_string(),
            fields::link_field(fields::id_array(&self.authors), LinkType::Entry).into(),
        );
        map.insert(
            "categories".to_string(),
            fields::link_field(fields::id_array(&self.categories), LinkType::Entry).into(),
        );
        map.insert(
            "datePublished".to_string(),
            fields::date_field(fields::opt_string(&self.date_published)).into(),
        );
        map.insert(
            "description".to_string(),
            fields::short_text_field(fields::opt_string(&self.description)).into(),
        );
        map.insert(
            "hasPart".to_string(),
            fields::link_field(fields::id_array(&self.has_part), LinkType::Entry).into(),
        );
        map.insert(
            "identifier".to_string(),
            fields::short_text_field(fields::opt_string(&self.identifier)).into(),
        );
        map.insert(
            "introduction".to_string(),
            fields::text_field(
                fields::markdown_text_field(fields::opt_string(&self.introduction)),
                Some(MAX_LENGTH_INTRODUCTION),
            )
            .into(),
        );
        map.insert(
            "name".to_string(),
            fields::short_text_field(fields::opt_string(&self.name)).into(),
        );
        map.insert(
            "primaryImageOfPage".to_string(),
            fields::link_field(fields::opt_string(&self.primary_image), LinkType::Entry).into(),
        );
        map.insert(
            "site".to_string(),
            fields::short_text_field(fields::opt_string(&self.site)).into(),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LOCALE;
    use serde_json::json;

    #[test]
    fn test_fields_shape() {
        let entry = BlogPosting {
            name: Some("Hello".to_string()),
            identifier: Some("hello".to_string()),
            authors: vec!["abc".to_string()],
            ..Default::default()
        };
        let fields = entry.fields();

        assert_eq!(fields["name"], json!({"en-GB": "Hello"}));
        assert_eq!(fields["identifier"], json!({"en-GB": "hello"}));
        assert_eq!(
            fields["author"],
            json!({"en-GB": [{"sys": {"type": "Link", "linkType": "Entry", "id": "abc"}}]})
        );
    }

    #[test]
    fn test_no_authors_is_empty_sequence_not_absent() {
        let entry = BlogPosting::default();
        let fields = entry.fields();
        assert_eq!(fields["author"], json!({"en-GB": []}));
        // whereas an unset scalar field has no locales at all
        assert_eq!(fields["name"], json!({}));
    }

    #[test]
    fn test_associated_media_links_are_assets() {
        let entry = BlogPosting {
            associated_media: vec!["asset1".to_string()],
            ..Default::default()
        };
        let fields = entry.fields();
        assert_eq!(
            fields["associatedMedia"][DEFAULT_LOCALE][0]["sys"]["linkType"],
            json!("Asset")
        );
    }

    #[test]
    fn test_introduction_is_markdown_and_capped() {
        let long = format!("<p>{}</p>", "x".repeat(600));
        let entry = BlogPosting {
            introduction: Some(long),
            ..Default::default()
        };
        let fields = entry.fields();
        let text = fields["introduction"][DEFAULT_LOCALE].as_str().unwrap();
        assert_eq!(text.chars().count(), 550);
        assert!(text.ends_with('…'));
    }
}
