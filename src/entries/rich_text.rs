use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::{Map, Value};

use crate::entries::EntryModel;
use crate::fields;
use crate::markdown;

const MAX_LENGTH_HEADLINE: usize = 150;

static H2: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());

/// A rich text section of a post body, stored as Markdown.
#[derive(Debug, Clone, Default)]
pub struct RichText {
    pub headline: Option<String>,
    pub text: String,
}

impl RichText {
    /// Derive a headline when none is given: the first section heading,
    /// else the whole text stripped of markup (truncated downstream).
    fn headline_from_text(&self) -> String {
        let fragment = Html::parse_fragment(&self.text);
        if let Some(heading) = fragment.select(&H2).next() {
            let text: String = heading.text().collect();
            if !text.is_empty() {
                return text;
            }
        }
        markdown::plain_text(&self.text)
    }
}

impl EntryModel for RichText {
    const CONTENT_TYPE_ID: &'static str = "richText";

    fn fields(&self) -> Map<String, Value> {
        let headline = self
            .headline
            .clone()
            .unwrap_or_else(|| self.headline_from_text());

        let mut map = Map::new();
        map.insert(
            "headline".to_string(),
            fields::text_field(Value::String(headline), Some(MAX_LENGTH_HEADLINE)).into(),
        );
        map.insert(
            "text".to_string(),
            fields::long_text_field(fields::markdown_text_field(Value::String(
                self.text.clone(),
            )))
            .into(),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline_from_first_heading() {
        let entry = RichText {
            headline: None,
            text: "<h2>Section title</h2><p>Body</p>".to_string(),
        };
        assert_eq!(entry.fields()["headline"], json!({"en-GB": "Section title"}));
    }

    #[test]
    fn test_headline_falls_back_to_plain_text() {
        let entry = RichText {
            headline: None,
            text: "<p>Just a <b>paragraph</b></p>".to_string(),
        };
        assert_eq!(entry.fields()["headline"], json!({"en-GB": "Just a paragraph"}));
    }

    #[test]
    fn test_explicit_headline_wins() {
        let entry = RichText {
            headline: Some("Given".to_string()),
            text: "<h2>Ignored</h2>".to_string(),
        };
        assert_eq!(entry.fields()["headline"], json!({"en-GB": "Given"}));
    }

    #[test]
    fn test_text_is_converted_to_markdown() {
        let entry = RichText {
            headline: Some("x".to_string()),
            text: "<p>Hello <strong>there</strong></p>".to_string(),
        };
        assert_eq!(entry.fields()["text"], json!({"en-GB": "Hello **there**"}));
    }
}
