use serde_json::{Map, Value};

use crate::entries::EntryModel;
use crate::fields;

/// Raw embed markup (iframes, scripts). Untranslated: the markup is the
/// same in every locale.
#[derive(Debug, Clone, Default)]
pub struct Embed {
    pub name: Option<String>,
    pub embed: Option<String>,
}

impl EntryModel for Embed {
    const CONTENT_TYPE_ID: &'static str = "embed";
    const TRANSLATE: bool = false;

    fn fields(&self) -> Map<String, Value> {
        let name = self
            .name
            .clone()
            .filter(|n| !n.is_empty())
            // TODO: default to something more informative of context, e.g. the embed url
            .unwrap_or_else(|| "Blog post embed".to_string());

        let mut map = Map::new();
        map.insert(
            "name".to_string(),
            fields::short_text_field(Value::String(name)).into(),
        );
        map.insert(
            "embed".to_string(),
            fields::long_text_field(fields::opt_string(&self.embed)).into(),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_falls_back() {
        let entry = Embed {
            name: None,
            embed: Some("<iframe src=\"x\"></iframe>".to_string()),
        };
        assert_eq!(entry.fields()["name"], json!({"en-GB": "Blog post embed"}));
    }
}
