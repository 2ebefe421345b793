use serde_json::{Map, Value};

use crate::entries::EntryModel;
use crate::fields;

/// An external resource link presented as a button within a post body.
#[derive(Debug, Clone, Default)]
pub struct Link {
    pub text: Option<String>,
    pub url: String,
}

/// A few legacy links are missing their scheme: bare `www.` hosts get
/// http, addresses get the mail scheme, anything else passes through.
fn infer_scheme(url: &str) -> String {
    if url.contains("://") {
        return url.to_string();
    }
    if url.starts_with("www.") {
        return format!("http://{}", url);
    }
    if url.contains('@') {
        return format!("mailto://{}", url);
    }
    url.to_string()
}

impl EntryModel for Link {
    const CONTENT_TYPE_ID: &'static str = "link";

    fn fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "text".to_string(),
            fields::short_text_field(fields::opt_string(&self.text)).into(),
        );
        map.insert(
            "url".to_string(),
            fields::long_text_field(Value::String(infer_scheme(&self.url))).into(),
        );
        map
    }
}
