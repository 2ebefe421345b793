use serde_json::{Map, Value};

use crate::entries::EntryModel;
use crate::fields;

#[derive(Debug, Clone, Default)]
pub struct Category {
    pub name: Option<String>,
    pub identifier: Option<String>,
}

impl EntryModel for Category {
    const CONTENT_TYPE_ID: &'static str = "category";

    fn fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "name".to_string(),
            fields::short_text_field(fields::opt_string(&self.name)).into(),
        );
        map.insert(
            "identifier".to_string(),
            fields::short_text_field(fields::opt_string(&self.identifier)).into(),
        );
        map
    }
}
