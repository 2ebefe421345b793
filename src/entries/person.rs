use serde_json::{Map, Value};

use crate::entries::EntryModel;
use crate::fields;
use crate::identity::hashed_sys_id;

#[derive(Debug, Clone, Default)]
pub struct Person {
    pub name: Option<String>,
    pub affiliation: Option<String>,
    pub url: Option<String>,
}

impl Person {
    /// Stable identity derived from the legacy author id. The synthetic
    /// address keeps ids unique across entity kinds sharing the hash
    /// space, and identical across re-runs.
    pub fn sys_id_from_legacy_id(id: i64) -> String {
        hashed_sys_id(&format!("person.{}@pro.europeana.eu", id))
    }
}

impl EntryModel for Person {
    const CONTENT_TYPE_ID: &'static str = "person";

    fn fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "name".to_string(),
            fields::short_text_field(fields::opt_string(&self.name)).into(),
        );
        map.insert(
            "affiliation".to_string(),
            fields::short_text_field(fields::opt_string(&self.affiliation)).into(),
        );
        map.insert(
            "url".to_string(),
            fields::short_text_field(fields::opt_string(&self.url)).into(),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sys_id_is_stable_across_runs() {
        assert_eq!(
            Person::sys_id_from_legacy_id(42),
            "efd8d11088b020d25a733ab8402136f7"
        );
        assert_eq!(
            Person::sys_id_from_legacy_id(42),
            Person::sys_id_from_legacy_id(42)
        );
        assert_ne!(
            Person::sys_id_from_legacy_id(42),
            Person::sys_id_from_legacy_id(43)
        );
    }
}
