use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::config::DEFAULT_LOCALE;

/// Locale-keyed value container used for every field submitted to the
/// content platform. The default locale is `en-GB`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LangMap {
    values: BTreeMap<String, Value>,
}

impl LangMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a value under the default locale. Falsy values (null, empty
    /// string, `false`, zero) produce an empty map, so optional legacy
    /// fields serialize as `{}` rather than `{"en-GB": null}`.
    pub fn of(value: impl Into<Value>) -> Self {
        Self::of_locale(value, DEFAULT_LOCALE)
    }

    pub fn of_locale(value: impl Into<Value>, locale: &str) -> Self {
        let value = value.into();
        let mut map = Self::new();
        if !is_falsy(&value) {
            map.values.insert(locale.to_string(), value);
        }
        map
    }

    pub fn insert(&mut self, locale: &str, value: Value) {
        self.values.insert(locale.to_string(), value);
    }

    pub fn get(&self, locale: &str) -> Option<&Value> {
        self.values.get(locale)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// A map with no locales is empty, and so is a map whose only locale
    /// is the default one holding a falsy value.
    pub fn is_empty(&self) -> bool {
        if self.values.is_empty() {
            return true;
        }
        if self.values.len() == 1 {
            if let Some(value) = self.values.get(DEFAULT_LOCALE) {
                return is_falsy(value);
            }
        }
        false
    }
}

impl From<Value> for LangMap {
    fn from(value: Value) -> Self {
        Self::of(value)
    }
}

impl From<LangMap> for Value {
    fn from(map: LangMap) -> Self {
        Value::Object(map.values.into_iter().collect())
    }
}

/// Falsiness follows the legacy store's JSON conventions: null, empty
/// string, `false` and numeric zero. Arrays and objects always count as
/// present, even when empty, so an empty link list survives as a value.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
