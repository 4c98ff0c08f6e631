use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Raw form submission as relayed by the automation platform.
///
/// Keys are whatever the form tool exported: snake_case names, Airtable
/// column names, or the literal question text. Values are kept as JSON so a
/// number typed into a form and a single-select label travel the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadRecord(BTreeMap<String, Value>);

impl LeadRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for fixtures and the CLI.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Trimmed text form of a single key, `None` when missing or blank.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(coerce_text)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for LeadRecord {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self(value)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for LeadRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Coerces a form value to trimmed text.
///
/// Multi-select answers arrive as arrays and are joined; nested objects carry
/// nothing the scorer can read and count as absent.
pub(crate) fn coerce_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null | Value::Object(_) => return None,
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number_text(number),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(coerce_text)
            .collect::<Vec<_>>()
            .join(", "),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Integers keep their exact digits. Floats use `f64` display, which drops a
/// zero fraction, so `1.0` reads as "1" like the integer would.
fn number_text(number: &Number) -> String {
    if number.is_f64() {
        if let Some(value) = number.as_f64() {
            return value.to_string();
        }
    }
    number.to_string()
}
