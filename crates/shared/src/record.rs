//! Opaque server documents and pagination pages.
//!
//! The orchestration layer routes and caches these without interpreting their
//! shape beyond `id`, `version` and the nested OTU isolate/sequence ids.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds a record from a JSON value, rejecting anything but an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Server-assigned identifier. Numeric ids (labels) are rendered as
    /// strings so every slice keys by `String`.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    pub fn version(&self) -> Option<u64> {
        self.0.get("version").and_then(Value::as_u64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Shallow merge of `other` into `self`; keys in `other` win.
    pub fn merge(&mut self, other: &Record) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Nested object records stored under `key` (e.g. an OTU's `isolates`).
    pub fn children(&self, key: &str) -> Vec<Record> {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| Record::from_value(item.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_children(&mut self, key: &str, children: Vec<Record>) {
        let items = children.into_iter().map(Record::into_value).collect();
        self.0.insert(key.to_string(), Value::Array(items));
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    pub documents: Vec<Record>,
    #[serde(default)]
    pub found_count: u64,
    #[serde(default = "first_page")]
    pub page: u64,
    #[serde(default = "first_page")]
    pub page_count: u64,
    #[serde(default)]
    pub per_page: u64,
    #[serde(default)]
    pub total_count: u64,
    /// Slice-specific extras such as `modified_count` or HMM `status`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn first_page() -> u64 {
    1
}

impl Page {
    /// Wraps an unpaginated array as a single page.
    pub fn single(documents: Vec<Record>) -> Self {
        let count = documents.len() as u64;
        Self {
            documents,
            found_count: count,
            page: 1,
            page_count: 1,
            per_page: count,
            total_count: count,
            extra: Map::new(),
        }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.documents
            .iter()
            .position(|document| document.id().as_deref() == Some(id))
    }

    /// Replaces the listed copy of `record`, if present. Returns whether a
    /// replacement happened.
    pub fn replace(&mut self, record: &Record) -> bool {
        let Some(id) = record.id() else {
            return false;
        };
        match self.position(&id) {
            Some(index) => {
                self.documents[index] = record.clone();
                true
            }
            None => false,
        }
    }

    /// Appends `record` unless it is already listed.
    pub fn append(&mut self, record: &Record) {
        if self.replace(record) {
            return;
        }
        self.documents.push(record.clone());
        self.found_count += 1;
        self.total_count += 1;
    }

    /// Drops the listed copy of `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.documents.remove(index);
                self.found_count = self.found_count.saturating_sub(1);
                self.total_count = self.total_count.saturating_sub(1);
                true
            }
            None => false,
        }
    }
}
