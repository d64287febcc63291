//! Cross-cutting request errors, keyed by category.
//!
//! A key holds an entry only between a failure and the next request (or
//! explicit clear) of the same category. Categories whose failures are not
//! rendered inline never get a key; the store forwards those failures to the
//! error reporter instead.

use im::OrdMap;
use serde::{ser::SerializeMap, Serialize, Serializer};
use shared::{error::ErrorEntry, protocol::Failed, Action, Category};

use super::Reducer;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorsState {
    entries: OrdMap<Category, Option<ErrorEntry>>,
}

impl ErrorsState {
    /// Current error for `category`, if one is recorded.
    pub fn get(&self, category: Category) -> Option<&ErrorEntry> {
        self.entries.get(&category).and_then(Option::as_ref)
    }

    /// Whether `category` has ever been written (even if since cleared).
    pub fn has_key(&self, category: Category) -> bool {
        self.entries.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn with(&self, category: Category, entry: Option<ErrorEntry>) -> Self {
        Self {
            entries: self.entries.update(category, entry),
        }
    }
}

impl Reducer for ErrorsState {
    fn reduce(&self, action: &Action) -> Option<Self> {
        match action {
            Action::ClearError(category) => Some(self.with(*category, None)),
            Action::Failed(Failed {
                request, failure, ..
            }) => {
                let category = request.category();
                ErrorEntry::for_shape(category.error_shape(), failure)
                    .map(|entry| self.with(category, Some(entry)))
            }
            Action::Requested(request) => {
                let category = request.category();
                self.get(category).map(|_| self.with(category, None))
            }
            _ => None,
        }
    }
}

impl Serialize for ErrorsState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, entry) in &self.entries {
            map.serialize_entry(&category.error_key(), entry)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
