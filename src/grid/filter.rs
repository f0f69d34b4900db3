//! Filter/search engine

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::Record;

/// Global free-text query plus per-column text filters.
///
/// Empty strings carry no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub per_column: BTreeMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    pub fn with_column(mut self, key: &str, value: &str) -> Self {
        self.set_column(key, value);
        self
    }

    /// Set or clear (with an empty value) the filter for one column.
    pub fn set_column(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.per_column.remove(key);
        } else {
            self.per_column.insert(key.to_string(), value.to_string());
        }
    }

    pub fn column(&self, key: &str) -> Option<&str> {
        self.per_column.get(key).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.per_column.clear();
    }

    /// True when no constraint is active.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.per_column.values().all(String::is_empty)
    }

    /// Number of active constraints, counting the global query as one.
    pub fn active_count(&self) -> usize {
        let query = usize::from(!self.query.is_empty());
        query + self.per_column.values().filter(|v| !v.is_empty()).count()
    }
}

/// Whether a record satisfies every active constraint.
pub fn matches<R: Record + ?Sized>(record: &R, state: &FilterState) -> bool {
    if !state.query.is_empty() {
        let query = state.query.to_lowercase();
        let hit = record
            .values()
            .iter()
            .any(|value| value.search_text().contains(&query));
        if !hit {
            return false;
        }
    }

    state
        .per_column
        .iter()
        .filter(|(_, needle)| !needle.is_empty())
        .all(|(key, needle)| {
            record
                .field(key)
                .search_text()
                .contains(&needle.to_lowercase())
        })
}

/// Records satisfying the filter, in their incoming order.
pub fn filter<T: Record + Clone>(records: &[T], state: &FilterState) -> Vec<T> {
    if state.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| matches(*record, state))
        .cloned()
        .collect()
}
