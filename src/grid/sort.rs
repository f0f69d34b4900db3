//! Sort engine

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::column::Columns;
use super::record::Record;
use super::value::Value;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Ascending
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

impl From<&str> for SortDirection {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "desc" | "descending" => Self::Descending,
            _ => Self::Ascending,
        }
    }
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// Active sort column and direction. `None` at the call sites means the
/// records keep their original order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: &str, direction: SortDirection) -> Self {
        Self {
            key: key.to_string(),
            direction,
        }
    }

    pub fn ascending(key: &str) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    pub fn descending(key: &str) -> Self {
        Self::new(key, SortDirection::Descending)
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.direction)
    }
}

/// Next state when a column header is activated.
///
/// Same column cycles unsorted -> ascending -> descending -> unsorted;
/// another column starts over at ascending.
pub fn next_sort(current: Option<&SortState>, key: &str) -> Option<SortState> {
    match current {
        Some(state) if state.key == key => match state.direction {
            SortDirection::Ascending => Some(SortState::descending(key)),
            SortDirection::Descending => None,
        },
        _ => Some(SortState::ascending(key)),
    }
}

/// [`next_sort`] restricted to sortable columns. Activating an unknown or
/// non-sortable column leaves the state untouched.
pub fn toggle_sort<R>(
    columns: &Columns<R>,
    current: Option<&SortState>,
    key: &str,
) -> Option<SortState> {
    if !columns.is_sortable(key) {
        tracing::debug!("Ignoring sort request on non-sortable column '{}'", key);
        return current.cloned();
    }
    next_sort(current, key)
}

/// Compare two raw values in ascending order.
///
/// Numbers (and numeric text) compare numerically, everything else as text.
/// Nulls rank after every other value.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }

    collate(&a.to_string(), &b.to_string())
}

/// Locale-style text collation: case-insensitive first, then lowercase
/// before uppercase at the first differing character.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a.to_lowercase().cmp(&b.to_lowercase());
    if folded != Ordering::Equal {
        return folded;
    }

    for (x, y) in a.chars().zip(b.chars()) {
        if x != y {
            return match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => x.cmp(&y),
            };
        }
    }
    a.cmp(b)
}

/// Order records by the state's key and direction.
///
/// Stable: records with equal keys keep their incoming order in both
/// directions.
pub fn sort<T: Record + Clone>(records: &[T], state: Option<&SortState>) -> Vec<T> {
    let Some(state) = state else {
        return records.to_vec();
    };

    let mut keyed: Vec<(Value, &T)> = records
        .iter()
        .map(|record| (record.field(&state.key), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_values(a, b);
        match state.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, record)| record.clone()).collect()
}
