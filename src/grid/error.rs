use thiserror::Error;

/// Errors raised while building table configuration.
///
/// Runtime misuse of a [`TableView`](super::TableView) (unknown sort keys,
/// stale ids, out-of-range pages) is corrected silently and never surfaces
/// here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// Two column descriptors share the same key.
    #[error("column key '{key}' is defined more than once")]
    DuplicateColumn { key: String },

    /// A column descriptor was given an empty key.
    #[error("column at position {position} has an empty key")]
    EmptyColumnKey { position: usize },
}
