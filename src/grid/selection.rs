//! Selection tracker

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Rows that select-all applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectScope {
    /// Only the rows of the visible page
    #[default]
    CurrentPage,
    /// Every row matching the current filter, on any page
    AcrossPages,
}

/// How much of a scope is selected, for a header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    None,
    Some,
    All,
}

impl SelectAllState {
    pub fn checkbox(&self) -> &'static str {
        match self {
            Self::None => "[ ]",
            Self::Some => "[-]",
            Self::All => "[x]",
        }
    }
}

/// Selected record identities.
///
/// Only ids from the known universe can be selected, so a stale id left over
/// from an earlier data set never lingers. Sort and filter changes do not
/// touch the selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    known: HashSet<String>,
    selected: HashSet<String>,
}

impl SelectionTracker {
    pub fn new<I, S>(known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: known.into_iter().map(Into::into).collect(),
            selected: HashSet::new(),
        }
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.known.contains(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Returns true when the selection changed.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.is_known(id) {
            tracing::debug!("Ignoring selection of unknown id '{}'", id);
            return false;
        }
        self.selected.insert(id.to_string())
    }

    pub fn deselect(&mut self, id: &str) -> bool {
        self.selected.remove(id)
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        if self.is_selected(id) {
            self.deselect(id)
        } else {
            self.select(id)
        }
    }

    /// Add every given id. Already selected ids outside `ids` stay selected.
    pub fn select_all<'a, I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut changed = false;
        for id in ids {
            changed |= self.select(id);
        }
        changed
    }

    pub fn deselect_all<'a, I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut changed = false;
        for id in ids {
            changed |= self.deselect(id);
        }
        changed
    }

    /// Deselect the scope when it is fully selected, otherwise select it.
    pub fn toggle_all<'a, I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        if self.scope_state(ids.clone()) == SelectAllState::All {
            self.deselect_all(ids)
        } else {
            self.select_all(ids)
        }
    }

    pub fn scope_state<'a, I>(&self, ids: I) -> SelectAllState
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut total = 0;
        let mut selected = 0;
        for id in ids {
            total += 1;
            if self.is_selected(id) {
                selected += 1;
            }
        }
        match selected {
            0 => SelectAllState::None,
            n if n == total => SelectAllState::All,
            _ => SelectAllState::Some,
        }
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Replace the known universe, dropping selections that no longer exist.
    pub fn retain_known<I, S>(&mut self, known: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known = known.into_iter().map(Into::into).collect();
        let before = self.selected.len();
        let known = &self.known;
        self.selected.retain(|id| known.contains(id));
        before != self.selected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> SelectionTracker {
        SelectionTracker::new(["a", "b", "c", "d"])
    }

    #[test]
    fn select_and_deselect() {
        let mut sel = tracker();
        assert!(sel.select("a"));
        assert!(!sel.select("a"));
        assert!(sel.is_selected("a"));
        assert!(sel.deselect("a"));
        assert!(!sel.deselect("a"));
        assert!(sel.is_empty());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut sel = tracker();
        assert!(!sel.select("zzz"));
        assert!(!sel.toggle("zzz"));
        assert!(!sel.is_selected("zzz"));
        assert!(sel.is_empty());
    }

    #[test]
    fn toggle_flips_membership() {
        let mut sel = tracker();
        assert!(sel.toggle("b"));
        assert!(sel.is_selected("b"));
        assert!(sel.toggle("b"));
        assert!(!sel.is_selected("b"));
    }

    #[test]
    fn select_all_keeps_earlier_selection() {
        let mut sel = tracker();
        sel.select("a");
        sel.select_all(["c", "d"]);
        assert_eq!(sel.len(), 3);
        assert!(sel.is_selected("a"));
    }

    #[test]
    fn toggle_all_and_scope_state() {
        let mut sel = tracker();
        let scope = ["a", "b"];
        assert_eq!(sel.scope_state(scope), SelectAllState::None);
        sel.select("a");
        assert_eq!(sel.scope_state(scope), SelectAllState::Some);
        sel.toggle_all(scope);
        assert_eq!(sel.scope_state(scope), SelectAllState::All);
        sel.select("c");
        sel.toggle_all(scope);
        assert_eq!(sel.scope_state(scope), SelectAllState::None);
        assert!(sel.is_selected("c"));
    }

    #[test]
    fn empty_scope_reads_as_none() {
        let sel = tracker();
        assert_eq!(sel.scope_state(std::iter::empty()), SelectAllState::None);
    }

    #[test]
    fn refresh_drops_stale_ids() {
        let mut sel = tracker();
        sel.select_all(["a", "b"]);
        assert!(sel.retain_known(["b", "e"]));
        assert!(!sel.is_selected("a"));
        assert!(sel.is_selected("b"));
        assert!(sel.select("e"));
        assert!(!sel.select("a"));
    }

    #[test]
    fn clear_reports_change_once() {
        let mut sel = tracker();
        sel.select("d");
        assert!(sel.clear());
        assert!(!sel.clear());
    }
}
