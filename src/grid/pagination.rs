//! Pagination engine

use std::ops::Range;

use serde::Serialize;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page size and 1-based page index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    page_size: usize,
    page_index: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    /// A state on page 1. A page size of 0 is corrected to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page_index: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Change the page size and go back to page 1.
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self::new(page_size)
    }

    /// Same size, page index clamped for `total_items`.
    pub fn go_to(self, page_index: usize, total_items: usize) -> Self {
        Self {
            page_size: self.page_size,
            page_index: page_index.clamp(1, total_pages(total_items, self.page_size)),
        }
    }

    pub fn clamp(self, total_items: usize) -> Self {
        self.go_to(self.page_index, total_items)
    }

    pub fn next(self, total_items: usize) -> Self {
        self.go_to(self.page_index.saturating_add(1), total_items)
    }

    pub fn previous(self) -> Self {
        Self {
            page_size: self.page_size,
            page_index: self.page_index.saturating_sub(1).max(1),
        }
    }

    pub fn first(self) -> Self {
        Self {
            page_size: self.page_size,
            page_index: 1,
        }
    }

    pub fn last(self, total_items: usize) -> Self {
        self.go_to(usize::MAX, total_items)
    }

    /// Slice bounds of the current page, after clamping.
    pub fn range(&self, total_items: usize) -> Range<usize> {
        let index = self.page_index.clamp(1, total_pages(total_items, self.page_size));
        let start = ((index - 1) * self.page_size).min(total_items);
        let end = start.saturating_add(self.page_size).min(total_items);
        start..end
    }
}

/// `max(1, ceil(total_items / page_size))`
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total_items.div_ceil(page_size).max(1)
}

/// One page of a filtered and sorted record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_index: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn is_first(&self) -> bool {
        self.page_index <= 1
    }

    pub fn is_last(&self) -> bool {
        self.page_index >= self.total_pages
    }

    /// 1-based number of the first item on this page, 0 when empty.
    pub fn first_item_number(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page_index - 1) * self.page_size + 1
        }
    }

    /// 1-based number of the last item on this page, 0 when empty.
    pub fn last_item_number(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page_index - 1) * self.page_size + self.items.len()
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_index: self.page_index,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}

/// Slice out the state's page, clamping its index into range.
pub fn paginate<T: Clone>(records: &[T], state: &PaginationState) -> Page<T> {
    let total_items = records.len();
    let state = state.clamp(total_items);
    Page {
        items: records[state.range(total_items)].to_vec(),
        page_index: state.page_index(),
        page_size: state.page_size(),
        total_pages: total_pages(total_items, state.page_size()),
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn first_page_of_fifteen() {
        let page = paginate(&numbers(15), &PaginationState::new(5));
        assert_eq!(page.items, vec![1, 2, 3, 4, 5]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 15);
        assert_eq!(page.first_item_number(), 1);
        assert_eq!(page.last_item_number(), 5);
    }

    #[test]
    fn partial_last_page() {
        let state = PaginationState::new(4).go_to(4, 15);
        let page = paginate(&numbers(15), &state);
        assert_eq!(page.items, vec![13, 14, 15]);
        assert!(page.is_last());
        assert_eq!(page.last_item_number(), 15);
    }

    #[test]
    fn empty_set_has_one_empty_page() {
        let page = paginate::<usize>(&[], &PaginationState::new(5));
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page_index, 1);
        assert_eq!(page.first_item_number(), 0);
    }

    #[test]
    fn index_clamps_at_both_ends() {
        let state = PaginationState::new(5);
        assert_eq!(state.go_to(99, 15).page_index(), 3);
        assert_eq!(state.go_to(0, 15).page_index(), 1);
        assert_eq!(state.previous().page_index(), 1);
        assert_eq!(state.last(15).next(15).page_index(), 3);
    }

    #[test]
    fn stale_index_is_clamped_when_slicing() {
        let state = PaginationState::new(5).go_to(3, 15);
        let page = paginate(&numbers(4), &state);
        assert_eq!(page.page_index, 1);
        assert_eq!(page.items, vec![1, 2, 3, 4]);
    }

    #[test]
    fn page_size_change_resets_index() {
        let state = PaginationState::new(5).go_to(3, 15).with_page_size(10);
        assert_eq!(state.page_index(), 1);
        assert_eq!(state.page_size(), 10);
    }

    #[test]
    fn zero_page_size_is_corrected() {
        assert_eq!(PaginationState::new(0).page_size(), 1);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn pages_cover_every_item_once() {
        let items = numbers(23);
        let mut state = PaginationState::new(5);
        let total = paginate(&items, &state).total_pages;
        let mut seen = Vec::new();
        for index in 1..=total {
            state = state.go_to(index, items.len());
            seen.extend(paginate(&items, &state).items);
        }
        assert_eq!(seen, items);
    }
}
