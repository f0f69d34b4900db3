//! Tabular data view
//!
//! `TableView` is the stateful container a host owns. It keeps the sort,
//! filter, pagination and selection state for one record set and re-runs the
//! pure engines (filter, then sort, then paginate) whenever that state
//! changes. Hosts observe changes through the `on_*` callbacks.

use std::collections::HashSet;
use std::sync::Arc;

use super::column::{Column, Columns};
use super::filter::{self, FilterState};
use super::pagination::{paginate, Page, PaginationState};
use super::record::Record;
use super::selection::{SelectAllState, SelectScope, SelectionTracker};
use super::sort::{self, SortState};
use super::value::Value;

/// Derives a record's identity.
pub type RecordIdFn<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

type SelectionCallback<R> = Box<dyn FnMut(&[&R])>;
type IndexCallback = Box<dyn FnMut(usize)>;
type SortCallback = Box<dyn FnMut(Option<&SortState>)>;

/// A row of the filtered and sorted set, pointing back at its record.
pub struct ViewRow<'a, R> {
    /// Position in the original, unsorted record set
    pub index: usize,
    pub id: &'a str,
    pub record: &'a R,
}

impl<R> Clone for ViewRow<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for ViewRow<'_, R> {}

impl<R: Record> Record for ViewRow<'_, R> {
    fn field(&self, key: &str) -> Value {
        self.record.field(key)
    }

    fn values(&self) -> Vec<Value> {
        self.record.values()
    }
}

struct Listeners<R> {
    selection: Option<SelectionCallback<R>>,
    page: Option<IndexCallback>,
    page_size: Option<IndexCallback>,
    sort: Option<SortCallback>,
}

impl<R> Default for Listeners<R> {
    fn default() -> Self {
        Self {
            selection: None,
            page: None,
            page_size: None,
            sort: None,
        }
    }
}

/// Sortable, filterable, paginated and selectable view over a record set.
pub struct TableView<R> {
    columns: Columns<R>,
    records: Vec<R>,
    ids: Vec<String>,
    record_id: Option<RecordIdFn<R>>,
    sort: Option<SortState>,
    filter: FilterState,
    pagination: PaginationState,
    selection: SelectionTracker,
    select_scope: SelectScope,
    /// Original indices of the filtered and sorted rows
    rows: Vec<usize>,
    listeners: Listeners<R>,
}

impl<R: Record> TableView<R> {
    pub fn new(columns: Columns<R>, records: Vec<R>) -> Self {
        let mut view = Self {
            columns,
            records,
            ids: Vec::new(),
            record_id: None,
            sort: None,
            filter: FilterState::default(),
            pagination: PaginationState::default(),
            selection: SelectionTracker::default(),
            select_scope: SelectScope::default(),
            rows: Vec::new(),
            listeners: Listeners::default(),
        };
        view.rebuild_ids();
        view.selection = SelectionTracker::new(view.ids.iter().cloned());
        view.refresh_rows();
        view
    }

    // -------------------------------------------------------------------------
    // Builder
    // -------------------------------------------------------------------------

    /// Use a caller-supplied identity instead of the original position.
    pub fn with_record_id<F>(mut self, record_id: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        self.record_id = Some(Arc::new(record_id));
        self.rebuild_ids();
        self.selection = SelectionTracker::new(self.ids.iter().cloned());
        self
    }

    pub fn with_sort(mut self, sort: Option<SortState>) -> Self {
        self.sort = self.sanitize_sort(sort);
        self.refresh_rows();
        self
    }

    /// Initial filters. Column filters on unknown or non-filterable columns
    /// are dropped.
    pub fn with_filter(mut self, mut filter: FilterState) -> Self {
        let columns = &self.columns;
        filter.per_column.retain(|key, _| {
            let keep = columns.is_filterable(key);
            if !keep {
                tracing::debug!("Dropping filter on non-filterable column '{}'", key);
            }
            keep
        });
        self.filter = filter;
        self.refresh_rows();
        self.pagination = self.pagination.clamp(self.rows.len());
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.pagination = self.pagination.with_page_size(page_size);
        self
    }

    pub fn with_page(mut self, page_index: usize) -> Self {
        self.pagination = self.pagination.go_to(page_index, self.rows.len());
        self
    }

    pub fn with_select_scope(mut self, scope: SelectScope) -> Self {
        self.select_scope = scope;
        self
    }

    pub fn on_selection_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&[&R]) + 'static,
    {
        self.listeners.selection = Some(Box::new(callback));
        self
    }

    pub fn on_page_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize) + 'static,
    {
        self.listeners.page = Some(Box::new(callback));
        self
    }

    pub fn on_page_size_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize) + 'static,
    {
        self.listeners.page_size = Some(Box::new(callback));
        self
    }

    pub fn on_sort_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Option<&SortState>) + 'static,
    {
        self.listeners.sort = Some(Box::new(callback));
        self
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    pub fn columns(&self) -> &Columns<R> {
        &self.columns
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn select_scope(&self) -> SelectScope {
        self.select_scope
    }

    /// Number of records before filtering.
    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    /// Number of records matching the current filter.
    pub fn filtered_count(&self) -> usize {
        self.rows.len()
    }

    /// The visible page.
    pub fn page(&self) -> Page<ViewRow<'_, R>> {
        paginate(&self.rows, &self.pagination).map(|index| self.view_row(index))
    }

    /// Every filtered row in sorted order, across all pages.
    pub fn rows(&self) -> Vec<ViewRow<'_, R>> {
        self.rows.iter().map(|&index| self.view_row(index)).collect()
    }

    /// Display text of one cell, empty for an unknown column.
    pub fn cell(&self, record: &R, key: &str) -> String {
        self.columns
            .get(key)
            .map(|column| column.display(record))
            .unwrap_or_default()
    }

    pub fn column(&self, key: &str) -> Option<&Column<R>> {
        self.columns.get(key)
    }

    pub fn record_id(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Replace the record set. Selections whose ids disappeared are dropped.
    pub fn set_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.rebuild_ids();
        let pruned = self.selection.retain_known(self.ids.iter().cloned());
        self.refresh_rows();
        self.clamp_page();
        if pruned {
            self.notify_selection();
        }
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Activate a column header: unsorted -> ascending -> descending ->
    /// unsorted. Non-sortable columns are ignored.
    pub fn toggle_sort(&mut self, key: &str) {
        let next = sort::toggle_sort(&self.columns, self.sort.as_ref(), key);
        self.apply_sort(next);
    }

    /// Replace the sort state. A key that is not a sortable column is treated
    /// as no sort.
    pub fn set_sort(&mut self, sort: Option<SortState>) {
        let next = self.sanitize_sort(sort);
        self.apply_sort(next);
    }

    fn apply_sort(&mut self, next: Option<SortState>) {
        if next == self.sort {
            return;
        }
        self.sort = next;
        self.refresh_rows();
        tracing::debug!(
            "Sort changed to {}",
            self.sort
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "none".to_string())
        );
        if let Some(callback) = self.listeners.sort.as_mut() {
            callback(self.sort.as_ref());
        }
    }

    fn sanitize_sort(&self, sort: Option<SortState>) -> Option<SortState> {
        match sort {
            Some(state) if self.columns.is_sortable(&state.key) => Some(state),
            Some(state) => {
                tracing::debug!("Dropping sort on non-sortable column '{}'", state.key);
                None
            }
            None => None,
        }
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    pub fn set_query(&mut self, query: &str) {
        if self.filter.query == query {
            return;
        }
        self.filter.query = query.to_string();
        self.filter_changed();
    }

    /// Set one column's filter; an empty value removes it. Unknown and
    /// non-filterable columns are ignored.
    pub fn set_column_filter(&mut self, key: &str, value: &str) {
        if !self.columns.is_filterable(key) {
            tracing::debug!("Ignoring filter on non-filterable column '{}'", key);
            return;
        }
        if self.filter.column(key).unwrap_or("") == value {
            return;
        }
        self.filter.set_column(key, value);
        self.filter_changed();
    }

    pub fn clear_filters(&mut self) {
        if self.filter.is_empty() {
            return;
        }
        self.filter.clear();
        self.filter_changed();
    }

    fn filter_changed(&mut self) {
        self.refresh_rows();
        self.clamp_page();
        tracing::debug!(
            "Filter matched {}/{} records",
            self.rows.len(),
            self.records.len()
        );
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    pub fn go_to_page(&mut self, page_index: usize) {
        let next = self.pagination.go_to(page_index, self.rows.len());
        self.set_pagination(next);
    }

    pub fn next_page(&mut self) {
        let next = self.pagination.next(self.rows.len());
        self.set_pagination(next);
    }

    pub fn previous_page(&mut self) {
        let next = self.pagination.previous();
        self.set_pagination(next);
    }

    pub fn first_page(&mut self) {
        let next = self.pagination.first();
        self.set_pagination(next);
    }

    pub fn last_page(&mut self) {
        let next = self.pagination.last(self.rows.len());
        self.set_pagination(next);
    }

    /// Change the page size and return to page 1. A size of 0 becomes 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size.max(1) == self.pagination.page_size() {
            return;
        }
        let next = self.pagination.with_page_size(page_size);
        self.set_pagination(next);
    }

    fn clamp_page(&mut self) {
        let next = self.pagination.clamp(self.rows.len());
        self.set_pagination(next);
    }

    fn set_pagination(&mut self, next: PaginationState) {
        let previous = self.pagination;
        self.pagination = next;

        if next.page_size() != previous.page_size() {
            if let Some(callback) = self.listeners.page_size.as_mut() {
                callback(next.page_size());
            }
        }
        if next.page_index() != previous.page_index() {
            if let Some(callback) = self.listeners.page.as_mut() {
                callback(next.page_index());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.is_selected(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn select(&mut self, id: &str) {
        if self.selection.select(id) {
            self.notify_selection();
        }
    }

    pub fn deselect(&mut self, id: &str) {
        if self.selection.deselect(id) {
            self.notify_selection();
        }
    }

    pub fn toggle(&mut self, id: &str) {
        if self.selection.toggle(id) {
            self.notify_selection();
        }
    }

    /// Select every row in the select scope, keeping earlier selections.
    pub fn select_all(&mut self) {
        let scope = self.scope_indices();
        let ids = &self.ids;
        if self
            .selection
            .select_all(scope.iter().map(move |&i| ids[i].as_str()))
        {
            self.notify_selection();
        }
    }

    /// Header checkbox behaviour: clear the scope when it is fully selected,
    /// otherwise select all of it.
    pub fn toggle_all(&mut self) {
        let scope = self.scope_indices();
        let ids = &self.ids;
        if self
            .selection
            .toggle_all(scope.iter().map(move |&i| ids[i].as_str()))
        {
            self.notify_selection();
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.notify_selection();
        }
    }

    pub fn select_all_state(&self) -> SelectAllState {
        let scope = self.scope_indices();
        self.selection
            .scope_state(scope.iter().map(|&i| self.ids[i].as_str()))
    }

    /// Selected records in original order, whether or not they are visible.
    pub fn selected_records(&self) -> Vec<&R> {
        selected_in(&self.records, &self.ids, &self.selection)
    }

    fn scope_indices(&self) -> Vec<usize> {
        match self.select_scope {
            SelectScope::CurrentPage => {
                self.rows[self.pagination.range(self.rows.len())].to_vec()
            }
            SelectScope::AcrossPages => self.rows.clone(),
        }
    }

    fn notify_selection(&mut self) {
        tracing::debug!("Selection changed: {} selected", self.selection.len());
        let Some(callback) = self.listeners.selection.as_mut() else {
            return;
        };
        let selected = selected_in(&self.records, &self.ids, &self.selection);
        callback(&selected);
    }

    // -------------------------------------------------------------------------
    // Pipeline
    // -------------------------------------------------------------------------

    fn view_row(&self, index: usize) -> ViewRow<'_, R> {
        ViewRow {
            index,
            id: &self.ids[index],
            record: &self.records[index],
        }
    }

    fn rebuild_ids(&mut self) {
        self.ids = match &self.record_id {
            Some(record_id) => self.records.iter().map(|r| record_id(r)).collect(),
            None => (0..self.records.len()).map(|i| i.to_string()).collect(),
        };

        let unique: HashSet<&str> = self.ids.iter().map(String::as_str).collect();
        if unique.len() != self.ids.len() {
            tracing::warn!(
                "{} records share an id with another record",
                self.ids.len() - unique.len()
            );
        }
    }

    fn refresh_rows(&mut self) {
        let rows: Vec<ViewRow<'_, R>> = (0..self.records.len())
            .map(|index| ViewRow {
                index,
                id: &self.ids[index],
                record: &self.records[index],
            })
            .collect();
        let filtered = filter::filter(&rows, &self.filter);
        let sorted = sort::sort(&filtered, self.sort.as_ref());
        self.rows = sorted.iter().map(|row| row.index).collect();
    }
}

/// Selected records in original order. Free-standing so callers can borrow
/// the listeners mutably at the same time.
fn selected_in<'a, R>(
    records: &'a [R],
    ids: &[String],
    selection: &SelectionTracker,
) -> Vec<&'a R> {
    records
        .iter()
        .zip(ids)
        .filter(|(_, id)| selection.is_selected(id))
        .map(|(record, _)| record)
        .collect()
}

/// Run filter, sort and paginate once over a record set.
pub fn query_page<T: Record + Clone>(
    records: &[T],
    filter_state: &FilterState,
    sort_state: Option<&SortState>,
    pagination: &PaginationState,
) -> Page<T> {
    let filtered = filter::filter(records, filter_state);
    let sorted = sort::sort(&filtered, sort_state);
    paginate(&sorted, pagination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::column::Column;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    type Row = BTreeMap<String, Value>;

    fn person(name: &str, email: &str) -> Row {
        let mut row = Row::new();
        row.insert("name".into(), name.into());
        row.insert("email".into(), email.into());
        row
    }

    fn columns() -> Columns<Row> {
        Columns::new(vec![
            Column::new("name", "Name").sortable().filterable(),
            Column::new("email", "Email").sortable(),
        ])
        .unwrap()
    }

    fn names(view: &TableView<Row>) -> Vec<String> {
        view.page()
            .items
            .iter()
            .map(|row| row.record.field("name").to_string())
            .collect()
    }

    #[test]
    fn default_ids_are_original_positions() {
        let view = TableView::new(columns(), vec![person("Bob", "b"), person("Al", "a")])
            .with_sort(Some(SortState::ascending("name")));
        let page = view.page();
        assert_eq!(page.items[0].id, "1");
        assert_eq!(page.items[0].index, 1);
    }

    #[test]
    fn invalid_initial_sort_is_dropped() {
        let view = TableView::new(columns(), vec![person("Bob", "b")])
            .with_sort(Some(SortState::ascending("phone")));
        assert_eq!(view.sort_state(), None);
    }

    #[test]
    fn invalid_initial_column_filter_is_dropped() {
        let filter = FilterState::new()
            .with_column("phone", "5")
            .with_column("email", "zzz")
            .with_column("name", "bo");
        let view = TableView::new(columns(), vec![person("Bob", "b"), person("Al", "a")])
            .with_filter(filter);
        assert_eq!(view.filter_state().column("phone"), None);
        assert_eq!(view.filter_state().column("email"), None);
        assert_eq!(view.filter_state().column("name"), Some("bo"));
        assert_eq!(view.filtered_count(), 1);
    }

    #[test]
    fn sort_cycle_restores_insertion_order() {
        let mut view = TableView::new(
            columns(),
            vec![person("Bob", "b@x.com"), person("Alice", "a@x.com")],
        );
        view.toggle_sort("name");
        assert_eq!(names(&view), vec!["Alice", "Bob"]);
        view.toggle_sort("name");
        assert_eq!(names(&view), vec!["Bob", "Alice"]);
        view.toggle_sort("name");
        assert_eq!(view.sort_state(), None);
        assert_eq!(names(&view), vec!["Bob", "Alice"]);
    }

    #[test]
    fn column_filter_requires_filterable_column() {
        let mut view = TableView::new(
            columns(),
            vec![person("Bob", "b@x.com"), person("Alice", "a@x.com")],
        );
        view.set_column_filter("email", "a@");
        assert_eq!(view.filtered_count(), 2);
        view.set_column_filter("name", "ali");
        assert_eq!(view.filtered_count(), 1);
    }

    #[test]
    fn callbacks_fire_on_changes() {
        let sorts = Rc::new(RefCell::new(Vec::new()));
        let pages = Rc::new(RefCell::new(Vec::new()));
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let rows: Vec<Row> = (0..12).map(|i| person(&format!("p{i}"), "e")).collect();

        let sorts_cb = Rc::clone(&sorts);
        let pages_cb = Rc::clone(&pages);
        let sizes_cb = Rc::clone(&sizes);
        let mut view = TableView::new(columns(), rows)
            .with_page_size(5)
            .on_sort_change(move |s| sorts_cb.borrow_mut().push(s.cloned()))
            .on_page_change(move |p| pages_cb.borrow_mut().push(p))
            .on_page_size_change(move |s| sizes_cb.borrow_mut().push(s));

        view.toggle_sort("name");
        view.toggle_sort("email");
        view.toggle_sort("missing");
        view.next_page();
        view.next_page();
        view.next_page();
        view.set_page_size(10);
        view.set_page_size(10);

        assert_eq!(
            *sorts.borrow(),
            vec![
                Some(SortState::ascending("name")),
                Some(SortState::ascending("email"))
            ]
        );
        assert_eq!(*pages.borrow(), vec![2, 3, 1]);
        assert_eq!(*sizes.borrow(), vec![10]);
    }

    #[test]
    fn selection_callback_materializes_records() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_cb = Rc::clone(&seen);
        let mut view = TableView::new(
            columns(),
            vec![person("Bob", "b"), person("Alice", "a"), person("Carol", "c")],
        )
        .with_record_id(|r: &Row| r.field("name").to_string())
        .on_selection_change(move |records| {
            let names = records
                .iter()
                .map(|r| r.field("name").to_string())
                .collect::<Vec<_>>();
            seen_cb.borrow_mut().push(names);
        });

        view.select("Carol");
        view.select("Bob");
        view.select("Nobody");
        view.deselect("Carol");

        assert_eq!(
            *seen.borrow(),
            vec![
                vec!["Carol".to_string()],
                vec!["Bob".to_string(), "Carol".to_string()],
                vec!["Bob".to_string()],
            ]
        );
    }

    #[test]
    fn refresh_prunes_stale_selection() {
        let mut view = TableView::new(columns(), vec![person("Bob", "b"), person("Al", "a")])
            .with_record_id(|r: &Row| r.field("name").to_string());
        view.select("Al");
        view.set_records(vec![person("Bob", "b")]);
        assert_eq!(view.selected_count(), 0);
        assert!(view.selected_records().is_empty());
    }

    #[test]
    fn query_page_runs_whole_pipeline() {
        let rows = vec![
            person("Bob", "b@x.com"),
            person("Alice", "a@x.com"),
            person("Bea", "bea@y.org"),
        ];
        let page = query_page(
            &rows,
            &FilterState::new().with_query("x.com"),
            Some(&SortState::ascending("name")),
            &PaginationState::new(1),
        );
        assert_eq!(page.total_items, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].field("name"), Value::from("Alice"));
    }
}
