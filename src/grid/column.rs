//! Column descriptors

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::error::GridError;
use super::record::Record;

/// Renders a record into the display text of one cell.
pub type Renderer<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// Sizing hint for the rendering shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Exact width in cells
    Fixed(u16),
    /// Share of the available width
    Percent(u16),
    /// At least this many cells, growing with the table
    Min(u16),
}

/// Static description of one table column.
pub struct Column<R> {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub filterable: bool,
    pub align_right: bool,
    pub width: Option<ColumnWidth>,
    render: Option<Renderer<R>>,
}

impl<R> Column<R> {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: false,
            filterable: false,
            align_right: false,
            width: None,
            render: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn align_right(mut self) -> Self {
        self.align_right = true;
        self
    }

    pub fn with_width(mut self, width: ColumnWidth) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_render<F>(mut self, render: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn has_renderer(&self) -> bool {
        self.render.is_some()
    }
}

impl<R: Record> Column<R> {
    /// Display text for this column, falling back to the raw field value.
    pub fn display(&self, record: &R) -> String {
        match &self.render {
            Some(render) => render(record),
            None => record.field(&self.key).to_string(),
        }
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            filterable: self.filterable,
            align_right: self.align_right,
            width: self.width,
            render: self.render.clone(),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("align_right", &self.align_right)
            .field("width", &self.width)
            .field("render", &self.render.is_some())
            .finish()
    }
}

/// Ordered set of columns with unique keys.
pub struct Columns<R> {
    columns: Vec<Column<R>>,
}

impl<R> Columns<R> {
    pub fn new(columns: Vec<Column<R>>) -> Result<Self, GridError> {
        let mut seen = HashSet::new();
        for (position, column) in columns.iter().enumerate() {
            if column.key.is_empty() {
                return Err(GridError::EmptyColumnKey { position });
            }
            if !seen.insert(column.key.as_str()) {
                return Err(GridError::DuplicateColumn {
                    key: column.key.clone(),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn get(&self, key: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn at(&self, index: usize) -> Option<&Column<R>> {
        self.columns.get(index)
    }

    pub fn is_sortable(&self, key: &str) -> bool {
        self.get(key).map(|c| c.sortable).unwrap_or(false)
    }

    pub fn is_filterable(&self, key: &str) -> bool {
        self.get(key).map(|c| c.filterable).unwrap_or(false)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column<R>> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<R> Clone for Columns<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<R> fmt::Debug for Columns<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}

impl<'a, R> IntoIterator for &'a Columns<R> {
    type Item = &'a Column<R>;
    type IntoIter = std::slice::Iter<'a, Column<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::value::Value;
    use std::collections::BTreeMap;

    type Row = BTreeMap<String, Value>;

    #[test]
    fn duplicate_keys_are_rejected() {
        let result = Columns::<Row>::new(vec![
            Column::new("name", "Name"),
            Column::new("name", "Also name"),
        ]);
        assert_eq!(
            result.err(),
            Some(GridError::DuplicateColumn { key: "name".into() })
        );
    }

    #[test]
    fn empty_keys_are_rejected() {
        let result = Columns::<Row>::new(vec![Column::new("a", "A"), Column::new("", "Blank")]);
        assert_eq!(result.err(), Some(GridError::EmptyColumnKey { position: 1 }));
    }

    #[test]
    fn display_falls_back_to_raw_field() {
        let mut row = Row::new();
        row.insert("cost".into(), Value::Number(1200.0));

        let raw: Column<Row> = Column::new("cost", "Cost");
        assert_eq!(raw.display(&row), "1200");

        let rendered: Column<Row> = Column::new("cost", "Cost")
            .with_render(|r: &Row| format!("${}", r.field("cost")));
        assert_eq!(rendered.display(&row), "$1200");
    }

    #[test]
    fn lookup_helpers() {
        let columns = Columns::<Row>::new(vec![
            Column::new("name", "Name").sortable(),
            Column::new("email", "Email").filterable(),
        ])
        .unwrap();
        assert!(columns.is_sortable("name"));
        assert!(!columns.is_sortable("email"));
        assert!(columns.is_filterable("email"));
        assert!(!columns.is_sortable("missing"));
        assert_eq!(columns.position("email"), Some(1));
        assert_eq!(columns.len(), 2);
    }
}
