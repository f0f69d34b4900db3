//! Dashboard over records loaded from a JSON file

use crate::app::state::GridEventSender;
use crate::config::settings::TableOptions;
use crate::grid::{GridError, TableView};
use crate::models::{infer_columns, DynamicRecord};
use crate::ui::widgets::table::GridTable;

pub const TITLE: &str = "Records";

/// Columns come from the data; an `id` field, when every record has one,
/// becomes the record identity.
pub fn dashboard(
    records: Vec<DynamicRecord>,
    options: TableOptions,
    events: GridEventSender,
) -> Result<GridTable<DynamicRecord>, GridError> {
    let columns = infer_columns(&records)?;
    let has_ids = !records.is_empty() && records.iter().all(|r| r.contains_key("id"));

    let mut view = TableView::new(columns, records);
    if has_ids {
        view = view.with_record_id(|r: &DynamicRecord| {
            r.get("id").map(ToString::to_string).unwrap_or_default()
        });
    }

    Ok(GridTable::new(TITLE, view, options, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_records;
    use tokio::sync::mpsc;

    #[test]
    fn uses_id_field_when_present() {
        let records = parse_records(r#"[{"id": 7, "name": "Bob"}, {"id": 9, "name": "Al"}]"#).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut table = dashboard(records, TableOptions::default(), tx).unwrap();
        table.view_mut().select("9");
        assert_eq!(table.view().selected_count(), 1);
    }

    #[test]
    fn falls_back_to_positions() {
        let records = parse_records(r#"[{"name": "Bob"}, {"id": 2, "name": "Al"}]"#).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut table = dashboard(records, TableOptions::default(), tx).unwrap();
        table.view_mut().select("0");
        assert_eq!(table.view().selected_count(), 1);
    }
}
