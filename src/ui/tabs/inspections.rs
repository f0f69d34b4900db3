//! Site inspections dashboard

use crate::app::state::GridEventSender;
use crate::config::settings::TableOptions;
use crate::grid::{Column, ColumnWidth, Columns, GridError, SortState, TableView};
use crate::models::Inspection;
use crate::ui::widgets::table::GridTable;
use crate::utils::{format_datetime, truncate};

pub const TITLE: &str = "Inspections";

pub fn columns() -> Result<Columns<Inspection>, GridError> {
    Columns::new(vec![
        Column::new("scheduled", "Scheduled")
            .sortable()
            .with_width(ColumnWidth::Fixed(18))
            .with_render(|i: &Inspection| format_datetime(i.scheduled)),
        Column::new("consent_reference", "Consent")
            .sortable()
            .filterable()
            .with_width(ColumnWidth::Fixed(10)),
        Column::new("inspection_type", "Stage")
            .sortable()
            .filterable()
            .with_width(ColumnWidth::Fixed(11)),
        Column::new("inspector", "Inspector")
            .sortable()
            .filterable()
            .with_width(ColumnWidth::Min(10)),
        Column::new("outcome", "Outcome")
            .sortable()
            .filterable()
            .with_width(ColumnWidth::Fixed(13)),
        Column::new("notes", "Notes")
            .with_width(ColumnWidth::Percent(30))
            .with_render(|i: &Inspection| truncate(&i.notes, 40)),
    ])
}

/// Soonest first, keyed by inspection id
pub fn dashboard(
    records: Vec<Inspection>,
    options: TableOptions,
    events: GridEventSender,
) -> Result<GridTable<Inspection>, GridError> {
    let reinspections = records.iter().filter(|i| i.needs_reinspection()).count();
    tracing::debug!("{} inspections need a re-inspection", reinspections);

    let view = TableView::new(columns()?, records)
        .with_record_id(|i: &Inspection| i.id.to_string())
        .with_sort(Some(SortState::ascending("scheduled")));

    Ok(GridTable::new(TITLE, view, options, events).with_status_columns(&["outcome"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use tokio::sync::mpsc;

    #[test]
    fn filters_by_outcome() {
        let consents = fixtures::consent_applications();
        let records = fixtures::inspections(&consents);
        let failed = records
            .iter()
            .filter(|i| i.outcome.to_string() == "Failed")
            .count();

        let (tx, _rx) = mpsc::unbounded_channel();
        let mut table = dashboard(records, TableOptions::default(), tx).unwrap();
        table.view_mut().set_column_filter("outcome", "failed");
        assert_eq!(table.view().filtered_count(), failed);
    }
}
