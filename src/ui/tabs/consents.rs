//! Consent applications dashboard

use crate::app::state::GridEventSender;
use crate::config::settings::TableOptions;
use crate::grid::{Column, ColumnWidth, Columns, GridError, SortState, TableView};
use crate::models::{ConsentApplication, STATUTORY_WORKING_DAYS};
use crate::ui::widgets::table::GridTable;
use crate::utils::{format_currency, format_date, truncate};

pub const TITLE: &str = "Consents";

pub fn columns() -> Result<Columns<ConsentApplication>, GridError> {
    Columns::new(vec![
        Column::new("reference", "Reference")
            .sortable()
            .filterable()
            .with_width(ColumnWidth::Fixed(10)),
        Column::new("address", "Address")
            .sortable()
            .filterable()
            .with_width(ColumnWidth::Min(20))
            .with_render(|c: &ConsentApplication| truncate(&c.address, 28)),
        Column::new("applicant", "Applicant")
            .sortable()
            .filterable()
            .with_width(ColumnWidth::Min(14)),
        Column::new("work_type", "Work")
            .sortable()
            .filterable()
            .with_width(ColumnWidth::Fixed(13)),
        Column::new("status", "Status")
            .sortable()
            .filterable()
            .with_width(ColumnWidth::Fixed(11)),
        Column::new("lodged", "Lodged")
            .sortable()
            .with_width(ColumnWidth::Fixed(11))
            .with_render(|c: &ConsentApplication| format_date(c.lodged)),
        Column::new("estimated_value", "Value")
            .sortable()
            .align_right()
            .with_width(ColumnWidth::Fixed(12))
            .with_render(|c: &ConsentApplication| format_currency(c.estimated_value)),
        Column::new("working_days", "Days")
            .sortable()
            .align_right()
            .with_width(ColumnWidth::Fixed(6))
            .with_render(|c: &ConsentApplication| {
                if c.is_overdue() {
                    format!("{}!", c.working_days)
                } else {
                    c.working_days.to_string()
                }
            }),
        Column::new("officer", "Officer")
            .filterable()
            .with_width(ColumnWidth::Min(10))
            .with_render(|c: &ConsentApplication| {
                c.officer.clone().unwrap_or_else(|| "Unallocated".to_string())
            }),
    ])
}

/// Newest first, keyed by application id
pub fn dashboard(
    records: Vec<ConsentApplication>,
    options: TableOptions,
    events: GridEventSender,
) -> Result<GridTable<ConsentApplication>, GridError> {
    let overdue = records.iter().filter(|c| c.is_overdue()).count();
    if overdue > 0 {
        tracing::info!(
            "{} consents are past the {} working day clock",
            overdue,
            STATUTORY_WORKING_DAYS
        );
    }

    let view = TableView::new(columns()?, records)
        .with_record_id(|c: &ConsentApplication| c.id.to_string())
        .with_sort(Some(SortState::descending("lodged")));

    Ok(GridTable::new(TITLE, view, options, events).with_status_columns(&["status"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use crate::grid::Record;
    use tokio::sync::mpsc;

    #[test]
    fn newest_first_with_rendered_cells() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let table = dashboard(fixtures::consent_applications(), TableOptions::default(), tx).unwrap();
        let view = table.view();
        let page = view.page();
        let first = page.items[0].record;
        assert_eq!(first.reference, "BC240120");
        assert!(view.cell(first, "estimated_value").starts_with('$'));
        assert_eq!(view.cell(first, "lodged"), "28 Jun 2024");
    }

    #[test]
    fn raw_values_drive_sorting() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut table =
            dashboard(fixtures::consent_applications(), TableOptions::default(), tx).unwrap();
        table.view_mut().set_sort(Some(SortState::ascending("estimated_value")));
        let values: Vec<f64> = table
            .view()
            .rows()
            .iter()
            .filter_map(|row| row.field("estimated_value").as_number())
            .collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn officer_column_is_not_sortable() {
        let columns = columns().unwrap();
        assert!(!columns.is_sortable("officer"));
        assert!(columns.is_filterable("officer"));
    }
}
