//! Screen layout management

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Tab bar, dashboard and status line
pub struct AppLayout {
    pub tabs: Rect,
    pub content: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let [tabs, content, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .areas(area);

        Self {
            tabs,
            content,
            status,
        }
    }
}

/// Search bar, table and pager stacked
pub struct TableLayout {
    pub search: Rect,
    pub table: Rect,
    pub pager: Rect,
}

impl TableLayout {
    pub fn new(area: Rect) -> Self {
        let [search, table, pager] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        Self {
            search,
            table,
            pager,
        }
    }
}

/// Area for a dialog drawn over the dashboard
pub struct DialogLayout {
    pub dialog: Rect,
}

impl DialogLayout {
    /// Centered, sized as a percentage of `area`
    pub fn new(area: Rect, width_percent: u16, height_percent: u16) -> Self {
        Self::within(
            area,
            Constraint::Percentage(width_percent),
            Constraint::Percentage(height_percent),
        )
    }

    /// Centered with fixed dimensions, shrunk to fit `area`
    pub fn centered(area: Rect, width: u16, height: u16) -> Self {
        Self::within(
            area,
            Constraint::Length(width.min(area.width)),
            Constraint::Length(height.min(area.height)),
        )
    }

    fn within(area: Rect, width: Constraint, height: Constraint) -> Self {
        let [row] = Layout::vertical([height]).flex(Flex::Center).areas(area);
        let [dialog] = Layout::horizontal([width]).flex(Flex::Center).areas(row);
        Self { dialog }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_dialog_is_centered_and_clipped() {
        let area = Rect::new(0, 0, 100, 40);
        let dialog = DialogLayout::centered(area, 60, 20).dialog;
        assert_eq!(dialog, Rect::new(20, 10, 60, 20));

        let small = DialogLayout::centered(Rect::new(0, 0, 30, 10), 60, 20).dialog;
        assert_eq!((small.width, small.height), (30, 10));
    }

    #[test]
    fn table_layout_reserves_search_and_pager() {
        let layout = TableLayout::new(Rect::new(0, 0, 80, 20));
        assert_eq!(layout.search.height, 3);
        assert_eq!(layout.pager.height, 1);
        assert_eq!(layout.table.height, 16);
    }
}
