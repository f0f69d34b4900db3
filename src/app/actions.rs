//! User action handling

/// User-initiated actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    // Navigation
    NextTab,
    PrevTab,
    GoToTab(usize),
    RowUp,
    RowDown,
    ColumnLeft,
    ColumnRight,

    // Sorting
    CycleSort,

    // Pagination
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    CyclePageSize,

    // Selection
    ToggleRow,
    ToggleAll,
    ClearSelection,

    // Filtering
    EditSearch,
    EditColumnFilter,
    ClearFilters,

    // General
    ShowDetails,
    Help,
    Quit,
}

impl UserAction {
    /// Short description for the help overlay
    pub fn describe(&self) -> &'static str {
        match self {
            Self::NextTab => "Next dashboard",
            Self::PrevTab => "Previous dashboard",
            Self::GoToTab(_) => "Jump to dashboard",
            Self::RowUp => "Previous row",
            Self::RowDown => "Next row",
            Self::ColumnLeft => "Previous column",
            Self::ColumnRight => "Next column",
            Self::CycleSort => "Sort column (asc, desc, off)",
            Self::NextPage => "Next page",
            Self::PrevPage => "Previous page",
            Self::FirstPage => "First page",
            Self::LastPage => "Last page",
            Self::CyclePageSize => "Change page size",
            Self::ToggleRow => "Select row",
            Self::ToggleAll => "Select all",
            Self::ClearSelection => "Clear selection",
            Self::EditSearch => "Search",
            Self::EditColumnFilter => "Filter column",
            Self::ClearFilters => "Clear filters",
            Self::ShowDetails => "Record details",
            Self::Help => "Help",
            Self::Quit => "Quit",
        }
    }
}

/// Result of processing a user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Continue,
    Quit,
    ShowDialog(DialogType),
    CloseDialog,
}

/// Dialog types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogType {
    Help,
    RecordDetails,
}
