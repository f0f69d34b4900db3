//! Headless data table core
//!
//! Pure engines for sorting, filtering, paginating and selecting records,
//! plus [`TableView`], the stateful container that composes them.

pub mod column;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod record;
pub mod selection;
pub mod sort;
pub mod value;
pub mod view;

pub use column::{Column, ColumnWidth, Columns};
pub use error::GridError;
pub use filter::{filter, FilterState};
pub use pagination::{paginate, Page, PaginationState, DEFAULT_PAGE_SIZE};
pub use record::Record;
pub use selection::{SelectAllState, SelectScope, SelectionTracker};
pub use sort::{sort, SortDirection, SortState};
pub use value::Value;
pub use view::{query_page, TableView, ViewRow};
