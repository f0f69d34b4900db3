pub mod format;

pub use format::{format_currency, format_date, format_datetime, truncate};
