pub mod actions;
pub mod events;
pub mod query;
pub mod state;
