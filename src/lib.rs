//! Headless data table engine with a terminal dashboard for building consents

pub mod app;
pub mod config;
pub mod grid;
pub mod models;
pub mod ui;
pub mod utils;
