pub mod api;
pub mod common;
pub mod config;
pub mod ui;
