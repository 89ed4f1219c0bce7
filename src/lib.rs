pub mod api;
pub mod config;
pub mod data;
pub mod logging;
pub mod table;
pub mod table_display;
pub mod ui;
pub mod utils;
pub mod widgets;
