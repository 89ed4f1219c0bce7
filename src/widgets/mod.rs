//! Widgets drawn around the leads table

pub mod debounced_input;
pub mod lead_details_widget;
