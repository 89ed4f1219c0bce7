//! Terminal front end for the leads page

pub mod leads_app;
pub mod table_renderer;

pub use leads_app::{run_leads_app, LeadsApp};
