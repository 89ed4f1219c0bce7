//! Lead records and the sources that serve them

pub mod exporter;
pub mod lead;
pub mod lead_source;

pub use lead::{lead_columns, FilterOptions, Lead, LeadFilters, PaginatedLeads};
pub use lead_source::{JsonFileSource, LeadQuery, LeadSource};
