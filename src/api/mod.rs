//! Leads REST backend client

pub mod lead_client;

pub use lead_client::LeadClient;
