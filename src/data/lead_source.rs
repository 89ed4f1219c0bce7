use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::lead::{FilterOptions, Lead, LeadFilters, PaginatedLeads};

/// One search request: filters, free text and a 0-based page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadQuery {
    pub filters: LeadFilters,
    pub search_term: String,
    pub page: usize,
    pub size: usize,
}

impl LeadQuery {
    pub fn new(size: usize) -> Self {
        Self {
            filters: LeadFilters::default(),
            search_term: String::new(),
            page: 0,
            size: size.max(1),
        }
    }

    /// Replace the search term, going back to the first page
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self.page = 0;
        self
    }
}

/// Where the leads page gets its data
pub trait LeadSource {
    fn search(&self, query: &LeadQuery) -> Result<PaginatedLeads>;

    fn filter_options(&self) -> FilterOptions;

    /// Short label for the status line
    fn describe(&self) -> String;
}

/// Leads read from a JSON array on disk, searched and paged in memory
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    leads: Vec<Lead>,
}

impl JsonFileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read leads file {}", path.display()))?;
        let leads: Vec<Lead> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse leads file {}", path.display()))?;
        info!(target: "source", "Loaded {} leads from {}", leads.len(), path.display());
        Ok(Self { path, leads })
    }

    pub fn from_leads(leads: Vec<Lead>) -> Self {
        Self {
            path: PathBuf::from("<memory>"),
            leads,
        }
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }
}

impl LeadSource for JsonFileSource {
    fn search(&self, query: &LeadQuery) -> Result<PaginatedLeads> {
        let term = query.search_term.trim().to_lowercase();
        let matching: Vec<&Lead> = self
            .leads
            .iter()
            .filter(|lead| matches_term(lead, &term) && matches_filters(lead, &query.filters))
            .collect();

        let size = query.size.max(1);
        let total_elements = matching.len();
        let total_pages = total_elements.div_ceil(size);
        let content = matching
            .into_iter()
            .skip(query.page * size)
            .take(size)
            .cloned()
            .collect();

        debug!(
            target: "source",
            "Search '{}' page {} -> {} of {} leads",
            term, query.page, size, total_elements
        );

        Ok(PaginatedLeads {
            content,
            total_elements,
            total_pages,
            page: query.page,
            size,
        })
    }

    fn filter_options(&self) -> FilterOptions {
        fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
            values
                .filter(|v| !v.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        }

        FilterOptions {
            designations: distinct(self.leads.iter().map(|l| l.designation.as_str())),
            occupations: distinct(self.leads.iter().map(|l| l.occupation.as_str())),
            states: distinct(self.leads.iter().map(|l| l.state.as_str())),
        }
    }

    fn describe(&self) -> String {
        format!("file: {}", self.path.display())
    }
}

fn matches_term(lead: &Lead, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    [
        Some(lead.name.as_str()),
        lead.email.as_deref(),
        Some(lead.designation.as_str()),
        Some(lead.occupation.as_str()),
        Some(lead.state.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(term))
}

fn matches_filters(lead: &Lead, filters: &LeadFilters) -> bool {
    fn any_of(selected: &[String], value: &str) -> bool {
        selected.is_empty() || selected.iter().any(|s| s.eq_ignore_ascii_case(value))
    }

    any_of(&filters.name, &lead.name)
        && any_of(&filters.designation, &lead.designation)
        && any_of(&filters.occupation, &lead.occupation)
        && any_of(&filters.state, &lead.state)
        && filters
            .sent_date
            .as_deref()
            .map_or(true, |date| lead.sent_date.starts_with(date))
}
