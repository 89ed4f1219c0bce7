use anyhow::{anyhow, Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::data::lead::{FilterOptions, Lead, PaginatedLeads};
use crate::data::lead_source::{LeadQuery, LeadSource};

/// Blocking client for the leads REST backend
#[derive(Clone)]
pub struct LeadClient {
    base_url: String,
    auth_token: Option<String>,
    client: Client,
}

impl LeadClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            client: Client::new(),
        }
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn search_leads(&self, query: &LeadQuery) -> Result<PaginatedLeads> {
        let url = format!("{}/leads/search", self.base_url);
        debug!(target: "api", "GET {} page={} size={}", url, query.page, query.size);
        let request = self.client.get(&url).query(&search_params(query));
        self.fetch_page(request)
    }

    pub fn get_leads(&self, page: usize, size: usize) -> Result<PaginatedLeads> {
        let url = format!("{}/leads", self.base_url);
        debug!(target: "api", "GET {} page={} size={}", url, page, size);
        let request = self
            .client
            .get(&url)
            .query(&[("page", page.to_string()), ("size", size.to_string())]);
        self.fetch_page(request)
    }

    pub fn get_lead(&self, id: &str) -> Result<Lead> {
        let url = format!("{}/leads/{}", self.base_url, id);
        debug!(target: "api", "GET {}", url);
        let response = self.send(self.client.get(&url))?;
        parse_json(response)
    }

    /// Distinct values for the filter pickers. Each list falls back to empty
    /// on its own when its request fails.
    pub fn get_filter_options(&self) -> FilterOptions {
        FilterOptions {
            designations: self.distinct("designations"),
            occupations: self.distinct("occupations"),
            states: self.distinct("states"),
        }
    }

    fn distinct(&self, field: &str) -> Vec<String> {
        let url = format!("{}/leads/distinct/{}", self.base_url, field);
        match self.send(self.client.get(&url)).and_then(parse_json::<Vec<String>>) {
            Ok(values) => values,
            Err(e) => {
                warn!(target: "api", "Failed to fetch distinct {}: {:#}", field, e);
                Vec::new()
            }
        }
    }

    /// Unauthorized responses yield an empty page instead of an error
    fn fetch_page(&self, request: RequestBuilder) -> Result<PaginatedLeads> {
        let response = self.send(request)?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            warn!(target: "api", "Backend rejected credentials ({})", response.status());
            return Ok(PaginatedLeads::default());
        }
        parse_json(response)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.header("Content-Type", "application/json");
        let request = match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        request.send().context("Failed to reach leads backend")
    }
}

fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(if body.is_empty() {
            anyhow!("Failed to fetch leads ({})", status)
        } else {
            anyhow!("API Error ({}): {}", status, body)
        });
    }
    response.json().context("Failed to decode backend response")
}

/// Query string for `/leads/search`; multi-value filters repeat their key
pub fn search_params(query: &LeadQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("size", query.size.to_string()),
    ];
    let term = query.search_term.trim();
    if !term.is_empty() {
        params.push(("searchTerm", term.to_string()));
    }
    if let Some(date) = query.filters.sent_date.as_deref().filter(|d| !d.is_empty()) {
        params.push(("sentDate", date.to_string()));
    }

    let filters = &query.filters;
    for (key, values) in [
        ("name", &filters.name),
        ("occupation", &filters.occupation),
        ("state", &filters.state),
        ("designation", &filters.designation),
    ] {
        params.extend(values.iter().map(|v| (key, v.clone())));
    }
    params
}

impl LeadSource for LeadClient {
    fn search(&self, query: &LeadQuery) -> Result<PaginatedLeads> {
        self.search_leads(query)
    }

    fn filter_options(&self) -> FilterOptions {
        self.get_filter_options()
    }

    fn describe(&self) -> String {
        format!("api: {}", self.base_url)
    }
}
