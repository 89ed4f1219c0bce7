use chrono::{DateTime, NaiveDate};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::table::{CellValue, ColumnDef, TableRow};

const PEOPLE_SEARCH_URL: &str = "https://www.linkedin.com/search/results/people/";

/// A sales lead as served by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub lead_id: String,
    pub name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_link: Option<String>,
    #[serde(default)]
    pub occupation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_headcount: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub sent_date: String,
    #[serde(default)]
    pub sent_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Lead {
    /// Profile URL, or a people search on the lead's name
    pub fn linkedin_url(&self) -> String {
        match self.linkedin_account_name.as_deref().filter(|s| !s.is_empty()) {
            Some(account) => format!("https://www.linkedin.com/in/{}", account),
            None => Url::parse_with_params(PEOPLE_SEARCH_URL, &[("keywords", self.name.as_str())])
                .map(String::from)
                .unwrap_or_else(|_| PEOPLE_SEARCH_URL.to_string()),
        }
    }

    /// `sentDate` as `Mon D, YYYY`, or the raw value if it doesn't parse
    pub fn formatted_sent_date(&self) -> String {
        format_date(&self.sent_date)
    }
}

impl TableRow for Lead {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "leadId" => self.lead_id.as_str().into(),
            "name" => self.name.as_str().into(),
            "designation" => self.designation.as_str().into(),
            "website" => self.website.clone().into(),
            "leadLink" => self.lead_link.clone().into(),
            "occupation" => self.occupation.as_str().into(),
            "companyHeadcount" => self.company_headcount.clone().into(),
            "state" => self.state.as_str().into(),
            "sentDate" => self.sent_date.as_str().into(),
            "sentBy" => self.sent_by.as_str().into(),
            "email" => self.email.clone().into(),
            "mobileNumber" => self.mobile_number.clone().into(),
            "comments" => self.comments.clone().into(),
            "linkedinAccountName" => self.linkedin_account_name.clone().into(),
            "createdAt" => self.created_at.clone().into(),
            "updatedAt" => self.updated_at.clone().into(),
            _ => CellValue::Empty,
        }
    }
}

/// Multi-select filters for the lead search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFilters {
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default)]
    pub designation: Vec<String>,
    #[serde(default)]
    pub occupation: Vec<String>,
    #[serde(default)]
    pub state: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_date: Option<String>,
}

impl LeadFilters {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.designation.is_empty()
            && self.occupation.is_empty()
            && self.state.is_empty()
            && self.sent_date.is_none()
    }
}

/// One page of leads. Accepts both Spring (`number`/`size`) and plain
/// (`page`/`limit`) paging fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginatedLeads {
    pub content: Vec<Lead>,
    pub total_elements: usize,
    pub total_pages: usize,
    #[serde(alias = "number")]
    pub page: usize,
    #[serde(alias = "limit")]
    pub size: usize,
}

/// Distinct values offered by the filter pickers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    pub designations: Vec<String>,
    pub occupations: Vec<String>,
    pub states: Vec<String>,
}

/// The columns of the leads page
pub fn lead_columns() -> Vec<ColumnDef<Lead>> {
    vec![
        ColumnDef::new("name", "Name").width(200).min_width(150),
        ColumnDef::new("occupation", "Occupation").width(180).min_width(150),
        ColumnDef::new("state", "State").width(120).min_width(100),
        ColumnDef::new("email", "Email").width(200).min_width(150),
        ColumnDef::new("designation", "Designation").width(180).min_width(150),
        ColumnDef::new("companyHeadcount", "Company Size")
            .width(150)
            .min_width(120)
            .render(|value, _| {
                if value.is_empty() {
                    "-".to_string()
                } else {
                    value.to_string()
                }
            }),
        ColumnDef::new("sentDate", "Sent")
            .width(140)
            .min_width(120)
            .hidden()
            .render(|_, lead: &Lead| lead.formatted_sent_date()),
    ]
}

fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %-d, %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%b %-d, %Y").to_string();
    }
    raw.to_string()
}
