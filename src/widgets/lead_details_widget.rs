use crate::data::lead::Lead;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Side panel showing every known field of the selected lead
#[derive(Debug, Default)]
pub struct LeadDetailsWidget {
    lead: Option<Lead>,
    scroll: u16,
}

impl LeadDetailsWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, lead: Lead) {
        self.lead = Some(lead);
        self.scroll = 0;
    }

    pub fn close(&mut self) {
        self.lead = None;
    }

    pub fn is_open(&self) -> bool {
        self.lead.is_some()
    }

    pub fn lead(&self) -> Option<&Lead> {
        self.lead.as_ref()
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let Some(lead) = &self.lead else {
            return;
        };

        let mut lines: Vec<Line> = detail_fields(lead)
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", label),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(value),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            lead.linkedin_url(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        )));

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Lead Details [Esc close] ")
            .border_style(Style::default().fg(Color::Cyan));
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .scroll((self.scroll, 0));

        f.render_widget(Clear, area);
        f.render_widget(paragraph, area);
    }
}

/// Label/value pairs for the panel; optional fields appear only when set
pub fn detail_fields(lead: &Lead) -> Vec<(&'static str, String)> {
    let mut fields = vec![("Name", lead.name.clone())];
    let mut optional = |label: &'static str, value: Option<&str>| {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            fields.push((label, value.to_string()));
        }
    };

    optional("Designation", Some(lead.designation.as_str()));
    optional("Occupation", Some(lead.occupation.as_str()));
    optional("State", Some(lead.state.as_str()));
    optional("Sent Date", Some(lead.formatted_sent_date().as_str()));
    optional("Sent By", Some(lead.sent_by.as_str()));
    optional("Company Size", lead.company_headcount.as_deref());
    optional("Email", lead.email.as_deref());
    optional("Phone", lead.mobile_number.as_deref());
    optional("Website", website_url(lead).as_deref());
    optional("Lead Link", lead.lead_link.as_deref());
    optional("Comments", lead.comments.as_deref());
    fields
}

fn website_url(lead: &Lead) -> Option<String> {
    let site = lead.website.as_deref()?.trim();
    if site.is_empty() {
        None
    } else if site.starts_with("http") {
        Some(site.to_string())
    } else {
        Some(format!("https://{}", site))
    }
}
