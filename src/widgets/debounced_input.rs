//! Search box for the leads page.
//!
//! Typing restarts a quiet period; the term is emitted once typing pauses,
//! or straight away on Enter.

use crate::utils::debouncer::Debouncer;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

/// Result of handling a key in the search box
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebouncedInputAction {
    /// Key consumed, nothing to do yet
    Continue,
    /// Text changed; a search is pending
    InputChanged(String),
    /// Enter: search for this term now
    Confirm(String),
    /// Esc: leave the box, keeping the last searched term
    Cancel,
    /// Not for the search box
    PassThrough,
}

#[derive(Debug, Clone)]
pub struct DebouncedInputConfig {
    pub debounce_ms: u64,
    pub title: String,
    pub placeholder: String,
    pub style: Style,
    pub show_debounce_indicator: bool,
}

impl Default for DebouncedInputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            title: "Search".to_string(),
            placeholder: "Search by name, email, company...".to_string(),
            style: Style::default().fg(Color::Yellow),
            show_debounce_indicator: true,
        }
    }
}

pub struct DebouncedInput {
    input: Input,
    debouncer: Debouncer,
    /// Term most recently handed to the search
    last_executed: String,
    config: DebouncedInputConfig,
    active: bool,
}

impl DebouncedInput {
    pub fn new(debounce_ms: u64) -> Self {
        Self::with_config(DebouncedInputConfig {
            debounce_ms,
            ..Default::default()
        })
    }

    pub fn with_config(config: DebouncedInputConfig) -> Self {
        Self {
            input: Input::default(),
            debouncer: Debouncer::new(config.debounce_ms),
            last_executed: String::new(),
            config,
            active: false,
        }
    }

    /// Focus the box, keeping its text
    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Empty the box and forget the pending search
    pub fn clear(&mut self) {
        self.input.reset();
        self.debouncer.reset();
        self.last_executed.clear();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DebouncedInputAction {
        if !self.active {
            return DebouncedInputAction::PassThrough;
        }

        match key.code {
            KeyCode::Esc => {
                self.deactivate();
                DebouncedInputAction::Cancel
            }
            KeyCode::Enter => {
                self.deactivate();
                self.debouncer.flush();
                let term = self.input.value().to_string();
                self.last_executed = term.clone();
                DebouncedInputAction::Confirm(term)
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                DebouncedInputAction::PassThrough
            }
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                let current = self.input.value().to_string();
                if current == before {
                    return DebouncedInputAction::Continue;
                }
                self.debouncer.trigger();
                DebouncedInputAction::InputChanged(current)
            }
        }
    }

    /// Poll from the event loop. Yields the term once typing has paused and
    /// it differs from the last search.
    pub fn check_debounce(&mut self) -> Option<String> {
        if !self.debouncer.should_execute() {
            return None;
        }
        let term = self.input.value().to_string();
        if term == self.last_executed {
            return None;
        }
        self.last_executed = term.clone();
        Some(term)
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let title = if self.config.show_debounce_indicator && self.debouncer.is_pending() {
            format!("{} (typing...)", self.config.title)
        } else if self.active {
            format!("{} [Enter search, Esc leave]", self.config.title)
        } else {
            format!("{} [/]", self.config.title)
        };

        let border_style = if self.active {
            self.config.style
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style);

        let paragraph = if self.input.value().is_empty() && !self.active {
            Paragraph::new(self.config.placeholder.as_str())
                .style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.input.value()).style(self.config.style)
        };
        f.render_widget(paragraph.block(block), area);

        if self.active {
            let cursor = (self.input.visual_cursor() as u16).min(area.width.saturating_sub(3));
            f.set_cursor_position((area.x + cursor + 1, area.y + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(input: &mut DebouncedInput, text: &str) {
        for c in text.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_inactive_passes_through() {
        let mut input = DebouncedInput::new(0);
        assert_eq!(input.handle_key(key(KeyCode::Char('a'))), DebouncedInputAction::PassThrough);
    }

    #[test]
    fn test_search_fires_after_pause() {
        let mut input = DebouncedInput::new(0);
        input.activate();
        type_text(&mut input, "acme");
        assert_eq!(input.check_debounce(), Some("acme".to_string()));
        // Same term is not searched twice
        input.handle_key(key(KeyCode::Char('x')));
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.check_debounce(), None);
    }

    #[test]
    fn test_enter_flushes_pending_search() {
        let mut input = DebouncedInput::new(60_000);
        input.activate();
        type_text(&mut input, "ada");
        assert!(input.is_pending());
        assert_eq!(input.handle_key(key(KeyCode::Enter)), DebouncedInputAction::Confirm("ada".to_string()));
        assert!(!input.is_pending());
        assert!(!input.is_active());
        assert_eq!(input.check_debounce(), None);
    }

    #[test]
    fn test_escape_keeps_text() {
        let mut input = DebouncedInput::new(0);
        input.activate();
        type_text(&mut input, "ny");
        assert_eq!(input.handle_key(key(KeyCode::Esc)), DebouncedInputAction::Cancel);
        assert_eq!(input.value(), "ny");
        input.clear();
        assert_eq!(input.value(), "");
    }
}
