use anyhow::Result;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::data::exporter::DataExporter;
use crate::data::lead::{lead_columns, FilterOptions, Lead};
use crate::data::lead_source::{LeadQuery, LeadSource};
use crate::logging::LogRingBuffer;
use crate::table::{LayoutStore, LayoutTable, ViewMode};
use crate::ui::table_renderer::{render_table, HeaderHit, RenderContext, TableGeometry};
use crate::widgets::debounced_input::{DebouncedInput, DebouncedInputAction};
use crate::widgets::lead_details_widget::LeadDetailsWidget;

const TICK: Duration = Duration::from_millis(100);

/// The leads page: search box, layout table, pagination and details panel
pub struct LeadsApp {
    source: Box<dyn LeadSource>,
    table: LayoutTable<Lead>,
    /// Filled by the table's row-click handler
    clicked: Rc<RefCell<Option<Lead>>>,
    details: LeadDetailsWidget,
    search: DebouncedInput,
    query: LeadQuery,
    filter_options: FilterOptions,
    state_filter: Option<usize>,
    total_elements: usize,
    total_pages: usize,
    config: Config,
    logs: Option<LogRingBuffer>,
    status: String,
    geometry: TableGeometry,
    first_column: usize,
    scroll_row: usize,
    hover: Option<(u16, u16)>,
    show_columns: bool,
    should_quit: bool,
}

impl LeadsApp {
    pub fn new(source: Box<dyn LeadSource>, store: std::sync::Arc<dyn LayoutStore>, config: Config) -> Self {
        let clicked = Rc::new(RefCell::new(None));
        let sink = clicked.clone();
        let table = LayoutTable::new(config.layout.table_id.clone(), lead_columns(), store)
            .with_options(config.display.table_options())
            .with_measure(Box::new(crate::table::CellMeasure::new(config.display.cell_width_px)))
            .on_row_click(move |lead: &Lead| {
                *sink.borrow_mut() = Some(lead.clone());
            });

        Self {
            status: format!("Source: {}", source.describe()),
            source,
            table,
            clicked,
            details: LeadDetailsWidget::new(),
            search: DebouncedInput::new(config.api.search_debounce_ms),
            query: LeadQuery::new(config.api.page_size),
            filter_options: FilterOptions::default(),
            state_filter: None,
            total_elements: 0,
            total_pages: 0,
            config,
            logs: None,
            geometry: TableGeometry::default(),
            first_column: 0,
            scroll_row: 0,
            hover: None,
            show_columns: false,
            should_quit: false,
        }
    }

    /// Show the newest log line on the status bar
    pub fn with_logs(mut self, logs: LogRingBuffer) -> Self {
        self.logs = Some(logs);
        self
    }

    pub fn table(&self) -> &LayoutTable<Lead> {
        &self.table
    }

    pub fn details(&self) -> &LeadDetailsWidget {
        &self.details
    }

    pub fn query(&self) -> &LeadQuery {
        &self.query
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Load filter options and the first page
    pub fn start(&mut self) {
        self.filter_options = self.source.filter_options();
        self.fetch();
    }

    /// Run the current query against the source
    pub fn fetch(&mut self) {
        match self.source.search(&self.query) {
            Ok(page) => {
                debug!(
                    target: "ui",
                    "Page {} holds {} of {} leads",
                    self.query.page + 1,
                    page.content.len(),
                    page.total_elements
                );
                self.total_elements = page.total_elements;
                self.total_pages = page.total_pages;
                self.table.set_rows(page.content);
            }
            Err(e) => {
                error!(target: "ui", "Failed to fetch leads: {:#}", e);
                self.status = format!("Failed to fetch leads: {}", e);
                self.total_elements = 0;
                self.total_pages = 0;
                self.query.page = 0;
                self.table.set_rows(Vec::new());
            }
        }
        self.scroll_row = 0;
        self.table.set_footer(Some(self.footer_text()));
    }

    /// `Page X of Y (N leads)`
    pub fn footer_text(&self) -> String {
        format!(
            "Page {} of {} ({} leads)",
            self.query.page + 1,
            self.total_pages.max(1),
            self.total_elements
        )
    }

    pub fn next_page(&mut self) {
        if self.query.page + 1 < self.total_pages {
            self.query.page += 1;
            self.fetch();
        }
    }

    pub fn prev_page(&mut self) {
        if self.query.page > 0 {
            self.query.page -= 1;
            self.fetch();
        }
    }

    /// New search term: back to the first page
    pub fn search_for(&mut self, term: String) {
        info!(target: "ui", "Searching for '{}'", term);
        self.query = self.query.clone().with_search_term(term);
        self.fetch();
    }

    /// Step the state filter through the known states, then back to none
    pub fn cycle_state_filter(&mut self) {
        let states = &self.filter_options.states;
        self.state_filter = match self.state_filter {
            None if !states.is_empty() => Some(0),
            Some(i) if i + 1 < states.len() => Some(i + 1),
            _ => None,
        };
        self.query.filters.state = self
            .state_filter
            .and_then(|i| states.get(i).cloned())
            .into_iter()
            .collect();
        self.query.page = 0;
        self.fetch();
    }

    /// Clear the search term and every filter
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.state_filter = None;
        self.query = LeadQuery::new(self.query.size);
        self.fetch();
    }

    /// Poll the search box; runs a search when typing has paused
    pub fn tick(&mut self) {
        if let Some(term) = self.search.check_debounce() {
            self.search_for(term);
        }
        if let Some(entry) = self.logs.as_ref().and_then(LogRingBuffer::latest) {
            self.status = entry.format_for_display();
        }
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // Pointer release can be lost with the focus
            Event::FocusLost => self.table.cancel_gestures(),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.search.handle_key(key) {
            DebouncedInputAction::Confirm(term) => {
                self.search_for(term);
                return;
            }
            DebouncedInputAction::PassThrough => {}
            _ => return,
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.show_columns {
            match key.code {
                KeyCode::Char(c @ '1'..='9') => {
                    let index = c as usize - '1' as usize;
                    if let Some(key) = self.table.columns().get(index).map(|col| col.key.clone()) {
                        self.table.toggle_column(&key);
                    }
                }
                KeyCode::Esc | KeyCode::Char('v') => self.show_columns = false,
                _ => {}
            }
            return;
        }

        if self.details.is_open() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => self.details.close(),
                KeyCode::Down | KeyCode::Char('j') => self.details.scroll_down(),
                KeyCode::Up | KeyCode::Char('k') => self.details.scroll_up(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('/') => self.search.activate(),
            KeyCode::Char('n') | KeyCode::PageDown => self.next_page(),
            KeyCode::Char('p') | KeyCode::PageUp => self.prev_page(),
            KeyCode::Char('r') => self.fetch(),
            KeyCode::Char('R') => {
                self.table.reset_layout();
                self.status = "Column layout reset".to_string();
            }
            KeyCode::Char('s') => self.cycle_state_filter(),
            KeyCode::Char('x') => self.clear_filters(),
            KeyCode::Char('v') => self.show_columns = true,
            KeyCode::Char('e') => self.export(),
            KeyCode::Left | KeyCode::Char('h') => {
                self.first_column = self.first_column.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let last = self.table.rendered_keys().len().saturating_sub(1);
                self.first_column = (self.first_column + 1).min(last);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.table.rows().len().saturating_sub(1);
                self.scroll_row = (self.scroll_row + 1).min(last);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_row = self.scroll_row.saturating_sub(1);
            }
            KeyCode::Enter => self.activate_row(self.scroll_row),
            _ => {}
        }
    }

    /// Terminal cell column to the table's pixel space
    fn px(&self, column: u16) -> i32 {
        i32::from(column) * i32::from(self.config.display.cell_width_px.max(1))
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column, mouse.row);
        let px = self.px(x);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match self.geometry.header_hit(x, y) {
                    Some(HeaderHit::Handle { key }) => {
                        self.table.begin_resize(&key, px);
                    }
                    Some(HeaderHit::Label { index }) => {
                        self.table.begin_drag(index, px);
                    }
                    None => {
                        if let Some(index) = self.geometry.row_at(x, y) {
                            self.activate_row(index);
                        }
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                let key = match self.geometry.header_hit(x, y) {
                    Some(HeaderHit::Handle { key }) => Some(key),
                    Some(HeaderHit::Label { index }) => self.table.rendered_keys().get(index).cloned(),
                    None => None,
                };
                if let Some(key) = key {
                    self.table.toggle_column(&key);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.table.reorder_gesture().is_active() {
                    match self.geometry.column_at(x) {
                        Some(index) => {
                            self.table.drag_over(index, px);
                        }
                        None => self.table.pointer_move(px),
                    }
                } else {
                    self.table.pointer_move(px);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.table.pointer_up(),
            MouseEventKind::Moved => self.hover = Some((x, y)),
            MouseEventKind::ScrollDown => {
                let last = self.table.rows().len().saturating_sub(1);
                self.scroll_row = (self.scroll_row + 1).min(last);
            }
            MouseEventKind::ScrollUp => self.scroll_row = self.scroll_row.saturating_sub(1),
            _ => {}
        }
    }

    fn activate_row(&mut self, index: usize) {
        if self.table.activate_row(index) {
            if let Some(lead) = self.clicked.borrow_mut().take() {
                self.details.open(lead);
            }
        }
    }

    fn export(&mut self) {
        let path = DataExporter::default_filename("leads");
        self.status = match DataExporter::export_csv(&self.table, &path) {
            Ok(message) => message,
            Err(e) => format!("Export failed: {}", e),
        };
    }

    // -------------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------------

    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.search.render(f, chunks[0]);
        f.render_widget(Paragraph::new(self.filter_line()), chunks[1]);

        let (table_area, details_area) = if self.details.is_open() {
            let split = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[2]);
            (split[0], Some(split[1]))
        } else {
            (chunks[2], None)
        };

        let viewport_px = u32::from(table_area.width) * u32::from(self.config.display.cell_width_px);
        if let Some(mode) = self.table.set_viewport_width(viewport_px) {
            info!(target: "ui", "Switched to {:?} view", mode);
            self.first_column = 0;
        }

        let view = self.table.render();
        let ctx = RenderContext {
            title: format!("Leads ({})", self.total_elements),
            cell_width_px: self.config.display.cell_width_px,
            glyphs: self.config.display.glyphs.clone(),
            first_column: self.first_column,
            scroll_row: self.scroll_row,
            hover: self.hover,
        };
        self.geometry = render_table(f, table_area, &view, &ctx);

        if let Some(area) = details_area {
            self.details.render(f, area);
        }
        if self.show_columns {
            self.render_column_menu(f, chunks[2]);
        }

        let status = Paragraph::new(self.status.as_str()).style(Style::default().fg(Color::DarkGray));
        f.render_widget(status, chunks[3]);
    }

    fn filter_line(&self) -> Line<'static> {
        let state = self
            .state_filter
            .and_then(|i| self.filter_options.states.get(i))
            .cloned()
            .unwrap_or_else(|| "all".to_string());
        let mode = match self.table.view_mode() {
            ViewMode::Table => "drag headers to reorder, drag │ to resize, right-click to hide",
            ViewMode::Cards => "card view",
        };
        Line::from(vec![
            Span::styled(" State: ", Style::default().fg(Color::Cyan)),
            Span::raw(state),
            Span::styled(
                format!("  [s]tate [x]clear [v]columns [n/p]age [e]xport [R]eset  {}", mode),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }

    fn render_column_menu(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let mark = if self.table.is_rendered(&column.key) { "[x]" } else { "[ ]" };
                Line::from(format!("{} {} {}", i + 1, mark, column.header))
            })
            .collect();

        let width = 30.min(area.width);
        let height = (lines.len() as u16 + 2).min(area.height);
        let menu_area = Rect::new(area.x + area.width - width, area.y, width, height);
        let menu = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Columns [1-9] ")
                .border_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        );
        f.render_widget(Clear, menu_area);
        f.render_widget(menu, menu_area);
    }

    /// Event loop; returns when the user quits
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(TICK)? {
                let event = event::read()?;
                self.handle_event(event);
            }
            self.tick();
        }
        Ok(())
    }
}

/// Set up the terminal, run the app, and restore the terminal
pub fn run_leads_app(mut app: LeadsApp) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    res
}
