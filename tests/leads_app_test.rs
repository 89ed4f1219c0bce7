use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use leadgrid::config::Config;
use leadgrid::data::{JsonFileSource, Lead};
use leadgrid::table::{LayoutStore, MemoryLayoutStore, ViewMode};
use leadgrid::ui::LeadsApp;
use ratatui::{backend::TestBackend, Terminal};
use std::sync::Arc;

// Layout at 160x30: search box rows 0-2, filter line row 3, table border
// row 4, header row 5, first body row 6. Name spans cells 1..=25 with its
// resize handle on cell 25; State starts at cell 48.
const HEADER_Y: u16 = 5;
const FIRST_ROW_Y: u16 = 6;
const NAME_HANDLE_X: u16 = 25;
const STATE_LABEL_X: u16 = 50;

fn leads(n: usize) -> Vec<Lead> {
    (0..n)
        .map(|i| Lead {
            lead_id: i.to_string(),
            name: format!("Lead {}", i),
            occupation: "Engineer".to_string(),
            state: if i % 2 == 0 { "CA" } else { "NY" }.to_string(),
            email: Some(format!("lead{}@example.com", i)),
            ..Default::default()
        })
        .collect()
}

fn app_with(store: Arc<MemoryLayoutStore>, n: usize) -> LeadsApp {
    let mut config = Config::default();
    config.api.search_debounce_ms = 0;
    let store: Arc<dyn LayoutStore> = store;
    let mut app = LeadsApp::new(Box::new(JsonFileSource::from_leads(leads(n))), store, config);
    app.start();
    app
}

fn draw(app: &mut LeadsApp, width: u16) {
    let mut terminal = Terminal::new(TestBackend::new(width, 30)).unwrap();
    terminal.draw(|f| app.draw(f)).unwrap();
}

fn mouse(app: &mut LeadsApp, kind: MouseEventKind, column: u16, row: u16) {
    app.handle_event(Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }));
}

fn key(app: &mut LeadsApp, code: KeyCode) {
    app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
}

#[test]
fn test_first_page_and_footer() {
    let app = app_with(Arc::new(MemoryLayoutStore::new()), 23);
    assert_eq!(app.table().rows().len(), 10);
    assert_eq!(app.footer_text(), "Page 1 of 3 (23 leads)");
    assert_eq!(app.table().options().footer.as_deref(), Some("Page 1 of 3 (23 leads)"));
}

#[test]
fn test_paging_stops_at_the_ends() {
    let mut app = app_with(Arc::new(MemoryLayoutStore::new()), 23);
    key(&mut app, KeyCode::Char('p'));
    assert_eq!(app.query().page, 0);

    key(&mut app, KeyCode::Char('n'));
    key(&mut app, KeyCode::PageDown);
    key(&mut app, KeyCode::Char('n'));
    assert_eq!(app.query().page, 2);
    assert_eq!(app.table().rows().len(), 3);
    assert_eq!(app.footer_text(), "Page 3 of 3 (23 leads)");
}

#[test]
fn test_empty_source_shows_single_page() {
    let app = app_with(Arc::new(MemoryLayoutStore::new()), 0);
    assert_eq!(app.footer_text(), "Page 1 of 1 (0 leads)");
}

#[test]
fn test_debounced_search_resets_to_first_page() {
    let mut app = app_with(Arc::new(MemoryLayoutStore::new()), 23);
    key(&mut app, KeyCode::Char('n'));
    assert_eq!(app.query().page, 1);

    key(&mut app, KeyCode::Char('/'));
    for c in "lead1".chars() {
        key(&mut app, KeyCode::Char(c));
    }
    app.tick();
    assert_eq!(app.query().search_term, "lead1");
    assert_eq!(app.query().page, 0);
    // Lead 1 and Lead 10..=19
    assert_eq!(app.footer_text(), "Page 1 of 2 (11 leads)");
}

#[test]
fn test_enter_searches_immediately() {
    let mut app = app_with(Arc::new(MemoryLayoutStore::new()), 23);
    key(&mut app, KeyCode::Char('/'));
    for c in "22".chars() {
        key(&mut app, KeyCode::Char(c));
    }
    key(&mut app, KeyCode::Enter);
    assert_eq!(app.table().rows().len(), 1);
    // Typing no longer goes to the search box
    key(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit());
}

#[test]
fn test_mouse_resize_persists_width() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut app = app_with(store.clone(), 5);
    draw(&mut app, 160);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), NAME_HANDLE_X, HEADER_Y);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), NAME_HANDLE_X + 5, HEADER_Y);
    assert_eq!(app.table().effective_width("name"), Some(240));
    assert!(store.is_empty());

    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), NAME_HANDLE_X + 5, HEADER_Y);
    assert_eq!(app.table().layout_state().width_override("name"), Some(240));
    assert!(!store.is_empty());
}

#[test]
fn test_mouse_drag_reorders_columns() {
    let mut app = app_with(Arc::new(MemoryLayoutStore::new()), 5);
    draw(&mut app, 160);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), STATE_LABEL_X, HEADER_Y);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 5, HEADER_Y);
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 5, HEADER_Y);

    let keys = app.table().rendered_keys();
    assert_eq!(&keys[..3], ["state", "name", "occupation"]);
}

#[test]
fn test_focus_loss_abandons_drag() {
    let mut app = app_with(Arc::new(MemoryLayoutStore::new()), 5);
    draw(&mut app, 160);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), STATE_LABEL_X, HEADER_Y);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 5, HEADER_Y);
    app.handle_event(Event::FocusLost);
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 5, HEADER_Y);

    assert_eq!(app.table().rendered_keys()[0], "name");
}

#[test]
fn test_right_click_hides_column() {
    let mut app = app_with(Arc::new(MemoryLayoutStore::new()), 5);
    draw(&mut app, 160);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Right), STATE_LABEL_X, HEADER_Y);
    assert!(app.table().is_hidden("state"));
    assert!(!app.table().rendered_keys().contains(&"state".to_string()));
}

#[test]
fn test_row_click_opens_details() {
    let mut app = app_with(Arc::new(MemoryLayoutStore::new()), 5);
    draw(&mut app, 160);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 10, FIRST_ROW_Y + 2);
    let lead = app.details().lead().expect("details panel open");
    assert_eq!(lead.name, "Lead 2");

    key(&mut app, KeyCode::Esc);
    assert!(!app.details().is_open());
    assert!(!app.should_quit());
}

#[test]
fn test_narrow_terminal_switches_to_cards() {
    let mut app = app_with(Arc::new(MemoryLayoutStore::new()), 3);
    draw(&mut app, 80);
    assert_eq!(app.table().view_mode(), ViewMode::Cards);

    draw(&mut app, 160);
    assert_eq!(app.table().view_mode(), ViewMode::Table);
}

#[test]
fn test_column_menu_toggles_by_number() {
    let mut app = app_with(Arc::new(MemoryLayoutStore::new()), 3);
    key(&mut app, KeyCode::Char('v'));
    key(&mut app, KeyCode::Char('2'));
    assert!(app.table().is_hidden("occupation"));
    key(&mut app, KeyCode::Char('7'));
    assert!(app.table().is_rendered("sentDate"));
    key(&mut app, KeyCode::Esc);
    assert!(!app.should_quit());
}

#[test]
fn test_state_filter_cycles() {
    let mut app = app_with(Arc::new(MemoryLayoutStore::new()), 6);
    key(&mut app, KeyCode::Char('s'));
    assert_eq!(app.query().filters.state, ["CA"]);
    assert_eq!(app.table().rows().len(), 3);
    key(&mut app, KeyCode::Char('s'));
    assert_eq!(app.query().filters.state, ["NY"]);
    key(&mut app, KeyCode::Char('s'));
    assert!(app.query().filters.state.is_empty());
    assert_eq!(app.table().rows().len(), 6);
}
