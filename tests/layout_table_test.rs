use leadgrid::table::{
    ColumnDef, LayoutStore, LayoutTable, MemoryLayoutStore, TableBody, TableView, ViewMode,
    MIN_COLUMN_WIDTH,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Helper: the three-column table used by most tests
fn columns() -> Vec<ColumnDef<Value>> {
    vec![
        ColumnDef::new("name", "Name").width(200),
        ColumnDef::new("email", "Email").width(200),
        ColumnDef::new("state", "State").width(120),
    ]
}

fn mount(store: &Arc<MemoryLayoutStore>) -> LayoutTable<Value> {
    let store: Arc<dyn LayoutStore> = store.clone();
    LayoutTable::new("leads", columns(), store)
}

fn rows(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({"name": format!("Lead {}", i), "email": format!("lead{}@example.com", i), "state": "CA"}))
        .collect()
}

fn drag(table: &mut LayoutTable<Value>, from: usize, to: usize) -> bool {
    assert!(table.begin_drag(from, 0));
    table.drag_over(to, 10);
    table.drag_end()
}

fn resize(table: &mut LayoutTable<Value>, key: &str, delta: i32) {
    assert!(table.begin_resize(key, 1000));
    table.pointer_move(1000 + delta);
    table.pointer_up();
}

#[test]
fn test_example_scenario_drag_then_resize() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);

    assert!(drag(&mut table, 2, 0));
    assert_eq!(table.rendered_keys(), ["state", "name", "email"]);

    resize(&mut table, "email", -50);
    assert_eq!(table.effective_width("email"), Some(150));

    // Re-render with unchanged definitions keeps the session order
    table.set_columns(columns());
    assert_eq!(table.rendered_keys(), ["state", "name", "email"]);
    assert_eq!(
        table.column_widths(),
        vec![
            ("state".to_string(), 120),
            ("name".to_string(), 200),
            ("email".to_string(), 150)
        ]
    );

    // A new mount sees the persisted width
    let remounted = mount(&store);
    assert_eq!(remounted.effective_width("email"), Some(150));
    assert_eq!(remounted.effective_width("name"), Some(200));
    assert_eq!(remounted.effective_width("state"), Some(120));
}

#[test]
fn test_committed_resize_survives_remount() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    resize(&mut table, "name", 60);
    assert_eq!(mount(&store).effective_width("name"), Some(260));

    // A drag far to the left commits the floor
    resize(&mut table, "name", -1000);
    assert_eq!(mount(&store).effective_width("name"), Some(MIN_COLUMN_WIDTH));
}

#[test]
fn test_release_without_move_writes_nothing() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    assert!(table.begin_resize("name", 10));
    table.pointer_up();
    assert!(store.is_empty());
    assert!(!table.resize_gesture().is_active());
}

#[test]
fn test_live_width_is_floored_during_drag() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    table.begin_resize("state", 0);
    table.pointer_move(-500);
    assert_eq!(table.effective_width("state"), Some(MIN_COLUMN_WIDTH));
}

#[test]
fn test_effective_width_within_bounds_for_any_override() {
    let store = Arc::new(MemoryLayoutStore::new());
    store.set("bounded.columnWidths", json!({"a": 20, "b": 5000, "c": 300}));
    let defs = vec![
        ColumnDef::new("a", "A").min_width(120).max_width(400),
        ColumnDef::new("b", "B").min_width(120).max_width(400),
        ColumnDef::new("c", "C").min_width(120).max_width(400),
    ];
    let table: LayoutTable<Value> = LayoutTable::new("bounded", defs, store);
    for (_, width) in table.column_widths() {
        assert!((120..=400).contains(&width), "width {} out of bounds", width);
    }
}

#[test]
fn test_min_above_max_prefers_max() {
    let defs = vec![ColumnDef::new("a", "A").min_width(300).max_width(200)];
    let table: LayoutTable<Value> =
        LayoutTable::new("odd", defs, Arc::new(MemoryLayoutStore::new()));
    assert_eq!(table.effective_width("a"), Some(200));
}

#[test]
fn test_hide_then_show_restores_position() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    drag(&mut table, 0, 2);
    assert_eq!(table.rendered_keys(), ["email", "state", "name"]);

    assert!(table.toggle_column("state"));
    assert_eq!(table.rendered_keys(), ["email", "name"]);
    assert!(table.is_hidden("state"));

    assert!(table.toggle_column("state"));
    assert_eq!(table.rendered_keys(), ["email", "state", "name"]);
}

#[test]
fn test_hidden_set_is_persisted() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    table.toggle_column("email");

    let remounted = mount(&store);
    assert_eq!(remounted.rendered_keys(), ["name", "state"]);
    assert!(!mount(&store).toggle_column("unknown"));
}

#[test]
fn test_reorder_skips_hidden_columns() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    table.toggle_column("email");
    // Rendered: [name, state]; move state to the front
    assert!(drag(&mut table, 1, 0));
    assert_eq!(table.rendered_keys(), ["state", "name"]);

    table.toggle_column("email");
    assert_eq!(table.rendered_keys(), ["state", "email", "name"]);
}

#[test]
fn test_drop_on_source_or_nowhere_keeps_order() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    assert!(!drag(&mut table, 1, 1));
    assert!(table.begin_drag(1, 0));
    assert!(!table.drag_end());
    assert_eq!(table.rendered_keys(), ["name", "email", "state"]);
}

#[test]
fn test_new_definitions_are_appended() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    drag(&mut table, 2, 0);

    let mut defs = vec![ColumnDef::new("phone", "Phone")];
    defs.extend(columns().into_iter().filter(|c| c.key != "email"));
    defs.push(ColumnDef::new("notes", "Notes").hidden());
    table.set_columns(defs);

    assert_eq!(table.rendered_keys(), ["state", "name", "phone"]);

    // A column that starts invisible can still be shown
    assert!(table.toggle_column("notes"));
    assert_eq!(table.rendered_keys(), ["state", "name", "phone", "notes"]);
}

#[test]
fn test_empty_rows_render_one_placeholder() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    let TableView::Desktop(view) = table.render() else {
        panic!("expected desktop view");
    };
    match view.body {
        TableBody::Empty { colspan, message } => {
            assert_eq!(colspan, 3);
            assert_eq!(message, "No results.");
        }
        TableBody::Rows(_) => panic!("expected placeholder"),
    }
}

#[test]
fn test_each_row_activates_with_its_record() {
    let store: Arc<dyn LayoutStore> = Arc::new(MemoryLayoutStore::new());
    let clicked = Rc::new(RefCell::new(Vec::new()));
    let sink = clicked.clone();
    let mut table = LayoutTable::new("leads", columns(), store)
        .with_rows(rows(3))
        .on_row_click(move |row: &Value| sink.borrow_mut().push(row["name"].clone()));

    assert_eq!(table.render().row_count(), 3);
    for i in 0..3 {
        assert!(table.activate_row(i));
    }
    assert!(!table.activate_row(3));
    assert_eq!(*clicked.borrow(), vec![json!("Lead 0"), json!("Lead 1"), json!("Lead 2")]);
}

#[test]
fn test_rows_ignore_activation_while_resizing() {
    let store: Arc<dyn LayoutStore> = Arc::new(MemoryLayoutStore::new());
    let mut table = LayoutTable::new("leads", columns(), store)
        .with_rows(rows(1))
        .on_row_click(|_: &Value| {});
    table.begin_resize("name", 0);
    assert!(!table.activate_row(0));
    table.pointer_up();
    assert!(table.activate_row(0));
}

#[test]
fn test_cards_present_every_visible_value() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store).with_rows(rows(2));
    table.toggle_column("state");

    assert_eq!(table.set_viewport_width(600), Some(ViewMode::Cards));
    let TableView::Cards(cards) = table.render() else {
        panic!("expected cards");
    };
    assert_eq!(cards.cards.len(), 2);
    let card = &cards.cards[1];
    let labels: Vec<&str> = card.fields.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, ["Name", "Email"]);
    assert_eq!(card.fields[0].content.text, "Lead 1");
    assert_eq!(card.fields[1].content.text, "lead1@example.com");

    assert_eq!(table.set_viewport_width(1024), Some(ViewMode::Table));
    assert_eq!(table.render().row_count(), 2);
}

#[test]
fn test_entering_cards_abandons_gestures() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    table.begin_resize("email", 0);
    table.pointer_move(80);
    table.set_viewport_width(500);
    assert!(!table.resize_gesture().is_active());
    assert!(store.is_empty());
}

#[test]
fn test_focus_loss_cancels_drag() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    table.begin_drag(0, 0);
    table.drag_over(2, 300);
    table.cancel_gestures();
    assert!(!table.drag_end());
    assert_eq!(table.rendered_keys(), ["name", "email", "state"]);
}

#[test]
fn test_drag_proxy_follows_pointer() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    table.begin_drag(1, 100);
    table.pointer_move(340);
    let TableView::Desktop(view) = table.render() else {
        panic!("expected desktop view");
    };
    let proxy = view.drag_proxy.expect("proxy while dragging");
    assert_eq!(proxy.x, 340);
    assert_eq!(proxy.width, 200);
    assert!(view.header[1].dragging);

    table.pointer_up();
    let TableView::Desktop(view) = table.render() else {
        panic!("expected desktop view");
    };
    assert!(view.drag_proxy.is_none());
}

#[test]
fn test_overflowing_cells_carry_tooltips() {
    let store: Arc<dyn LayoutStore> = Arc::new(MemoryLayoutStore::new());
    let long = "an-extremely-long-email-address-that-cannot-fit@example.com";
    let mut table = LayoutTable::new("leads", columns(), store)
        .with_rows(vec![json!({"name": "Ada", "email": long, "state": "CA"})]);

    let TableView::Desktop(view) = table.render() else {
        panic!("expected desktop view");
    };
    let TableBody::Rows(rows) = view.body else {
        panic!("expected rows");
    };
    assert!(rows[0].cells[0].content.tooltip.is_none());
    assert_eq!(rows[0].cells[1].content.tooltip.as_deref(), Some(long));
}

#[test]
fn test_reset_layout_clears_overrides() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);
    resize(&mut table, "name", 100);
    table.toggle_column("state");
    table.reset_layout();

    let remounted = mount(&store);
    assert_eq!(remounted.effective_width("name"), Some(200));
    assert_eq!(remounted.rendered_keys(), ["name", "email", "state"]);
}

#[test]
fn test_column_hidden_by_default_shows_after_remount_in_one_toggle() {
    let store: Arc<dyn LayoutStore> = Arc::new(MemoryLayoutStore::new());
    let defs = || {
        let mut defs = columns();
        defs.push(ColumnDef::new("sent", "Sent").hidden());
        defs
    };

    let mut table: LayoutTable<Value> = LayoutTable::new("leads", defs(), store.clone());
    assert!(table.toggle_column("sent"));
    assert!(table.is_rendered("sent"));
    assert!(table.toggle_column("sent"));
    assert!(table.is_hidden("sent"));

    let mut remounted: LayoutTable<Value> = LayoutTable::new("leads", defs(), store);
    assert!(!remounted.is_rendered("sent"));
    assert!(remounted.toggle_column("sent"));
    assert_eq!(remounted.rendered_keys(), ["name", "email", "state", "sent"]);
}

#[test]
fn test_hiding_another_column_mid_drag_keeps_the_drop_on_target() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);

    assert!(table.begin_drag(2, 400));
    table.toggle_column("name");
    // Rendered is now [email, state]; drop state on email
    table.drag_over(0, 10);
    assert!(table.drag_end());
    assert_eq!(table.rendered_keys(), ["state", "email"]);

    table.toggle_column("name");
    assert_eq!(table.rendered_keys(), ["name", "state", "email"]);
}

#[test]
fn test_hiding_the_dragged_column_ends_the_drag() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut table = mount(&store);

    assert!(table.begin_drag(0, 0));
    table.toggle_column("name");
    assert!(!table.reorder_gesture().is_active());
    table.drag_over(1, 300);
    assert!(!table.drag_end());
    assert_eq!(table.rendered_keys(), ["email", "state"]);
}

#[test]
fn test_resize_commits_no_narrower_than_min_width() {
    let store = Arc::new(MemoryLayoutStore::new());
    let defs = vec![ColumnDef::new("name", "Name").width(200).min_width(150)];
    let shared: Arc<dyn LayoutStore> = store.clone();
    let mut table: LayoutTable<Value> = LayoutTable::new("bounded", defs.clone(), shared.clone());

    assert!(table.begin_resize("name", 1000));
    table.pointer_move(920);
    assert_eq!(table.effective_width("name"), Some(150));
    table.pointer_up();
    assert_eq!(table.layout_state().width_override("name"), Some(150));

    let remounted: LayoutTable<Value> = LayoutTable::new("bounded", defs, shared);
    assert_eq!(remounted.layout_state().width_override("name"), Some(150));
}
