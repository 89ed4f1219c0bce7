//! The layout table component.
//!
//! `LayoutTable` owns everything about how columns are laid out (persisted
//! widths and hidden set, session order, the resize and reorder gestures,
//! the responsive view mode) and turns a row sequence into a
//! [`TableView`]. Header and body widths come from one place,
//! [`LayoutTable::column_widths`], so they cannot drift apart.

use std::sync::Arc;
use tracing::{debug, info};

use super::column::ColumnDef;
use super::layout_state::LayoutState;
use super::overflow::{content_box, Measure, TextMeasurer, CELL_PADDING_PX};
use super::reorder::ReorderGesture;
use super::resize::ResizeGesture;
use super::row::TableRow;
use super::store::LayoutStore;
use super::view::{
    BodyCell, BodyRow, Card, CardField, CardsView, DesktopView, HeaderCell, TableBody, TableView,
};
use super::viewport::{ViewMode, ViewportWatcher};
use super::visible_order::VisibleOrder;
use super::width::{resize_floor, resolve_width};

const EMPTY_MESSAGE: &str = "No results.";

/// Called with the full row record when a row is activated
pub type RowClickHandler<T> = Box<dyn FnMut(&T)>;

/// Visual configuration supplied by the host page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Fixed row height in lines
    pub row_height: u16,
    pub sticky_header: bool,
    pub sticky_footer: bool,
    pub footer: Option<String>,
    /// Viewport width at or below which rows render as cards
    pub narrow_breakpoint: u32,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            row_height: 1,
            sticky_header: true,
            sticky_footer: false,
            footer: None,
            narrow_breakpoint: super::viewport::NARROW_BREAKPOINT_PX,
        }
    }
}

pub struct LayoutTable<T: TableRow> {
    id: String,
    columns: Vec<ColumnDef<T>>,
    rows: Vec<T>,
    store: Arc<dyn LayoutStore>,
    layout: LayoutState,
    order: VisibleOrder,
    resize: ResizeGesture,
    reorder: ReorderGesture,
    viewport: ViewportWatcher,
    options: TableOptions,
    on_row_click: Option<RowClickHandler<T>>,
    measurer: TextMeasurer,
}

impl<T: TableRow> LayoutTable<T> {
    /// Mount a table. Layout preferences are read from `store` under `id`;
    /// an unreadable store yields the default layout.
    pub fn new(id: impl Into<String>, columns: Vec<ColumnDef<T>>, store: Arc<dyn LayoutStore>) -> Self {
        let id = id.into();
        let layout = LayoutState::load(store.as_ref(), &id);
        let order = VisibleOrder::from_columns(&columns);
        debug!(
            target: "layout",
            "Mounted table '{}' with {} columns ({} width overrides, {} hidden)",
            id,
            columns.len(),
            layout.column_widths.len(),
            layout.hidden_columns.len()
        );

        Self {
            id,
            columns,
            rows: Vec::new(),
            store,
            layout,
            order,
            resize: ResizeGesture::default(),
            reorder: ReorderGesture::default(),
            viewport: ViewportWatcher::default(),
            options: TableOptions::default(),
            on_row_click: None,
            measurer: TextMeasurer::default(),
        }
    }

    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.viewport = ViewportWatcher::new(options.narrow_breakpoint);
        self.options = options;
        self
    }

    pub fn with_measure(mut self, measure: Box<dyn Measure>) -> Self {
        self.measurer = TextMeasurer::new(measure);
        self
    }

    pub fn with_rows(mut self, rows: Vec<T>) -> Self {
        self.rows = rows;
        self
    }

    pub fn on_row_click<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&T) + 'static,
    {
        self.on_row_click = Some(Box::new(handler));
        self
    }

    // -------------------------------------------------------------------------
    // Inputs
    // -------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn columns(&self) -> &[ColumnDef<T>] {
        &self.columns
    }

    /// Replace the column definitions, keeping the user's session order
    pub fn set_columns(&mut self, columns: Vec<ColumnDef<T>>) {
        self.order.reconcile(&columns);
        self.columns = columns;

        // A gesture on a column that no longer renders cannot complete
        if let Some(key) = self.resize.column() {
            if !self.is_rendered(key) {
                self.resize.cancel();
            }
        }
        if let Some(key) = self.reorder.source_key() {
            if !self.is_rendered(key) {
                self.reorder.cancel();
            }
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn set_footer(&mut self, footer: Option<String>) {
        self.options.footer = footer;
    }

    pub fn layout_state(&self) -> &LayoutState {
        &self.layout
    }

    pub fn visible_order(&self) -> &VisibleOrder {
        &self.order
    }

    pub fn resize_gesture(&self) -> &ResizeGesture {
        &self.resize
    }

    pub fn reorder_gesture(&self) -> &ReorderGesture {
        &self.reorder
    }

    // -------------------------------------------------------------------------
    // Columns and widths
    // -------------------------------------------------------------------------

    pub fn column(&self, key: &str) -> Option<&ColumnDef<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Keys of the columns that render, in render order
    pub fn rendered_keys(&self) -> Vec<String> {
        self.order
            .rendered(&self.layout.hidden_columns)
            .filter(|k| self.column(k).is_some())
            .map(str::to_string)
            .collect()
    }

    /// Column definitions that render, in render order
    pub fn visible_columns(&self) -> Vec<&ColumnDef<T>> {
        self.order
            .rendered(&self.layout.hidden_columns)
            .filter_map(|k| self.column(k))
            .collect()
    }

    pub fn is_rendered(&self, key: &str) -> bool {
        self.visible_columns().iter().any(|c| c.key == key)
    }

    pub fn is_hidden(&self, key: &str) -> bool {
        self.layout.is_hidden(key)
    }

    /// Width `key` renders at this frame, or `None` for an unknown column
    pub fn effective_width(&self, key: &str) -> Option<u16> {
        let column = self.column(key)?;
        Some(resolve_width(
            column,
            self.resize.live_width(key),
            self.layout.width_override(key),
        ))
    }

    /// The single width computation both header and body consume
    pub fn column_widths(&self) -> Vec<(String, u16)> {
        self.visible_columns()
            .into_iter()
            .map(|c| {
                let width = resolve_width(
                    c,
                    self.resize.live_width(&c.key),
                    self.layout.width_override(&c.key),
                );
                (c.key.clone(), width)
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Resize gesture
    // -------------------------------------------------------------------------

    /// Press on the resize handle of `key` at pointer `x`
    pub fn begin_resize(&mut self, key: &str, x: i32) -> bool {
        if self.view_mode() == ViewMode::Cards || !self.is_rendered(key) {
            return false;
        }
        self.close_stale_gestures();

        let Some(column) = self.column(key) else {
            return false;
        };
        let floor = resize_floor(column);
        let Some(start_width) = self.effective_width(key) else {
            return false;
        };
        self.resize.begin(key, x, start_width, floor);
        true
    }

    /// Pointer moved. Feeds whichever gesture is active.
    pub fn pointer_move(&mut self, x: i32) {
        if self.resize.is_active() {
            self.resize.update(x);
        } else if self.reorder.is_active() {
            self.reorder.move_proxy(x);
        }
    }

    /// Pointer released. Commits the active gesture.
    pub fn pointer_up(&mut self) {
        if self.resize.is_active() {
            self.finish_resize();
        } else if self.reorder.is_active() {
            self.drag_end();
        }
    }

    fn finish_resize(&mut self) {
        if let Some((key, width)) = self.resize.release() {
            info!(target: "layout", "Column '{}' resized to {}px", key, width);
            self.layout.column_widths.insert(key, width);
            self.layout.save_widths(self.store.as_ref(), &self.id);
        }
    }

    // -------------------------------------------------------------------------
    // Reorder gesture
    // -------------------------------------------------------------------------

    /// Start dragging the rendered column at `index`
    pub fn begin_drag(&mut self, index: usize, x: i32) -> bool {
        if self.view_mode() == ViewMode::Cards {
            return false;
        }
        let Some((key, width)) = self.column_widths().into_iter().nth(index) else {
            return false;
        };

        self.close_stale_gestures();
        self.reorder.begin(&key, x, width);
        true
    }

    /// Pointer is over the rendered column at `index` during a drag
    pub fn drag_over(&mut self, index: usize, x: i32) -> bool {
        match self.rendered_keys().get(index) {
            Some(key) => self.reorder.drag_over(key, x),
            None => {
                self.reorder.move_proxy(x);
                false
            }
        }
    }

    /// Drop: splice the visible order when the target differs from the source.
    ///
    /// Positions come from the rendered order at drop time; a source or
    /// target that no longer renders leaves the order alone.
    pub fn drag_end(&mut self) -> bool {
        let Some((source, target)) = self.reorder.end() else {
            return false;
        };
        let rendered = self.rendered_keys();
        let position = |key: &str| rendered.iter().position(|k| k == key);
        let (Some(from), Some(to)) = (position(&source), position(&target)) else {
            debug!(target: "layout", "Drop of '{}' on '{}' no longer applies", source, target);
            return false;
        };
        let moved = self.order.move_rendered(&self.layout.hidden_columns, from, to);
        if moved {
            info!(target: "layout", "Moved column '{}' to position {}", source, to);
        }
        moved
    }

    /// Abandon any in-progress gesture without committing anything
    pub fn cancel_gestures(&mut self) {
        self.resize.cancel();
        self.reorder.cancel();
    }

    /// A new press while a gesture is still open means its release was
    /// lost. A stale resize commits what it had; a stale drag is dropped.
    fn close_stale_gestures(&mut self) {
        if self.resize.is_active() {
            debug!(target: "layout", "Closing resize gesture whose release was lost");
            self.finish_resize();
        }
        if self.reorder.is_active() {
            debug!(target: "layout", "Dropping drag gesture whose release was lost");
            self.reorder.cancel();
        }
    }

    // -------------------------------------------------------------------------
    // Visibility
    // -------------------------------------------------------------------------

    /// Hide a shown column or show a hidden one.
    ///
    /// A defined column outside the session order (it started invisible) is
    /// appended to the order instead. Returns false for unknown keys.
    pub fn toggle_column(&mut self, key: &str) -> bool {
        if self.column(key).is_none() {
            return false;
        }

        if !self.layout.is_hidden(key) && !self.order.contains(key) {
            self.order.append(key);
            info!(target: "layout", "Column '{}' shown", key);
            return true;
        }

        let hidden = self.layout.toggle_hidden(key);
        if hidden {
            if self.reorder.source_key() == Some(key) {
                self.reorder.cancel();
            }
        } else {
            // Hidden since a previous mount without ever being ordered
            self.order.append(key);
        }
        info!(
            target: "layout",
            "Column '{}' {}",
            key,
            if hidden { "hidden" } else { "shown" }
        );
        self.layout.save_hidden(self.store.as_ref(), &self.id);
        true
    }

    /// Forget width overrides and the hidden set for this table
    pub fn reset_layout(&mut self) {
        self.cancel_gestures();
        self.layout = LayoutState::default();
        self.layout.save_widths(self.store.as_ref(), &self.id);
        self.layout.save_hidden(self.store.as_ref(), &self.id);
        info!(target: "layout", "Layout of '{}' reset", self.id);
    }

    // -------------------------------------------------------------------------
    // Rows and viewport
    // -------------------------------------------------------------------------

    /// Activate the row at `index`, invoking the row-click handler
    pub fn activate_row(&mut self, index: usize) -> bool {
        if self.resize.is_active() {
            return false;
        }
        let Some(row) = self.rows.get(index) else {
            return false;
        };
        match self.on_row_click.as_mut() {
            Some(handler) => {
                handler(row);
                true
            }
            None => false,
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.viewport.mode()
    }

    pub fn viewport(&self) -> &ViewportWatcher {
        &self.viewport
    }

    /// Report the viewport width. Crossing into cards abandons gestures,
    /// since resize and reorder only exist in the table view.
    pub fn set_viewport_width(&mut self, width: u32) -> Option<ViewMode> {
        let changed = self.viewport.update(width);
        if changed == Some(ViewMode::Cards) {
            self.cancel_gestures();
        }
        changed
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    pub fn render(&mut self) -> TableView {
        match self.view_mode() {
            ViewMode::Table => TableView::Desktop(self.render_desktop()),
            ViewMode::Cards => TableView::Cards(self.render_cards()),
        }
    }

    fn render_desktop(&mut self) -> DesktopView {
        let widths = self.column_widths();
        let drag = self.reorder.state().cloned();
        let resizing_key = self.resize.column().map(str::to_string);

        let header: Vec<HeaderCell> = widths
            .iter()
            .enumerate()
            .map(|(i, (key, width))| HeaderCell {
                key: key.clone(),
                label: self.column(key).map(|c| c.header.clone()).unwrap_or_default(),
                width: *width,
                dragging: drag.as_ref().is_some_and(|d| &d.source_key == key),
                drop_target: drag.as_ref().is_some_and(|d| d.target_key.as_ref() == Some(key)),
                resizing: resizing_key.as_deref() == Some(key.as_str()),
                is_last: i + 1 == widths.len(),
            })
            .collect();

        let body = if self.rows.is_empty() {
            TableBody::Empty {
                colspan: widths.len(),
                message: EMPTY_MESSAGE.to_string(),
            }
        } else {
            let mut rows = Vec::with_capacity(self.rows.len());
            for (index, row) in self.rows.iter().enumerate() {
                let mut cells = Vec::with_capacity(widths.len());
                for (key, width) in &widths {
                    let text = self
                        .columns
                        .iter()
                        .find(|c| &c.key == key)
                        .map(|c| c.format_cell(row))
                        .unwrap_or_default();
                    cells.push(BodyCell {
                        key: key.clone(),
                        width: *width,
                        content: self.measurer.cell(text, content_box(*width)),
                    });
                }
                rows.push(BodyRow { index, cells });
            }
            TableBody::Rows(rows)
        };

        DesktopView {
            total_width: widths.iter().map(|(_, w)| u32::from(*w)).sum(),
            header,
            body,
            row_height: self.options.row_height.max(1),
            sticky_header: self.options.sticky_header,
            sticky_footer: self.options.sticky_footer,
            footer: self.options.footer.clone(),
            drag_proxy: self.reorder.proxy(),
            resizing: self.resize.is_active(),
            clickable_rows: self.on_row_click.is_some(),
        }
    }

    fn render_cards(&mut self) -> CardsView {
        // Label and value split the card in two
        let value_box = self
            .viewport
            .width()
            .map(|w| (w / 2).saturating_sub(u32::from(CELL_PADDING_PX)))
            .unwrap_or(0);

        let columns: Vec<(String, String)> = self
            .visible_columns()
            .into_iter()
            .map(|c| (c.key.clone(), c.header.clone()))
            .collect();

        let mut cards = Vec::with_capacity(self.rows.len());
        for (index, row) in self.rows.iter().enumerate() {
            let mut fields = Vec::with_capacity(columns.len());
            for (key, label) in &columns {
                let text = self
                    .columns
                    .iter()
                    .find(|c| &c.key == key)
                    .map(|c| c.format_cell(row))
                    .unwrap_or_default();
                fields.push(CardField {
                    key: key.clone(),
                    label: label.clone(),
                    content: self.measurer.cell(text, value_box),
                });
            }
            cards.push(Card { index, fields });
        }

        CardsView {
            cards,
            footer: self.options.footer.clone(),
            sticky_footer: self.options.sticky_footer,
        }
    }
}

impl<T: TableRow> std::fmt::Debug for LayoutTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutTable")
            .field("id", &self.id)
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("layout", &self.layout)
            .field("order", &self.order)
            .field("resize", &self.resize)
            .field("reorder", &self.reorder)
            .field("viewport", &self.viewport)
            .finish()
    }
}
