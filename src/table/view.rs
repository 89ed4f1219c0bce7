//! Render model produced by [`LayoutTable::render`](super::LayoutTable::render).
//!
//! Front ends draw these structures and never compute widths themselves.

use super::overflow::CellContent;
use super::reorder::DragProxy;

#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    Desktop(DesktopView),
    Cards(CardsView),
}

impl TableView {
    pub fn row_count(&self) -> usize {
        match self {
            TableView::Desktop(view) => match &view.body {
                TableBody::Rows(rows) => rows.len(),
                TableBody::Empty { .. } => 0,
            },
            TableView::Cards(view) => view.cards.len(),
        }
    }

    pub fn footer(&self) -> Option<&str> {
        match self {
            TableView::Desktop(view) => view.footer.as_deref(),
            TableView::Cards(view) => view.footer.as_deref(),
        }
    }
}

/// Fixed header over a scrolling body
#[derive(Debug, Clone, PartialEq)]
pub struct DesktopView {
    pub header: Vec<HeaderCell>,
    pub body: TableBody,
    /// Sum of the effective widths of the rendered columns
    pub total_width: u32,
    pub row_height: u16,
    pub sticky_header: bool,
    pub sticky_footer: bool,
    pub footer: Option<String>,
    pub drag_proxy: Option<DragProxy>,
    /// A resize is in progress; rows ignore pointer input
    pub resizing: bool,
    pub clickable_rows: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub width: u16,
    pub dragging: bool,
    pub drop_target: bool,
    pub resizing: bool,
    pub is_last: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    /// Placeholder spanning every rendered column
    Empty { colspan: usize, message: String },
    Rows(Vec<BodyRow>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyRow {
    /// Index into the table's row sequence
    pub index: usize,
    pub cells: Vec<BodyCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyCell {
    pub key: String,
    pub width: u16,
    pub content: CellContent,
}

/// Stacked cards for narrow viewports
#[derive(Debug, Clone, PartialEq)]
pub struct CardsView {
    pub cards: Vec<Card>,
    pub footer: Option<String>,
    pub sticky_footer: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub index: usize,
    pub fields: Vec<CardField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardField {
    pub key: String,
    pub label: String,
    pub content: CellContent,
}
