//! Draws a [`TableView`] with ratatui.
//!
//! The view is in logical pixels; every width is divided by the configured
//! cell width to get terminal cells. Drawing returns a [`TableGeometry`] the
//! event loop uses to map mouse positions back onto headers, handles, rows
//! and cards.

use crate::config::config::GlyphConfig;
use crate::table::{
    CardsView, CellContent, DesktopView, HeaderCell, TableBody, TableView,
};
use ratatui::{
    layout::{Constraint, Flex},
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Everything the renderer needs besides the view itself
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub title: String,
    pub cell_width_px: u16,
    pub glyphs: GlyphConfig,
    /// Rendered column shown at the left edge
    pub first_column: usize,
    /// First row (or card) shown in the body
    pub scroll_row: usize,
    /// Mouse position, for tooltips
    pub hover: Option<(u16, u16)>,
}

impl RenderContext {
    fn cells(&self, px: u16) -> u16 {
        px_to_cells(px, self.cell_width_px)
    }
}

/// Pixel width to terminal cells. Never less than two: one for text and
/// one for the resize handle.
pub fn px_to_cells(px: u16, cell_width_px: u16) -> u16 {
    (px / cell_width_px.max(1)).max(2)
}

/// Screen position of a drawn header cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpan {
    /// Index among the rendered columns
    pub index: usize,
    pub key: String,
    pub x: u16,
    pub width: u16,
}

impl ColumnSpan {
    pub fn contains(&self, x: u16) -> bool {
        x >= self.x && x < self.x + self.width
    }

    /// The last cell of the header is its resize handle
    pub fn on_handle(&self, x: u16) -> bool {
        self.width > 0 && x == self.x + self.width - 1
    }
}

/// Screen rectangle of a drawn row or card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    /// Index into the table's rows
    pub index: usize,
    pub area: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderHit {
    Handle { key: String },
    Label { index: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableGeometry {
    pub header_y: Option<u16>,
    pub columns: Vec<ColumnSpan>,
    pub rows: Vec<RowSpan>,
    /// How many rows or cards fit in the body
    pub page_rows: usize,
    overflowing: Vec<(Rect, String)>,
}

impl TableGeometry {
    pub fn header_hit(&self, x: u16, y: u16) -> Option<HeaderHit> {
        if self.header_y != Some(y) {
            return None;
        }
        let span = self.columns.iter().find(|c| c.contains(x))?;
        Some(if span.on_handle(x) {
            HeaderHit::Handle {
                key: span.key.clone(),
            }
        } else {
            HeaderHit::Label { index: span.index }
        })
    }

    /// Rendered column under `x`, whatever the row
    pub fn column_at(&self, x: u16) -> Option<usize> {
        self.columns.iter().find(|c| c.contains(x)).map(|c| c.index)
    }

    pub fn row_at(&self, x: u16, y: u16) -> Option<usize> {
        self.rows
            .iter()
            .find(|r| contains(r.area, x, y))
            .map(|r| r.index)
    }

    /// Full text of the overflowing cell under the pointer
    pub fn tooltip_at(&self, x: u16, y: u16) -> Option<&str> {
        self.overflowing
            .iter()
            .find(|(area, _)| contains(*area, x, y))
            .map(|(_, text)| text.as_str())
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

pub fn render_table(f: &mut Frame, area: Rect, view: &TableView, ctx: &RenderContext) -> TableGeometry {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", ctx.title));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let geometry = match view {
        TableView::Desktop(desktop) => render_desktop(f, inner, desktop, ctx),
        TableView::Cards(cards) => render_cards(f, inner, cards, ctx),
    };

    if let Some((x, y)) = ctx.hover {
        if let Some(text) = geometry.tooltip_at(x, y).map(str::to_string) {
            render_tooltip(f, area, x, y, &text);
        }
    }
    geometry
}

// -----------------------------------------------------------------------------
// Desktop
// -----------------------------------------------------------------------------

fn render_desktop(f: &mut Frame, area: Rect, view: &DesktopView, ctx: &RenderContext) -> TableGeometry {
    let mut geometry = TableGeometry::default();
    if area.height == 0 || area.width == 0 {
        return geometry;
    }

    // Columns that fit from the horizontal offset on; the last one may be cut
    let first = ctx.first_column.min(view.header.len().saturating_sub(1));
    let mut x = area.x;
    for (index, header) in view.header.iter().enumerate().skip(first) {
        let right = area.x + area.width;
        if x >= right {
            break;
        }
        let width = ctx.cells(header.width).min(right - x);
        geometry.columns.push(ColumnSpan {
            index,
            key: header.key.clone(),
            x,
            width,
        });
        x += width;
    }

    let show_header = ctx.scroll_row == 0 || view.sticky_header;
    let footer_lines = u16::from(view.footer.is_some());
    let mut y = area.y;
    if show_header {
        geometry.header_y = Some(y);
        y += 1;
    }

    let body_bottom = if view.sticky_footer {
        area.y + area.height.saturating_sub(footer_lines)
    } else {
        area.y + area.height
    };
    let row_height = view.row_height.max(1);
    let body_height = body_bottom.saturating_sub(y);
    geometry.page_rows = usize::from(body_height / row_height);

    let widths: Vec<Constraint> = geometry
        .columns
        .iter()
        .map(|c| Constraint::Length(c.width))
        .collect();
    let table_width: u16 = geometry.columns.iter().map(|c| c.width).sum();

    let header = show_header.then(|| header_row(view, &geometry.columns, ctx));

    let rows: Vec<Row> = match &view.body {
        TableBody::Empty { .. } => Vec::new(),
        TableBody::Rows(rows) => {
            let mut drawn = Vec::new();
            let mut row_y = y;
            for row in rows.iter().skip(ctx.scroll_row).take(geometry.page_rows) {
                let mut cells = Vec::with_capacity(geometry.columns.len());
                for span in &geometry.columns {
                    let Some(cell) = row.cells.get(span.index) else {
                        continue;
                    };
                    // Keep the handle cell clear when the column is cut at the edge
                    let text_width = span.width.saturating_sub(1);
                    if let Some(tooltip) = &cell.content.tooltip {
                        geometry.overflowing.push((
                            Rect::new(span.x, row_y, span.width, row_height),
                            tooltip.clone(),
                        ));
                    }
                    cells.push(Cell::from(fit_text(
                        &cell.content,
                        text_width,
                        ctx.cell_width_px,
                        &ctx.glyphs.ellipsis,
                    )));
                }

                let style = if view.clickable_rows && !view.resizing {
                    Style::default()
                } else {
                    Style::default().fg(Color::Gray)
                };
                geometry.rows.push(RowSpan {
                    index: row.index,
                    area: Rect::new(area.x, row_y, table_width, row_height),
                });
                drawn.push(Row::new(cells).height(row_height).style(style));
                row_y += row_height;
            }
            drawn
        }
    };

    let table_area = Rect::new(area.x, area.y, area.width, body_bottom.saturating_sub(area.y));
    let mut table = Table::new(rows, widths)
        .column_spacing(0)
        .flex(Flex::Start);
    if let Some(header) = header {
        table = table.header(header);
    }
    f.render_widget(table, table_area);

    // Placeholder spans every column
    if let TableBody::Empty { message, .. } = &view.body {
        if body_height > 0 {
            let placeholder = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
            f.render_widget(placeholder, Rect::new(area.x, y, table_width.max(1), 1));
        }
    }

    if let Some(footer) = &view.footer {
        let footer_y = if view.sticky_footer {
            body_bottom
        } else {
            let last = geometry.rows.last().map(|r| r.area.y + r.area.height);
            last.unwrap_or(y + row_height.min(body_height))
        };
        if footer_y < area.y + area.height {
            let footer_widget = Paragraph::new(footer.as_str()).style(Style::default().fg(Color::Green));
            f.render_widget(footer_widget, Rect::new(area.x, footer_y, area.width, 1));
        }
    }

    if let (Some(proxy), Some(header_y)) = (&view.drag_proxy, geometry.header_y) {
        render_drag_proxy(f, area, header_y, view, &proxy.source_key, proxy.x, proxy.width, ctx);
    }

    geometry
}

fn header_row<'a>(view: &'a DesktopView, columns: &[ColumnSpan], ctx: &RenderContext) -> Row<'a> {
    let cells = columns.iter().filter_map(|span| {
        let header = view.header.get(span.index)?;
        let label_width = span.width.saturating_sub(1);
        let label = truncate(&header.label, label_width, &ctx.glyphs.ellipsis);
        let padded = format!("{:<width$}", label, width = usize::from(label_width));

        let handle_style = if header.resizing {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Some(Cell::from(Line::from(vec![
            Span::styled(padded, header_style(header)),
            Span::styled(ctx.glyphs.resize_handle.clone(), handle_style),
        ])))
    });
    Row::new(cells.collect::<Vec<_>>())
}

fn header_style(header: &HeaderCell) -> Style {
    let base = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    if header.dragging {
        base.fg(Color::DarkGray)
    } else if header.drop_target {
        base.fg(Color::Yellow).add_modifier(Modifier::UNDERLINED)
    } else {
        base
    }
}

#[allow(clippy::too_many_arguments)]
fn render_drag_proxy(
    f: &mut Frame,
    area: Rect,
    header_y: u16,
    view: &DesktopView,
    source_key: &str,
    pointer_px: i32,
    width_px: u16,
    ctx: &RenderContext,
) {
    let y = header_y + 1;
    if y >= area.y + area.height {
        return;
    }
    let label = view
        .header
        .iter()
        .find(|h| h.key == source_key)
        .map(|h| h.label.as_str())
        .unwrap_or_default();
    let width = ctx.cells(width_px).min(area.width);
    let pointer = (pointer_px.max(0) / i32::from(ctx.cell_width_px.max(1))) as u16;
    let x = pointer
        .saturating_sub(width / 2)
        .clamp(area.x, area.x + area.width - width);

    let text = format!("{} {}", ctx.glyphs.drag_grip, label);
    let proxy = Paragraph::new(truncate(&text, width, &ctx.glyphs.ellipsis)).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let proxy_area = Rect::new(x, y, width, 1);
    f.render_widget(Clear, proxy_area);
    f.render_widget(proxy, proxy_area);
}

// -----------------------------------------------------------------------------
// Cards
// -----------------------------------------------------------------------------

fn render_cards(f: &mut Frame, area: Rect, view: &CardsView, ctx: &RenderContext) -> TableGeometry {
    let mut geometry = TableGeometry::default();
    let footer_lines = u16::from(view.footer.is_some());
    let bottom = area.y + area.height.saturating_sub(footer_lines);

    if view.cards.is_empty() {
        let placeholder = Paragraph::new("No results.")
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        f.render_widget(placeholder, Rect::new(area.x, area.y, area.width, 1.min(area.height)));
    }

    let label_width = area.width.saturating_sub(2) / 2;
    let value_width = area.width.saturating_sub(2).saturating_sub(label_width);
    let mut y = area.y;
    for card in view.cards.iter().skip(ctx.scroll_row) {
        let height = card.fields.len() as u16 + 2;
        if y + height > bottom {
            break;
        }
        let card_area = Rect::new(area.x, y, area.width, height);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(card_area);
        f.render_widget(block, card_area);

        let lines: Vec<Line> = card
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                if let Some(tooltip) = &field.content.tooltip {
                    geometry.overflowing.push((
                        Rect::new(inner.x + label_width, inner.y + i as u16, value_width, 1),
                        tooltip.clone(),
                    ));
                }
                let label = truncate(&field.label, label_width.saturating_sub(1), &ctx.glyphs.ellipsis);
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", label, width = usize::from(label_width)),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(fit_text(
                        &field.content,
                        value_width,
                        ctx.cell_width_px,
                        &ctx.glyphs.ellipsis,
                    )),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(lines), inner);

        geometry.rows.push(RowSpan {
            index: card.index,
            area: card_area,
        });
        geometry.page_rows += 1;
        y += height;
    }

    if let Some(footer) = &view.footer {
        let footer_y = if view.sticky_footer { bottom } else { y };
        if footer_y < area.y + area.height {
            f.render_widget(
                Paragraph::new(footer.as_str()).style(Style::default().fg(Color::Green)),
                Rect::new(area.x, footer_y, area.width, 1),
            );
        }
    }

    geometry.page_rows = geometry.page_rows.max(1);
    geometry
}

// -----------------------------------------------------------------------------
// Text
// -----------------------------------------------------------------------------

fn render_tooltip(f: &mut Frame, bounds: Rect, x: u16, y: u16, text: &str) {
    let max_width = bounds.width.saturating_sub(2).max(1);
    let width = (text.width() as u16 + 2).min(max_width);
    let lines = (text.width() as u16).div_ceil(width.saturating_sub(2).max(1));
    let height = (lines + 2).min(bounds.height);

    let below = y + 1;
    let top = if below + height <= bounds.y + bounds.height {
        below
    } else {
        y.saturating_sub(height).max(bounds.y)
    };
    let left = x.min(bounds.x + bounds.width - width).max(bounds.x);

    let area = Rect::new(left, top, width, height);
    let tooltip = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));
    f.render_widget(Clear, area);
    f.render_widget(tooltip, area);
}

/// Cell text cut to `width` columns; overflowing text ends in the ellipsis
/// Cell text as drawn: cut to its text box exactly when the table marked
/// it overflowing, never otherwise. `width` caps the result to the cells
/// actually on screen.
pub fn fit_text(content: &CellContent, width: u16, cell_width_px: u16, ellipsis: &str) -> String {
    if !content.overflowing {
        return content.text.clone();
    }
    let text_box = content.container_width / u32::from(cell_width_px.max(1));
    let cells = u16::try_from(text_box).unwrap_or(u16::MAX).min(width);
    cut(&content.text, cells, ellipsis)
}

/// Cut `text` to at most `width` display columns, marking the cut
pub fn truncate(text: &str, width: u16, ellipsis: &str) -> String {
    if text.width() <= usize::from(width) {
        return text.to_string();
    }
    cut(text, width, ellipsis)
}

fn cut(text: &str, width: u16, ellipsis: &str) -> String {
    let width = usize::from(width);
    let budget = width.saturating_sub(ellipsis.width());
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if ellipsis.width() <= width {
        out.push_str(ellipsis);
    }
    out
}
