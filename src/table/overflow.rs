//! Overflow detection for cell text.
//!
//! Measuring is injected through [`Measure`] so the decision logic runs
//! without a real layout engine.

use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

/// Horizontal padding inside a cell, both sides together
pub const CELL_PADDING_PX: u16 = 16;

/// Cap on remembered measurements before the cache is dropped
const MAX_CACHED_MEASUREMENTS: usize = 4096;

/// Natural width of a piece of text, in logical pixels
pub trait Measure {
    fn text_width(&self, text: &str) -> u32;
}

/// Monospace measurement: display columns times the pixel width of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMeasure {
    pub cell_width_px: u16,
}

impl CellMeasure {
    pub fn new(cell_width_px: u16) -> Self {
        Self {
            cell_width_px: cell_width_px.max(1),
        }
    }
}

impl Default for CellMeasure {
    fn default() -> Self {
        Self::new(8)
    }
}

impl Measure for CellMeasure {
    fn text_width(&self, text: &str) -> u32 {
        UnicodeWidthStr::width(text) as u32 * u32::from(self.cell_width_px)
    }
}

pub fn overflows(content_width: u32, container_width: u32) -> bool {
    content_width > container_width
}

/// Space available to text in a cell of the given width
pub fn content_box(width: u16) -> u32 {
    u32::from(width.saturating_sub(CELL_PADDING_PX))
}

/// Text for one cell plus the overflow decision made for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellContent {
    pub text: String,
    /// Text box the decision was made against, in logical pixels. Front
    /// ends cut overflowing text to this width so the visual truncation and
    /// the tooltip agree.
    pub container_width: u32,
    pub overflowing: bool,
    /// Full text, present only when the cell overflows
    pub tooltip: Option<String>,
}

impl CellContent {
    pub fn fitting(text: impl Into<String>, container_width: u32) -> Self {
        Self {
            text: text.into(),
            container_width,
            overflowing: false,
            tooltip: None,
        }
    }
}

/// Measurer with a per-text cache.
///
/// Natural width depends only on the text, so a changed value is measured
/// afresh while unchanged values reuse the last result.
pub struct TextMeasurer {
    measure: Box<dyn Measure>,
    cache: HashMap<String, u32>,
}

impl TextMeasurer {
    pub fn new(measure: Box<dyn Measure>) -> Self {
        Self {
            measure,
            cache: HashMap::new(),
        }
    }

    pub fn text_width(&mut self, text: &str) -> u32 {
        if let Some(width) = self.cache.get(text) {
            return *width;
        }
        if self.cache.len() >= MAX_CACHED_MEASUREMENTS {
            self.cache.clear();
        }
        let width = self.measure.text_width(text);
        self.cache.insert(text.to_string(), width);
        width
    }

    /// Decide overflow for `text` inside a container `container_width` wide
    pub fn cell(&mut self, text: String, container_width: u32) -> CellContent {
        if overflows(self.text_width(&text), container_width) {
            CellContent {
                tooltip: Some(text.clone()),
                text,
                container_width,
                overflowing: true,
            }
        } else {
            CellContent::fitting(text, container_width)
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl Default for TextMeasurer {
    fn default() -> Self {
        Self::new(Box::new(CellMeasure::default()))
    }
}

impl std::fmt::Debug for TextMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMeasurer")
            .field("cached", &self.cache.len())
            .finish()
    }
}
