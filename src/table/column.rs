use std::fmt;
use std::sync::Arc;

use super::row::{CellValue, TableRow};

/// Maps (cell value, full row) to display text
pub type CellRenderer<T> = Arc<dyn Fn(&CellValue, &T) -> String + Send + Sync>;

/// Static descriptor of one table column.
///
/// Widths are in logical pixels. `width` is only a default; a persisted
/// user override wins over it.
pub struct ColumnDef<T> {
    pub key: String,
    pub header: String,
    pub width: Option<u16>,
    pub min_width: Option<u16>,
    pub max_width: Option<u16>,
    /// Seeds the initial visible set only
    pub visible: bool,
    pub render: Option<CellRenderer<T>>,
}

impl<T> ColumnDef<T> {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            width: None,
            min_width: None,
            max_width: None,
            visible: true,
            render: None,
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn min_width(mut self, min_width: u16) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn max_width(mut self, max_width: u16) -> Self {
        self.max_width = Some(max_width);
        self
    }

    /// Start the column outside the visible set
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&CellValue, &T) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }
}

impl<T: TableRow> ColumnDef<T> {
    /// Display text for this column's cell in `row`
    pub fn format_cell(&self, row: &T) -> String {
        let value = row.cell(&self.key);
        match &self.render {
            Some(render) => render(&value, row),
            None => value.to_string(),
        }
    }
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            width: self.width,
            min_width: self.min_width,
            max_width: self.max_width,
            visible: self.visible,
            render: self.render.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("width", &self.width)
            .field("min_width", &self.min_width)
            .field("max_width", &self.max_width)
            .field("visible", &self.visible)
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_format_cell_stringifies_without_renderer() {
        let col: ColumnDef<Value> = ColumnDef::new("count", "Count");
        assert_eq!(col.format_cell(&json!({"count": 42})), "42");
        assert_eq!(col.format_cell(&json!({})), "");
    }

    #[test]
    fn test_format_cell_uses_renderer() {
        let col: ColumnDef<Value> = ColumnDef::new("name", "Name")
            .render(|value, row: &Value| format!("{} <{}>", value, row.cell("email")));
        let row = json!({"name": "Ada", "email": "ada@example.com"});
        assert_eq!(col.format_cell(&row), "Ada <ada@example.com>");
    }
}
