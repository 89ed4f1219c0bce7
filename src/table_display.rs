use comfy_table::{
    Attribute, Cell, ColumnConstraint, ContentArrangement, Table, Width as ColumnWidth,
};
use crossterm::style::Stylize;

use crate::table::{LayoutTable, TableRow};

/// Build a comfy table of the rendered columns, each fixed to its
/// effective width converted to terminal cells
pub fn build_table<T: TableRow>(table: &LayoutTable<T>, cell_width_px: u16) -> Table {
    let cell_px = cell_width_px.max(1);
    let columns = table.visible_columns();
    let widths = table.column_widths();

    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Disabled);
    out.set_header(
        columns
            .iter()
            .map(|c| Cell::new(&c.header).add_attribute(Attribute::Bold)),
    );

    for row in table.rows() {
        out.add_row(columns.iter().map(|c| c.format_cell(row)));
    }

    let constraints = widths
        .iter()
        .map(|(_, px)| ColumnConstraint::Absolute(ColumnWidth::Fixed((px / cell_px).max(1))));
    out.set_constraints(constraints);
    out
}

/// Print the table once to stdout, followed by its footer
pub fn display_results<T: TableRow>(table: &LayoutTable<T>, cell_width_px: u16) {
    if table.rows().is_empty() {
        println!("{}", "No results.".yellow());
        return;
    }

    println!("{}", build_table(table, cell_width_px));
    match &table.options().footer {
        Some(footer) => println!("\n{}", footer.as_str().green()),
        None => println!("\n{}", format!("{} leads shown", table.rows().len()).green()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ColumnDef, MemoryLayoutStore};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[test]
    fn test_hidden_columns_are_not_printed() {
        let columns = vec![
            ColumnDef::new("name", "Name"),
            ColumnDef::new("email", "Email"),
        ];
        let mut table: LayoutTable<Value> =
            LayoutTable::new("print", columns, Arc::new(MemoryLayoutStore::new()))
                .with_rows(vec![json!({"name": "Ada", "email": "ada@example.com"})]);
        table.toggle_column("email");

        let rendered = build_table(&table, 8).to_string();
        assert!(rendered.contains("Name"));
        assert!(rendered.contains("Ada"));
        assert!(!rendered.contains("Email"));
    }
}
