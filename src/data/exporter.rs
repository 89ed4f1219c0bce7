use anyhow::{anyhow, Context, Result};
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::table::{LayoutTable, TableRow};

/// Writes the rows a table currently holds, using the columns it renders
pub struct DataExporter;

impl DataExporter {
    /// `leads_<timestamp>.csv` in the working directory
    pub fn default_filename(prefix: &str) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("{}_{}.csv", prefix, timestamp))
    }

    /// Export to `path`. Returns a status message.
    pub fn export_csv<T: TableRow>(table: &LayoutTable<T>, path: &Path) -> Result<String> {
        if table.rows().is_empty() {
            return Err(anyhow!("No data to export"));
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let count = Self::write_csv(table, file)?;
        info!(target: "source", "Exported {} rows to {}", count, path.display());
        Ok(format!("Exported {} rows to CSV file: {}", count, path.display()))
    }

    /// Header row of column labels then one record per row, in render order
    pub fn write_csv<T: TableRow, W: Write>(table: &LayoutTable<T>, writer: W) -> Result<usize> {
        let columns = table.visible_columns();
        let mut wtr = csv::Writer::from_writer(writer);

        wtr.write_record(columns.iter().map(|c| c.header.as_str()))?;
        for row in table.rows() {
            wtr.write_record(columns.iter().map(|c| c.format_cell(row)))?;
        }
        wtr.flush()?;
        Ok(table.rows().len())
    }
}
