use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .context("Cannot determine data directory")?
            .join("leadgrid");

        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        Ok(data_dir)
    }

    /// Default home of the persisted column layout
    pub fn layout_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("layout.json"))
    }
}
