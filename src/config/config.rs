use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::table::{TableOptions, NARROW_BREAKPOINT_PX};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub api: ApiConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Logical pixels represented by one terminal cell
    pub cell_width_px: u16,

    /// Terminals this many pixels wide or narrower show cards
    pub narrow_breakpoint_px: u32,

    /// Height of a table row in lines
    pub row_height: u16,

    pub sticky_header: bool,

    pub sticky_footer: bool,

    /// Use Unicode glyphs for handles and truncation
    pub use_glyphs: bool,

    /// Filled in from `use_glyphs` on load
    #[serde(skip)]
    pub glyphs: GlyphConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphConfig {
    pub resize_handle: String,
    pub ellipsis: String,
    pub drag_grip: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,

    /// Leads per page
    pub page_size: usize,

    /// Quiet period before a typed search is sent
    pub search_debounce_ms: u64,

    /// Sent as a bearer token when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Namespace of the persisted column layout
    pub table_id: String,

    /// Layout file; defaults to `<data_dir>/leadgrid/layout.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<PathBuf>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cell_width_px: 8,
            narrow_breakpoint_px: NARROW_BREAKPOINT_PX,
            row_height: 1,
            sticky_header: true,
            sticky_footer: true,
            use_glyphs: true,
            glyphs: GlyphConfig::default(),
        }
    }
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            resize_handle: "│".to_string(),
            ellipsis: "…".to_string(),
            drag_grip: "⠿".to_string(),
        }
    }
}

impl GlyphConfig {
    /// ASCII alternatives for terminals without glyph support
    pub fn simple() -> Self {
        Self {
            resize_handle: "|".to_string(),
            ellipsis: "~".to_string(),
            drag_grip: "#".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            page_size: 10,
            search_debounce_ms: 500,
            auth_token: None,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            table_id: "leads".to_string(),
            store_file: None,
        }
    }
}

impl DisplayConfig {
    /// Visual options handed to the table
    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            row_height: self.row_height.max(1),
            sticky_header: self.sticky_header,
            sticky_footer: self.sticky_footer,
            footer: None,
            narrow_breakpoint: self.narrow_breakpoint_px,
        }
    }
}

impl Config {
    /// Load config from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        if !config.display.use_glyphs {
            config.display.glyphs = GlyphConfig::simple();
        }
        config.display.cell_width_px = config.display.cell_width_px.max(1);
        config.api.page_size = config.api.page_size.max(1);

        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("leadgrid").join("config.toml"))
    }

    /// Default config file with comments, printed by `--generate-config`
    pub fn create_default_with_comments() -> String {
        r#"# Leadgrid Configuration File
# Location: ~/.config/leadgrid/config.toml (Linux)
#           ~/Library/Application Support/leadgrid/config.toml (macOS)
#           %APPDATA%\leadgrid\config.toml (Windows)

[display]
# Layout is computed in logical pixels; this is how many one terminal cell is
cell_width_px = 8

# At or below this width (in pixels) rows are shown as stacked cards
narrow_breakpoint_px = 768

# Height of each table row, in lines
row_height = 1

# Keep the header row pinned while the body scrolls
sticky_header = true

# Keep the pagination footer pinned below the table
sticky_footer = true

# Use Unicode glyphs for resize handles and truncation
# Set to false for ASCII-only mode
use_glyphs = true

[api]
# Leads backend
base_url = "http://localhost:8080/api"

# Leads per page
page_size = 10

# Wait this long after the last keystroke before searching
search_debounce_ms = 500

# Bearer token (leave commented when the backend needs none)
# auth_token = "..."

[layout]
# Column widths and hidden columns are stored under this id
table_id = "leads"

# Layout file (leave commented to use the data directory)
# store_file = "/path/to/layout.json"
"#
        .to_string()
    }
}
