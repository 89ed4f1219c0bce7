use anyhow::{bail, Context, Result};
use crossterm::style::Stylize;
use leadgrid::api::LeadClient;
use leadgrid::config::Config;
use leadgrid::data::exporter::DataExporter;
use leadgrid::data::{lead_columns, JsonFileSource, Lead, LeadQuery, LeadSource};
use leadgrid::logging::init_tracing;
use leadgrid::table::{FileLayoutStore, LayoutStore, LayoutTable, UnavailableStore};
use leadgrid::table_display::display_results;
use leadgrid::ui::{run_leads_app, LeadsApp};
use leadgrid::utils::app_paths::AppPaths;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Default)]
struct Args {
    file: Option<PathBuf>,
    api: Option<String>,
    print: bool,
    export: Option<PathBuf>,
}

fn print_help() {
    println!("{}", "Leadgrid - browse sales leads in the terminal".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  leadgrid [OPTIONS] [FILE.json]");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}         - Leads backend base URL", "--api <URL>".green());
    println!("  {}             - Print the first page and exit", "--print".green());
    println!("  {} - Write the first page to CSV and exit", "--export <FILE.csv>".green());
    println!("  {}   - Print a commented default config", "--generate-config".green());
    println!("  {}              - Show this help", "--help".green());
    println!();
    println!("{}", "Keys:".yellow());
    println!("  {}  - Search (Enter searches now, Esc leaves)", "/".green());
    println!("  {}  - Next / previous page", "n p".green());
    println!("  {}  - Scroll rows / columns", "arrows".green());
    println!("  {}  - Cycle the state filter, clear filters", "s x".green());
    println!("  {}  - Column menu (1-9 toggles a column)", "v".green());
    println!("  {}  - Reset column widths and hidden columns", "R".green());
    println!("  {}  - Export the current page to CSV", "e".green());
    println!("  {}  - Quit", "q".green());
    println!();
    println!("{}", "Mouse:".yellow());
    println!("  Drag a header to move it, drag its right edge to resize,");
    println!("  right-click a header to hide it, click a row for details.");
}

fn parse_args() -> Result<Option<Args>> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            "--generate-config" => {
                println!("{}", Config::create_default_with_comments());
                return Ok(None);
            }
            "--api" => args.api = Some(iter.next().context("--api needs a URL")?),
            "--print" => args.print = true,
            "--export" => {
                args.export = Some(PathBuf::from(iter.next().context("--export needs a file")?))
            }
            other if other.starts_with("--") => bail!("Unknown option {}", other),
            file => args.file = Some(PathBuf::from(file)),
        }
    }
    Ok(Some(args))
}

fn open_store(config: &Config) -> Arc<dyn LayoutStore> {
    let path = match &config.layout.store_file {
        Some(path) => Ok(path.clone()),
        None => AppPaths::layout_file(),
    };
    match path {
        Ok(path) => Arc::new(FileLayoutStore::open(path)),
        Err(e) => {
            warn!(target: "store", "Layout preferences unavailable: {:#}", e);
            Arc::new(UnavailableStore)
        }
    }
}

fn open_source(args: &Args, config: &Config) -> Result<Box<dyn LeadSource>> {
    Ok(match &args.file {
        Some(file) => Box::new(JsonFileSource::open(file)?),
        None => {
            let url = args.api.as_deref().unwrap_or(&config.api.base_url);
            Box::new(LeadClient::new(url).with_auth_token(config.api.auth_token.clone()))
        }
    })
}

/// First page in the persisted layout, for the non-interactive modes
fn first_page(source: &dyn LeadSource, store: Arc<dyn LayoutStore>, config: &Config) -> Result<LayoutTable<Lead>> {
    let query = LeadQuery::new(config.api.page_size);
    let page = source.search(&query)?;
    let mut table = LayoutTable::new(config.layout.table_id.clone(), lead_columns(), store)
        .with_options(config.display.table_options())
        .with_rows(page.content);
    table.set_footer(Some(format!(
        "Page 1 of {} ({} leads)",
        page.total_pages.max(1),
        page.total_elements
    )));
    Ok(table)
}

fn main() -> Result<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Using default config:".yellow(), e);
            Config::default()
        }
    };
    let logs = init_tracing("info");

    let store = open_store(&config);
    let source = open_source(&args, &config)?;

    if args.print || args.export.is_some() {
        let table = first_page(source.as_ref(), store, &config)?;
        if let Some(path) = &args.export {
            let message = DataExporter::export_csv(&table, path)?;
            println!("{}", message.green());
        }
        if args.print {
            display_results(&table, config.display.cell_width_px);
        }
        return Ok(());
    }

    run_leads_app(LeadsApp::new(source, store, config).with_logs(logs))
}
