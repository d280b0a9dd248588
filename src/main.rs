#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use crud_page::{
    Entity, FieldCollection, JsonFileColumnStorage, Page, PageConfig, PageSettings, SelectedColumnStorage,
    TranslationParameters,
};

#[derive(Debug, Parser)]
#[command(name = "crud-page", version, about = "Inspect admin page settings and column selections")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the fields a list page renders for a controller
    Columns {
        /// Page settings JSON file
        #[arg(long)]
        settings: PathBuf,
        /// Field catalog JSON file (array of field descriptors)
        #[arg(long)]
        fields: PathBuf,
        /// Controller identity (overrides the one in the settings file)
        #[arg(long)]
        controller: Option<String>,
        /// Column selection store (defaults to the user config dir)
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Persist a column selection for a controller
    Select {
        #[arg(long)]
        controller: String,
        /// Comma separated column names, in display order
        #[arg(long, value_delimiter = ',', required = true)]
        columns: Vec<String>,
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Print the title a page would render
    Title {
        #[arg(long)]
        settings: PathBuf,
        #[arg(long)]
        page: Page,
        /// String representation of the entity being shown
        #[arg(long)]
        entity: Option<String>,
    },
}

fn open_storage(store: Option<PathBuf>) -> JsonFileColumnStorage {
    JsonFileColumnStorage::new(store.unwrap_or_else(JsonFileColumnStorage::default_path))
}

fn load_fields(path: &Path) -> Result<FieldCollection> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read field catalog from {:?}", path))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse field catalog from {:?}", path))
}

fn run_columns(settings: &Path, fields: &Path, controller: Option<String>, store: Option<PathBuf>) -> Result<()> {
    let settings = PageSettings::load(settings)?;
    let fields = load_fields(fields)?;

    let mut config = PageConfig::new();
    settings.apply(&mut config);
    config.set_page_name(Some(Page::Index));
    if let Some(controller) = controller {
        config.set_controller_fqcn(controller);
    }
    let storage = open_storage(store);
    info!(path = %storage.path().display(), "Using column selection store");
    config.set_column_chooser_storage(Some(Arc::new(storage)));

    if !config.is_column_chooser_enabled() {
        warn!("Column chooser disabled in page settings, listing every field");
    }

    let rendered = config.column_chooser_process_fields(&fields).into_owned();
    for field in &rendered {
        println!("{}\t{}", field.property, field.label_or_humanized());
    }

    if config.is_column_chooser_enabled() {
        println!();
        println!("selected:  {}", config.selected_columns().join(", "));
        println!("available: {}", config.available_columns().join(", "));
    }
    Ok(())
}

fn run_select(controller: &str, columns: &[String], store: Option<PathBuf>) -> Result<()> {
    let storage = open_storage(store);
    storage.store_selected_columns(controller, columns)?;
    println!("Saved {} column(s) for {} in {}", columns.len(), controller, storage.path().display());
    Ok(())
}

fn run_title(settings: &Path, page: Page, entity: Option<String>) -> Result<()> {
    let settings = PageSettings::load(settings)?;
    let mut config = PageConfig::new();
    settings.apply(&mut config);
    config.set_page_name(Some(page));

    let entity = entity.as_ref().map(|e| e as &dyn Entity);
    let parameters = TranslationParameters::new();
    let title = config
        .custom_page_title(None, entity, &parameters)
        .or_else(|| config.default_page_title(None, entity, &parameters));

    match title {
        Some(title) => match &title.domain {
            Some(domain) => println!("{} [{}]", title.message, domain),
            None => println!("{}", title.message),
        },
        None => println!("(no title)"),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    match cli.command {
        Command::Columns {
            settings,
            fields,
            controller,
            store,
        } => run_columns(&settings, &fields, controller, store),
        Command::Select {
            controller,
            columns,
            store,
        } => run_select(&controller, &columns, store),
        Command::Title { settings, page, entity } => run_title(&settings, page, entity),
    }
}
