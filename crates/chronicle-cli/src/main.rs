//! Chronicle CLI - Command-line interface for the Chronicle archive.

use chronicle_cli::commands;
use chronicle_cli::{Cli, Command, Config, Formatter};
use chronicle_store::SqliteStore;
use clap::Parser;
use std::fs;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> chronicle_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Log to stderr so table and JSON output stay clean; RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    // Load or create config
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::path()?,
    };
    let mut config = if config_path.exists() {
        Config::load_from(&config_path)?
    } else {
        let cfg = Config::default();
        cfg.save_to(&config_path).ok();
        cfg
    };

    if let Some(database) = cli.database {
        config.database = database;
    }
    config.validate()?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Open the archive
    if let Some(parent) = config.database.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut store = SqliteStore::new(&config.database)?;

    // Handle commands
    match cli.command {
        Command::Add(args) => {
            commands::execute_add(args, &mut store, &config, &formatter).await?;
        }
        Command::Show(args) => {
            commands::execute_show(args, &store, &formatter)?;
        }
        Command::List(args) => {
            commands::execute_list(args, &store, &config, &formatter)?;
        }
        Command::Delete(args) => {
            commands::execute_delete(args, &mut store, &formatter)?;
        }
        Command::Date(cmd) => {
            commands::execute_date(cmd, &mut store, &formatter)?;
        }
        Command::Timeline(args) => {
            commands::execute_timeline(args, &store, &formatter)?;
        }
        Command::Cite(args) => {
            let today = chrono::Local::now().date_naive();
            commands::execute_cite(args, &store, &config, &formatter, today)?;
        }
        Command::Facets(cmd) => {
            commands::execute_facets(cmd, &mut store, &formatter)?;
        }
        Command::Tags(args) => {
            commands::execute_tags(args, &store, &formatter)?;
        }
        Command::Translate(cmd) => {
            commands::execute_translate(cmd, &mut store, &config, &formatter)?;
        }
    }

    Ok(())
}
