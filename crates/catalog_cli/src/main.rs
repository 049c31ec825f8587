//! `catalog` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from a YAML file and flag overrides.
//! - Open the configured store once and run the scripted session on stdout.
//!
//! Read, update and delete failures end the process with exit code 1.

use catalog_core::db::open_configured;
use catalog_core::{
    init_logging, init_stderr_logging, run_walkthrough, CatalogConfig, CatalogService,
    SqliteCategoryRepository, SqliteProductRepository,
};
use clap::Parser;
use log::error;
use std::error::Error;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "catalog")]
#[command(version = catalog_core::core_version())]
#[command(about = "Category/product CRUD walkthrough against SQLite", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database file, or `:memory:` (overrides `database.path`)
    #[arg(long, value_name = "PATH")]
    db: Option<String>,

    /// Log level: trace|debug|info|warn|error (overrides `logging.level`)
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files (overrides `logging.dir`)
    #[arg(long, value_name = "DIR")]
    log_dir: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!("event=cli_exit module=cli status=error error={err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(&cli)?;

    match config.logging.dir.as_deref() {
        Some(dir) => init_logging(&config.logging.level, dir)?,
        None => init_stderr_logging(&config.logging.level)?,
    }

    let conn = open_configured(&config.database)?;
    let service = CatalogService::new(
        SqliteCategoryRepository::try_new(&conn)?,
        SqliteProductRepository::try_new(&conn)?,
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_walkthrough(&service, &mut out)?;
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<CatalogConfig, Box<dyn Error>> {
    let mut config = match cli.config.as_ref() {
        Some(path) => CatalogConfig::load_unvalidated(path)?,
        None => CatalogConfig {
            logging: catalog_core::LoggingConfig {
                level: "warn".to_string(),
                dir: None,
            },
            ..CatalogConfig::default()
        },
    };

    if let Some(db) = cli.db.as_ref() {
        config.database.path = db.clone();
    }
    if let Some(level) = cli.log_level.as_ref() {
        config.logging.level = level.clone();
    }
    if let Some(dir) = cli.log_dir.as_ref() {
        config.logging.dir = Some(dir.clone());
    }

    config.validate()?;
    Ok(config)
}
