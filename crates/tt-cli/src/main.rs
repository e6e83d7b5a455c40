use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tt_cli::commands::{clients, entries, projects};
use tt_cli::{ClientsAction, Cli, Commands, Config, EntriesAction, ProjectsAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(tt_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = tt_db::Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let (mut db, config) = open_database(cli.config.as_deref())?;
    let format = config.datetime_format.as_str();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Clients(action)) => match action {
            ClientsAction::List { json } => clients::list(&mut out, &db, *json)?,
            ClientsAction::Add { name } => clients::add(&mut out, &mut db, name)?,
            ClientsAction::Show { id } => clients::show(&mut out, &db, *id)?,
            ClientsAction::Update { id, name } => clients::update(&mut out, &mut db, *id, name)?,
        },
        Some(Commands::Projects(action)) => match action {
            ProjectsAction::List { json } => projects::list(&mut out, &db, *json)?,
            ProjectsAction::Add(args) => projects::add(&mut out, &mut db, args)?,
            ProjectsAction::Show { id } => projects::show(&mut out, &db, *id, format)?,
            ProjectsAction::Update { id, fields } => {
                projects::update(&mut out, &mut db, *id, fields)?;
            }
        },
        Some(Commands::Entries(action)) => match action {
            EntriesAction::List { json, open } => {
                entries::list(&mut out, &db, format, *json, *open)?;
            }
            EntriesAction::Add(args) => entries::add(&mut out, &mut db, args, format)?,
            EntriesAction::Show { id } => entries::show(&mut out, &db, *id, format)?,
            EntriesAction::Update { id, fields } => {
                entries::update(&mut out, &mut db, *id, fields, format)?;
            }
            EntriesAction::Stop { id } => entries::stop(&mut out, &mut db, *id, format)?,
        },
        // The bare command lands on the client list.
        None => clients::list(&mut out, &db, false)?,
    }

    out.flush()?;
    Ok(())
}
