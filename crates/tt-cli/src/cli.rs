//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tt_core::{ClientId, EntryId, ProjectId};

/// Client, project and time entry tracker.
///
/// Clients own projects, projects own time entries. Running without a command
/// lists clients.
#[derive(Debug, Parser)]
#[command(name = "tt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List, create and update clients.
    #[command(subcommand)]
    Clients(ClientsAction),

    /// List, create and update projects.
    #[command(subcommand)]
    Projects(ProjectsAction),

    /// List, create, update and stop time entries.
    #[command(subcommand)]
    Entries(EntriesAction),
}

#[derive(Debug, Subcommand)]
pub enum ClientsAction {
    /// List all clients.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Create a client.
    Add {
        /// Client name.
        name: String,
    },
    /// Show a client and its projects.
    Show { id: ClientId },
    /// Replace a client's fields.
    Update {
        id: ClientId,
        /// New client name.
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProjectsAction {
    /// List all projects with their clients.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Create a project for a client.
    Add(ProjectArgs),
    /// Show a project and its entries.
    Show { id: ProjectId },
    /// Replace a project's fields.
    Update {
        id: ProjectId,
        #[command(flatten)]
        fields: ProjectArgs,
    },
}

/// Fields submitted for a project.
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    /// Project name.
    pub name: String,
    /// Owning client ID.
    #[arg(long)]
    pub client: String,
}

#[derive(Debug, Subcommand)]
pub enum EntriesAction {
    /// List all entries, newest first.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Only show entries that have not been stopped.
        #[arg(long)]
        open: bool,
    },
    /// Record a time entry.
    Add(EntryArgs),
    /// Show a single entry.
    Show { id: EntryId },
    /// Replace an entry's fields.
    Update {
        id: EntryId,
        #[command(flatten)]
        fields: EntryArgs,
    },
    /// Stop an open entry at the current time.
    Stop { id: EntryId },
}

/// Fields submitted for an entry.
///
/// Times accept ISO 8601, `YYYY-MM-DD HH:MM` (UTC) or relative values such as
/// `2 hours ago`.
#[derive(Debug, Clone, Args)]
pub struct EntryArgs {
    /// When the work started.
    #[arg(long)]
    pub start: String,

    /// When the work ended. Omit to leave the entry open.
    #[arg(long)]
    pub stop: Option<String>,

    /// Set the end time to now.
    #[arg(long, conflicts_with = "stop")]
    pub stop_now: bool,

    /// Project ID the time belongs to.
    #[arg(long)]
    pub project: String,

    /// What was done.
    #[arg(short, long, default_value = "")]
    pub description: String,
}
