//! Time tracker CLI library.
//!
//! This crate provides the CLI interface for the time tracker: argument
//! definitions, configuration, and the client/project/entry commands.

mod cli;
pub mod commands;
mod config;

pub use cli::{ClientsAction, Cli, Commands, EntriesAction, EntryArgs, ProjectArgs, ProjectsAction};
pub use config::Config;
