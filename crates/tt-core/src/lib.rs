//! Core domain logic for the time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Model: clients, projects and time entries with their display strings
//! - Forms: converting submitted text and validating entry intervals
//! - Date-times: parsing absolute and relative timestamps

pub mod datetime;
pub mod form;
pub mod model;
mod types;

pub use datetime::{DEFAULT_DATETIME_FORMAT, DateTimeParseError, parse_datetime, parse_datetime_at};
pub use form::{
    ClientForm, EntryForm, Field, FormErrors, ProjectForm, stop_entry_at, validate_entry,
    validate_entry_at,
};
pub use model::{
    Client, Entry, EntryDetail, NewClient, NewEntry, NewProject, Project, ProjectDetail,
};
pub use types::{ClientId, EntryId, ProjectId, ValidationError};
