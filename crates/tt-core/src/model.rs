//! Clients, projects and time entries.
//!
//! A [`Client`] owns projects, a [`Project`] owns entries. Stored records carry
//! their row id; the `New*` types are validated form output that has not been
//! persisted yet.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::datetime::{DEFAULT_DATETIME_FORMAT, format_datetime};
use crate::types::{ClientId, EntryId, ProjectId};

/// A client that projects are billed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A project belonging to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub client_id: ClientId,
}

/// A tracked time interval on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub start: DateTime<Utc>,
    /// `None` while the entry is still running.
    #[serde(default)]
    pub stop: Option<DateTime<Utc>>,
    pub project_id: ProjectId,
    pub description: String,
}

impl Entry {
    /// Whether the entry has no stop time yet.
    pub const fn is_open(&self) -> bool {
        self.stop.is_none()
    }

    /// Length of the interval, or `None` for an open entry.
    pub fn duration(&self) -> Option<Duration> {
        self.stop.map(|stop| stop - self.start)
    }
}

/// Validated client fields ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
}

/// Validated project fields ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub client_id: ClientId,
}

/// Entry fields without an id: a candidate before validation, a record after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub stop: Option<DateTime<Utc>>,
    pub project_id: ProjectId,
    pub description: String,
}

impl NewEntry {
    /// Attaches a row id.
    pub fn with_id(self, id: EntryId) -> Entry {
        Entry {
            id,
            start: self.start,
            stop: self.stop,
            project_id: self.project_id,
            description: self.description,
        }
    }
}

impl From<Entry> for NewEntry {
    fn from(entry: Entry) -> Self {
        Self {
            start: entry.start,
            stop: entry.stop,
            project_id: entry.project_id,
            description: entry.description,
        }
    }
}

/// A project joined with its owning client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetail {
    pub project: Project,
    pub client: Client,
}

/// Renders as `<Client name> Project name`.
impl fmt::Display for ProjectDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {}", self.client.name, self.project.name)
    }
}

/// An entry joined with its owning project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDetail {
    pub entry: Entry,
    pub project: Project,
}

impl EntryDetail {
    /// Renders `[start - stop] (Project name) description` with a custom
    /// timestamp format. An open entry leaves the stop slot empty.
    pub fn label(&self, datetime_format: &str) -> String {
        let start = format_datetime(self.entry.start, datetime_format);
        let stop = self
            .entry
            .stop
            .map(|stop| format_datetime(stop, datetime_format))
            .unwrap_or_default();
        format!(
            "[{start} - {stop}] ({}) {}",
            self.project.name, self.entry.description
        )
    }
}

impl fmt::Display for EntryDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(DEFAULT_DATETIME_FORMAT))
    }
}
