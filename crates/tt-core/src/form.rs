//! Form validation for submitted client, project and entry data.
//!
//! Forms take raw text the way a user submits it, convert each field, then run
//! the record rules. Every problem is collected into [`FormErrors`] instead of
//! stopping at the first one, so a resubmission can fix everything at once.
//!
//! The entry rules themselves live in [`validate_entry_at`], which works on
//! already-typed values and never touches the clock unless asked to.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::datetime::parse_datetime_at;
use crate::model::{NewClient, NewEntry, NewProject};
use crate::types::{ClientId, ProjectId};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_DATETIME: &str = "Enter a valid date/time.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const START_NOT_IN_PAST: &str = "Start time must be in the past";
pub const STOP_BEFORE_START: &str = "End time must come after start time";

/// A form field that can carry errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Client,
    Start,
    Stop,
    Project,
    Description,
}

impl Field {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Client => "client",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Project => "project",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level and record-wide validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    fields: BTreeMap<Field, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    /// Records an error against a single field.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    /// Records an error against the record as a whole.
    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    /// Errors recorded for `field`, empty if none.
    pub fn field(&self, field: Field) -> &[String] {
        self.fields.get(&field).map_or(&[][..], Vec::as_slice)
    }

    /// Record-wide errors.
    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    /// Returns `value` if nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for message in &self.non_field {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "{message}")?;
        }
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    writeln!(f)?;
                }
                first = false;
                write!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// Submitted client data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientForm {
    pub name: String,
}

impl ClientForm {
    pub fn clean(&self) -> Result<NewClient, FormErrors> {
        let mut errors = FormErrors::default();
        let name = required_text(&self.name, Field::Name, &mut errors);
        errors.into_result(NewClient { name })
    }
}

/// Submitted project data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub client: String,
}

impl ProjectForm {
    pub fn clean(&self) -> Result<NewProject, FormErrors> {
        let mut errors = FormErrors::default();
        let name = required_text(&self.name, Field::Name, &mut errors);
        let client_id = choice::<ClientId>(&self.client, Field::Client, &mut errors);

        match client_id {
            Some(client_id) if errors.is_empty() => Ok(NewProject { name, client_id }),
            _ => Err(errors),
        }
    }
}

/// Submitted entry data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub start: String,
    /// Empty means the entry stays open.
    pub stop: String,
    pub project: String,
    pub description: String,
    /// Stop the entry at validation time instead of using `stop`.
    pub stop_now: bool,
}

impl EntryForm {
    /// Cleans the form against the current wall clock.
    pub fn clean(&self) -> Result<NewEntry, FormErrors> {
        self.clean_at(Utc::now())
    }

    /// Converts every field and applies the entry rules with `now` as the
    /// reference time.
    pub fn clean_at(&self, now: DateTime<Utc>) -> Result<NewEntry, FormErrors> {
        let mut errors = FormErrors::default();

        let start = if self.start.trim().is_empty() {
            errors.add(Field::Start, REQUIRED);
            None
        } else {
            datetime(&self.start, Field::Start, now, &mut errors)
        };

        let stop = if self.stop_now {
            Some(now)
        } else if self.stop.trim().is_empty() {
            None
        } else {
            datetime(&self.stop, Field::Stop, now, &mut errors)
        };

        let project_id = choice::<ProjectId>(&self.project, Field::Project, &mut errors);
        let description = self.description.trim().to_string();

        check_interval(start, stop, now, &mut errors);

        match (start, project_id) {
            (Some(start), Some(project_id)) if errors.is_empty() => Ok(NewEntry {
                start,
                stop,
                project_id,
                description,
            }),
            _ => {
                tracing::debug!(%errors, "entry form rejected");
                Err(errors)
            }
        }
    }
}

/// Validates a typed entry candidate against the wall clock.
pub fn validate_entry(candidate: NewEntry) -> Result<NewEntry, FormErrors> {
    validate_entry_at(candidate, Utc::now())
}

/// Validates a typed entry candidate.
///
/// - `start` must be strictly before `now` (error on `start`).
/// - a present `stop` must not precede `start` (record-wide error).
pub fn validate_entry_at(candidate: NewEntry, now: DateTime<Utc>) -> Result<NewEntry, FormErrors> {
    let mut errors = FormErrors::default();
    check_interval(Some(candidate.start), candidate.stop, now, &mut errors);
    errors.into_result(candidate)
}

/// Sets `stop` to `now` and validates the result.
///
/// Used to close an open entry.
pub fn stop_entry_at(candidate: NewEntry, now: DateTime<Utc>) -> Result<NewEntry, FormErrors> {
    validate_entry_at(
        NewEntry {
            stop: Some(now),
            ..candidate
        },
        now,
    )
}

fn check_interval(
    start: Option<DateTime<Utc>>,
    stop: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    errors: &mut FormErrors,
) {
    if start.is_some_and(|start| start >= now) {
        errors.add(Field::Start, START_NOT_IN_PAST);
    }

    if let (Some(start), Some(stop)) = (start, stop) {
        if stop < start {
            errors.add_non_field(STOP_BEFORE_START);
        }
    }
}

fn required_text(value: &str, field: Field, errors: &mut FormErrors) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    }
    value.to_string()
}

fn datetime(
    value: &str,
    field: Field,
    now: DateTime<Utc>,
    errors: &mut FormErrors,
) -> Option<DateTime<Utc>> {
    parse_datetime_at(value, now)
        .inspect_err(|_| errors.add(field, INVALID_DATETIME))
        .ok()
}

fn choice<T: std::str::FromStr>(value: &str, field: Field, errors: &mut FormErrors) -> Option<T> {
    if value.trim().is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    value
        .parse::<T>()
        .inspect_err(|_| errors.add(field, INVALID_CHOICE))
        .ok()
}
