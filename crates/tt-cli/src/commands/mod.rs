//! CLI subcommand implementations.

pub mod clients;
pub mod entries;
pub mod projects;

use tt_core::form::INVALID_CHOICE;
use tt_core::{Field, FormErrors};
use tt_db::DbError;

/// Wraps rejected form data so every error reaches the user.
fn rejected(what: &str, errors: FormErrors) -> anyhow::Error {
    tracing::warn!(%errors, "{what} rejected");
    anyhow::Error::new(errors).context(format!("{what} was not saved"))
}

/// Turns a dangling reference into the same field error a bad choice gets.
fn reference_error(what: &str, field: Field, err: DbError) -> anyhow::Error {
    match err {
        DbError::NotFound { entity, .. } if entity == field.as_str() => {
            let mut errors = FormErrors::default();
            errors.add(field, INVALID_CHOICE);
            rejected(what, errors)
        }
        other => other.into(),
    }
}

/// Formats a duration in milliseconds as `1h 5m` or `5m`.
pub fn format_duration(ms: i64) -> String {
    if ms < 0 {
        return "0m".to_string();
    }
    let total_minutes = ms / 60_000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
