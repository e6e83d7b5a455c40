//! Entries command for recording, updating and stopping time entries.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use tt_core::{EntryDetail, EntryForm, EntryId, Field, NewEntry, stop_entry_at};
use tt_db::Database;

use super::{format_duration, reference_error, rejected};
use crate::cli::EntryArgs;

impl From<&EntryArgs> for EntryForm {
    fn from(args: &EntryArgs) -> Self {
        Self {
            start: args.start.clone(),
            stop: args.stop.clone().unwrap_or_default(),
            project: args.project.clone(),
            description: args.description.clone(),
            stop_now: args.stop_now,
        }
    }
}

/// Prints entries newest first, optionally only the open ones.
pub fn list<W: Write>(
    writer: &mut W,
    db: &Database,
    datetime_format: &str,
    json: bool,
    open_only: bool,
) -> Result<()> {
    let entries = if open_only {
        db.open_entries()?
    } else {
        db.list_entries()?
    };

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(writer, "No entries yet.")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "Hint: Run 'tt entries add --start <time> --project <id>' to record one."
        )?;
        return Ok(());
    }

    writeln!(writer, "{:<5} {:<8} ENTRY", "ID", "DURATION")?;
    for detail in &entries {
        writeln!(
            writer,
            "{:<5} {:<8} {}",
            detail.entry.id,
            duration_label(detail),
            detail.label(datetime_format)
        )?;
    }
    Ok(())
}

pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &EntryArgs,
    datetime_format: &str,
) -> Result<()> {
    add_at(writer, db, args, datetime_format, Utc::now())
}

/// Validates the submission against `now` and stores it.
pub fn add_at<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &EntryArgs,
    datetime_format: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    let new_entry = EntryForm::from(args)
        .clean_at(now)
        .map_err(|errors| rejected("entry", errors))?;
    let entry = db
        .create_entry(&new_entry)
        .map_err(|err| reference_error("entry", Field::Project, err))?;

    tracing::info!(id = %entry.id, project_id = %entry.project_id, open = entry.is_open(), "entry created");
    describe(writer, db, "Created", entry.id, datetime_format)
}

/// Prints one entry with its duration.
pub fn show<W: Write>(
    writer: &mut W,
    db: &Database,
    id: EntryId,
    datetime_format: &str,
) -> Result<()> {
    let detail = fetch(db, id)?;
    writeln!(writer, "Entry {id}: {}", detail.label(datetime_format))?;
    writeln!(writer, "Duration: {}", duration_label(&detail))?;
    Ok(())
}

pub fn update<W: Write>(
    writer: &mut W,
    db: &mut Database,
    id: EntryId,
    args: &EntryArgs,
    datetime_format: &str,
) -> Result<()> {
    update_at(writer, db, id, args, datetime_format, Utc::now())
}

/// Replaces every field of the entry with a submission validated against `now`.
pub fn update_at<W: Write>(
    writer: &mut W,
    db: &mut Database,
    id: EntryId,
    args: &EntryArgs,
    datetime_format: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    fetch(db, id)?;

    let new_entry = EntryForm::from(args)
        .clean_at(now)
        .map_err(|errors| rejected("entry", errors))?;
    db.update_entry(id, &new_entry)
        .map_err(|err| reference_error("entry", Field::Project, err))?;

    tracing::info!(%id, "entry updated");
    describe(writer, db, "Updated", id, datetime_format)
}

pub fn stop<W: Write>(
    writer: &mut W,
    db: &mut Database,
    id: EntryId,
    datetime_format: &str,
) -> Result<()> {
    stop_at(writer, db, id, datetime_format, Utc::now())
}

/// Closes an open entry at `now`, resubmitting the whole record.
pub fn stop_at<W: Write>(
    writer: &mut W,
    db: &mut Database,
    id: EntryId,
    datetime_format: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    let detail = fetch(db, id)?;
    if !detail.entry.is_open() {
        bail!("entry {id} is already stopped");
    }

    let stopped = stop_entry_at(NewEntry::from(detail.entry), now)
        .map_err(|errors| rejected("entry", errors))?;
    db.update_entry(id, &stopped)?;

    tracing::info!(%id, "entry stopped");
    describe(writer, db, "Stopped", id, datetime_format)
}

fn fetch(db: &Database, id: EntryId) -> Result<EntryDetail> {
    match db.get_entry(id)? {
        Some(detail) => Ok(detail),
        None => bail!("entry not found: {id}"),
    }
}

fn describe<W: Write>(
    writer: &mut W,
    db: &Database,
    verb: &str,
    id: EntryId,
    datetime_format: &str,
) -> Result<()> {
    let detail = fetch(db, id)?;
    writeln!(writer, "{verb} entry {id}: {}", detail.label(datetime_format))?;
    Ok(())
}

fn duration_label(detail: &EntryDetail) -> String {
    detail
        .entry
        .duration()
        .map_or_else(|| "open".to_string(), |d| format_duration(d.num_milliseconds()))
}
