//! Projects command for listing, creating and updating projects.

use std::io::Write;

use anyhow::{Result, bail};
use tt_core::{Field, ProjectForm, ProjectId};
use tt_db::Database;

use super::{reference_error, rejected};
use crate::cli::ProjectArgs;

impl From<&ProjectArgs> for ProjectForm {
    fn from(args: &ProjectArgs) -> Self {
        Self {
            name: args.name.clone(),
            client: args.client.clone(),
        }
    }
}

/// Prints every project with its client.
pub fn list<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let projects = db.list_projects()?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&projects)?)?;
        return Ok(());
    }

    if projects.is_empty() {
        writeln!(writer, "No projects yet.")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "Hint: Run 'tt projects add <name> --client <id>' to create one."
        )?;
        return Ok(());
    }

    writeln!(writer, "{:<5} PROJECT", "ID")?;
    for detail in &projects {
        writeln!(writer, "{:<5} {detail}", detail.project.id)?;
    }
    Ok(())
}

pub fn add<W: Write>(writer: &mut W, db: &mut Database, args: &ProjectArgs) -> Result<()> {
    let new_project = ProjectForm::from(args)
        .clean()
        .map_err(|errors| rejected("project", errors))?;
    let project = db
        .create_project(&new_project)
        .map_err(|err| reference_error("project", Field::Client, err))?;

    tracing::info!(id = %project.id, client_id = %project.client_id, "project created");
    describe(writer, db, "Created", project.id)
}

/// Prints a project followed by its entries.
pub fn show<W: Write>(
    writer: &mut W,
    db: &Database,
    id: ProjectId,
    datetime_format: &str,
) -> Result<()> {
    let Some(detail) = db.get_project(id)? else {
        bail!("project not found: {id}");
    };

    let entries: Vec<_> = db
        .list_entries()?
        .into_iter()
        .filter(|entry| entry.project.id == id)
        .collect();

    writeln!(writer, "Project {id}: {detail}")?;
    if entries.is_empty() {
        writeln!(writer, "Entries: none")?;
    } else {
        writeln!(writer, "Entries:")?;
        for entry in &entries {
            writeln!(
                writer,
                "  {:<5} {}",
                entry.entry.id,
                entry.label(datetime_format)
            )?;
        }
    }
    Ok(())
}

/// Replaces the project's fields with a freshly validated submission.
pub fn update<W: Write>(
    writer: &mut W,
    db: &mut Database,
    id: ProjectId,
    args: &ProjectArgs,
) -> Result<()> {
    if db.get_project(id)?.is_none() {
        bail!("project not found: {id}");
    }

    let new_project = ProjectForm::from(args)
        .clean()
        .map_err(|errors| rejected("project", errors))?;
    db.update_project(id, &new_project)
        .map_err(|err| reference_error("project", Field::Client, err))?;

    tracing::info!(%id, "project updated");
    describe(writer, db, "Updated", id)
}

fn describe<W: Write>(writer: &mut W, db: &Database, verb: &str, id: ProjectId) -> Result<()> {
    let Some(detail) = db.get_project(id)? else {
        bail!("project not found: {id}");
    };
    writeln!(writer, "{verb} project {id}: {detail}")?;
    Ok(())
}
