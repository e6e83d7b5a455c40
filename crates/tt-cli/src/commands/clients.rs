//! Clients command for listing, creating and updating clients.

use std::io::Write;

use anyhow::{Result, bail};
use tt_core::{ClientForm, ClientId};
use tt_db::Database;

use super::rejected;

/// Prints every client, or a hint when there are none.
pub fn list<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let clients = db.list_clients()?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&clients)?)?;
        return Ok(());
    }

    if clients.is_empty() {
        writeln!(writer, "No clients yet.")?;
        writeln!(writer)?;
        writeln!(writer, "Hint: Run 'tt clients add <name>' to create one.")?;
        return Ok(());
    }

    writeln!(writer, "{:<5} NAME", "ID")?;
    for client in &clients {
        writeln!(writer, "{:<5} {client}", client.id)?;
    }
    Ok(())
}

pub fn add<W: Write>(writer: &mut W, db: &mut Database, name: &str) -> Result<()> {
    let form = ClientForm {
        name: name.to_string(),
    };
    let new_client = form.clean().map_err(|errors| rejected("client", errors))?;
    let client = db.create_client(&new_client)?;

    tracing::info!(id = %client.id, "client created");
    writeln!(writer, "Created client {}: {client}", client.id)?;
    Ok(())
}

/// Prints a client followed by the projects it owns.
pub fn show<W: Write>(writer: &mut W, db: &Database, id: ClientId) -> Result<()> {
    let Some(client) = db.get_client(id)? else {
        bail!("client not found: {id}");
    };

    let projects: Vec<_> = db
        .list_projects()?
        .into_iter()
        .filter(|detail| detail.client.id == id)
        .collect();

    writeln!(writer, "Client {id}: {client}")?;
    if projects.is_empty() {
        writeln!(writer, "Projects: none")?;
    } else {
        writeln!(writer, "Projects:")?;
        for detail in &projects {
            writeln!(writer, "  {:<5} {}", detail.project.id, detail.project.name)?;
        }
    }
    Ok(())
}

/// Replaces the client's fields with a freshly validated submission.
pub fn update<W: Write>(writer: &mut W, db: &mut Database, id: ClientId, name: &str) -> Result<()> {
    if db.get_client(id)?.is_none() {
        bail!("client not found: {id}");
    }

    let form = ClientForm {
        name: name.to_string(),
    };
    let new_client = form.clean().map_err(|errors| rejected("client", errors))?;
    let client = db.update_client(id, &new_client)?;

    tracing::info!(%id, "client updated");
    writeln!(writer, "Updated client {id}: {client}")?;
    Ok(())
}
