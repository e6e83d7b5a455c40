//! Storage layer for the time tracker.
//!
//! Provides persistence for clients, projects and time entries using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared across
//! threads without external synchronization. The CLI opens one per invocation.
//!
//! # Schema
//!
//! Row ids are `INTEGER PRIMARY KEY AUTOINCREMENT`, so ids are never reused.
//! Foreign keys are enforced (`PRAGMA foreign_keys = ON`); in addition every
//! write that references another row checks that the row exists inside the same
//! transaction so callers get a [`DbError::NotFound`] instead of a bare
//! constraint failure.
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 format with millisecond precision
//! (e.g., `2024-01-15T10:30:00.000Z`). This ensures:
//! - Lexicographic ordering matches chronological ordering
//! - Human-readable values in the database
//! - Timezone-aware (always UTC)

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use tt_core::{
    Client, ClientId, Entry, EntryDetail, EntryId, NewClient, NewEntry, NewProject, Project,
    ProjectDetail, ProjectId, ValidationError,
};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A referenced or updated row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },
    /// A stored row id is not a valid identifier.
    #[error("invalid stored id: {0}")]
    InvalidId(#[from] ValidationError),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for entry {entry_id}: {timestamp}")]
    TimestampParse {
        entry_id: i64,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                client_id INTEGER NOT NULL,
                FOREIGN KEY (client_id) REFERENCES clients(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_projects_client ON projects(client_id);

            -- Entries table: recorded time intervals
            -- start/stop: ISO 8601 format (e.g., '2024-01-15T10:30:00.000Z')
            -- stop is NULL while the entry is open
            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                start TEXT NOT NULL,
                stop TEXT,
                project_id INTEGER NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_entries_project ON entries(project_id);
            CREATE INDEX IF NOT EXISTS idx_entries_start ON entries(start);
            ",
        )?;
        Ok(())
    }

    // ========== Clients ==========

    /// Inserts a client and returns it with its assigned id.
    pub fn create_client(&mut self, client: &NewClient) -> Result<Client, DbError> {
        self.conn
            .execute("INSERT INTO clients (name) VALUES (?)", params![client.name])?;
        let id = ClientId::new(self.conn.last_insert_rowid())?;
        tracing::debug!(%id, name = %client.name, "created client");
        Ok(Client {
            id,
            name: client.name.clone(),
        })
    }

    /// Lists clients ordered by name then id.
    pub fn list_clients(&self) -> Result<Vec<Client>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM clients ORDER BY name ASC, id ASC")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
        let mut clients = Vec::new();
        for row in rows {
            let (id, name) = row?;
            clients.push(Client {
                id: ClientId::new(id)?,
                name,
            });
        }
        Ok(clients)
    }

    /// Fetches a client by id.
    pub fn get_client(&self, id: ClientId) -> Result<Option<Client>, DbError> {
        let name: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM clients WHERE id = ?",
                params![id.get()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name.map(|name| Client { id, name }))
    }

    /// Replaces every field of an existing client.
    pub fn update_client(&mut self, id: ClientId, client: &NewClient) -> Result<Client, DbError> {
        let updated = self.conn.execute(
            "UPDATE clients SET name = ? WHERE id = ?",
            params![client.name, id.get()],
        )?;
        if updated == 0 {
            return Err(not_found("client", id.get()));
        }
        tracing::debug!(%id, name = %client.name, "updated client");
        Ok(Client {
            id,
            name: client.name.clone(),
        })
    }

    // ========== Projects ==========

    /// Inserts a project for an existing client.
    pub fn create_project(&mut self, project: &NewProject) -> Result<Project, DbError> {
        let tx = self.conn.transaction()?;
        ensure_exists(&tx, "clients", "client", project.client_id.get())?;
        tx.execute(
            "INSERT INTO projects (name, client_id) VALUES (?, ?)",
            params![project.name, project.client_id.get()],
        )?;
        let id = ProjectId::new(tx.last_insert_rowid())?;
        tx.commit()?;
        tracing::debug!(%id, client_id = %project.client_id, "created project");
        Ok(Project {
            id,
            name: project.name.clone(),
            client_id: project.client_id,
        })
    }

    /// Lists projects with their clients, ordered by client name, project name, id.
    pub fn list_projects(&self) -> Result<Vec<ProjectDetail>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT p.id, p.name, p.client_id, c.name
            FROM projects p
            JOIN clients c ON c.id = p.client_id
            ORDER BY c.name ASC, p.name ASC, p.id ASC
            ",
        )?;
        let rows = stmt.query_map([], ProjectRow::from_row)?;
        let mut projects = Vec::new();
        for row in rows {
            projects.push(row?.into_detail()?);
        }
        Ok(projects)
    }

    /// Fetches a project and its client by project id.
    pub fn get_project(&self, id: ProjectId) -> Result<Option<ProjectDetail>, DbError> {
        let row = self
            .conn
            .query_row(
                "
                SELECT p.id, p.name, p.client_id, c.name
                FROM projects p
                JOIN clients c ON c.id = p.client_id
                WHERE p.id = ?
                ",
                params![id.get()],
                ProjectRow::from_row,
            )
            .optional()?;
        row.map(ProjectRow::into_detail).transpose()
    }

    /// Replaces every field of an existing project.
    pub fn update_project(
        &mut self,
        id: ProjectId,
        project: &NewProject,
    ) -> Result<Project, DbError> {
        let tx = self.conn.transaction()?;
        ensure_exists(&tx, "clients", "client", project.client_id.get())?;
        let updated = tx.execute(
            "UPDATE projects SET name = ?, client_id = ? WHERE id = ?",
            params![project.name, project.client_id.get(), id.get()],
        )?;
        if updated == 0 {
            return Err(not_found("project", id.get()));
        }
        tx.commit()?;
        tracing::debug!(%id, client_id = %project.client_id, "updated project");
        Ok(Project {
            id,
            name: project.name.clone(),
            client_id: project.client_id,
        })
    }

    // ========== Entries ==========

    /// Inserts an entry for an existing project.
    ///
    /// The entry is expected to have been validated already.
    pub fn create_entry(&mut self, entry: &NewEntry) -> Result<Entry, DbError> {
        let tx = self.conn.transaction()?;
        ensure_exists(&tx, "projects", "project", entry.project_id.get())?;
        tx.execute(
            "INSERT INTO entries (start, stop, project_id, description) VALUES (?, ?, ?, ?)",
            params![
                format_timestamp(entry.start),
                entry.stop.map(format_timestamp),
                entry.project_id.get(),
                entry.description,
            ],
        )?;
        let id = EntryId::new(tx.last_insert_rowid())?;
        tx.commit()?;
        tracing::debug!(%id, project_id = %entry.project_id, open = entry.stop.is_none(), "created entry");
        Ok(entry.clone().with_id(id))
    }

    /// Lists entries with their projects, newest start first.
    pub fn list_entries(&self) -> Result<Vec<EntryDetail>, DbError> {
        self.query_entries(
            "
            SELECT e.id, e.start, e.stop, e.project_id, e.description, p.name, p.client_id
            FROM entries e
            JOIN projects p ON p.id = e.project_id
            ORDER BY e.start DESC, e.id DESC
            ",
        )
    }

    /// Lists entries that have no stop time yet, newest start first.
    pub fn open_entries(&self) -> Result<Vec<EntryDetail>, DbError> {
        self.query_entries(
            "
            SELECT e.id, e.start, e.stop, e.project_id, e.description, p.name, p.client_id
            FROM entries e
            JOIN projects p ON p.id = e.project_id
            WHERE e.stop IS NULL
            ORDER BY e.start DESC, e.id DESC
            ",
        )
    }

    /// Fetches an entry and its project by entry id.
    pub fn get_entry(&self, id: EntryId) -> Result<Option<EntryDetail>, DbError> {
        let row = self
            .conn
            .query_row(
                "
                SELECT e.id, e.start, e.stop, e.project_id, e.description, p.name, p.client_id
                FROM entries e
                JOIN projects p ON p.id = e.project_id
                WHERE e.id = ?
                ",
                params![id.get()],
                EntryRow::from_row,
            )
            .optional()?;
        row.map(EntryRow::into_detail).transpose()
    }

    /// Replaces every field of an existing entry.
    pub fn update_entry(&mut self, id: EntryId, entry: &NewEntry) -> Result<Entry, DbError> {
        let tx = self.conn.transaction()?;
        ensure_exists(&tx, "projects", "project", entry.project_id.get())?;
        let updated = tx.execute(
            "
            UPDATE entries
            SET start = ?, stop = ?, project_id = ?, description = ?
            WHERE id = ?
            ",
            params![
                format_timestamp(entry.start),
                entry.stop.map(format_timestamp),
                entry.project_id.get(),
                entry.description,
                id.get(),
            ],
        )?;
        if updated == 0 {
            return Err(not_found("entry", id.get()));
        }
        tx.commit()?;
        tracing::debug!(%id, project_id = %entry.project_id, open = entry.stop.is_none(), "updated entry");
        Ok(entry.clone().with_id(id))
    }

    fn query_entries(&self, sql: &str) -> Result<Vec<EntryDetail>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], EntryRow::from_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.into_detail()?);
        }
        Ok(entries)
    }
}

#[derive(Debug)]
struct ProjectRow {
    id: i64,
    name: String,
    client_id: i64,
    client_name: String,
}

impl ProjectRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            client_id: row.get(2)?,
            client_name: row.get(3)?,
        })
    }

    fn into_detail(self) -> Result<ProjectDetail, DbError> {
        let client_id = ClientId::new(self.client_id)?;
        Ok(ProjectDetail {
            project: Project {
                id: ProjectId::new(self.id)?,
                name: self.name,
                client_id,
            },
            client: Client {
                id: client_id,
                name: self.client_name,
            },
        })
    }
}

#[derive(Debug)]
struct EntryRow {
    id: i64,
    start: String,
    stop: Option<String>,
    project_id: i64,
    description: String,
    project_name: String,
    client_id: i64,
}

impl EntryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            start: row.get(1)?,
            stop: row.get(2)?,
            project_id: row.get(3)?,
            description: row.get(4)?,
            project_name: row.get(5)?,
            client_id: row.get(6)?,
        })
    }

    fn into_detail(self) -> Result<EntryDetail, DbError> {
        let project_id = ProjectId::new(self.project_id)?;
        let start = parse_timestamp(&self.start, self.id)?;
        let stop = self
            .stop
            .as_deref()
            .map(|stop| parse_timestamp(stop, self.id))
            .transpose()?;
        Ok(EntryDetail {
            entry: Entry {
                id: EntryId::new(self.id)?,
                start,
                stop,
                project_id,
                description: self.description,
            },
            project: Project {
                id: project_id,
                name: self.project_name,
                client_id: ClientId::new(self.client_id)?,
            },
        })
    }
}

/// Fails with [`DbError::NotFound`] unless `table` has a row with `id`.
fn ensure_exists(
    conn: &Connection,
    table: &'static str,
    entity: &'static str,
    id: i64,
) -> Result<(), DbError> {
    let exists: bool = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?)"),
        params![id],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(not_found(entity, id))
    }
}

const fn not_found(entity: &'static str, id: i64) -> DbError {
    DbError::NotFound { entity, id }
}

fn parse_timestamp(timestamp: &str, entry_id: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            entry_id,
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use chrono::TimeZone;

    fn ts(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, minute, 0).unwrap()
    }

    fn seed_project(db: &mut Database) -> (Client, Project) {
        let client = db
            .create_client(&NewClient {
                name: "Monolith Co.".to_string(),
            })
            .unwrap();
        let project = db
            .create_project(&NewProject {
                name: "Disruptive App".to_string(),
                client_id: client.id,
            })
            .unwrap();
        (client, project)
    }

    fn new_entry(project_id: ProjectId, start: DateTime<Utc>, stop: Option<DateTime<Utc>>) -> NewEntry {
        NewEntry {
            start,
            stop,
            project_id,
            description: "changed line endings".to_string(),
        }
    }

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().expect("open in-memory db");

        assert_eq!(table_columns(&db.conn, "clients"), vec!["id", "name"]);
        assert_eq!(
            table_columns(&db.conn, "projects"),
            vec!["id", "name", "client_id"]
        );
        assert_eq!(
            table_columns(&db.conn, "entries"),
            vec!["id", "start", "stop", "project_id", "description"]
        );

        let entry_indexes = index_names(&db.conn, "entries");
        let expected: HashSet<String> = ["idx_entries_project", "idx_entries_start"]
            .into_iter()
            .map(String::from)
            .collect();
        assert!(expected.is_subset(&entry_indexes));
        assert!(index_names(&db.conn, "projects").contains("idx_projects_client"));

        assert_eq!(
            foreign_keys(&db.conn, "projects"),
            vec![(
                "clients".to_string(),
                "client_id".to_string(),
                "id".to_string(),
                "CASCADE".to_string(),
            )]
        );
        assert_eq!(
            foreign_keys(&db.conn, "entries"),
            vec![(
                "projects".to_string(),
                "project_id".to_string(),
                "id".to_string(),
                "CASCADE".to_string(),
            )]
        );
    }

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .expect("prepare table_info");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query table_info");
        rows.map(|row| row.expect("table_info row")).collect()
    }

    fn index_names(conn: &Connection, table: &str) -> HashSet<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA index_list({table})"))
            .expect("prepare index_list");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query index_list");
        rows.map(|row| row.expect("index_list row")).collect()
    }

    fn foreign_keys(conn: &Connection, table: &str) -> Vec<(String, String, String, String)> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA foreign_key_list({table})"))
            .expect("prepare foreign_key_list");
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(6)?,
                ))
            })
            .expect("query foreign_key_list");
        rows.map(|row| row.expect("foreign_key_list row")).collect()
    }

    #[test]
    fn open_is_idempotent_on_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("tt.db");
        {
            let mut db = Database::open(&path).unwrap();
            seed_project(&mut db);
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.list_clients().unwrap().len(), 1);
        assert_eq!(db.list_projects().unwrap().len(), 1);
    }

    #[test]
    fn create_and_get_client() {
        let mut db = Database::open_in_memory().unwrap();
        let client = db
            .create_client(&NewClient {
                name: "Monolith Co.".to_string(),
            })
            .unwrap();
        assert_eq!(client.id.get(), 1);
        assert_eq!(db.get_client(client.id).unwrap(), Some(client));
        assert_eq!(db.get_client(ClientId::new(99).unwrap()).unwrap(), None);
    }

    #[test]
    fn list_clients_orders_by_name() {
        let mut db = Database::open_in_memory().unwrap();
        for name in ["Zeta", "Acme", "Monolith Co."] {
            db.create_client(&NewClient {
                name: name.to_string(),
            })
            .unwrap();
        }
        let names: Vec<String> = db
            .list_clients()
            .unwrap()
            .into_iter()
            .map(|client| client.name)
            .collect();
        assert_eq!(names, vec!["Acme", "Monolith Co.", "Zeta"]);
    }

    #[test]
    fn update_client_replaces_name() {
        let mut db = Database::open_in_memory().unwrap();
        let (client, _) = seed_project(&mut db);
        let updated = db
            .update_client(
                client.id,
                &NewClient {
                    name: "Monolith Inc.".to_string(),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Monolith Inc.");
        assert_eq!(db.get_client(client.id).unwrap().unwrap().name, "Monolith Inc.");

        let projects = db.list_projects().unwrap();
        assert_eq!(projects[0].to_string(), "<Monolith Inc.> Disruptive App");
    }

    #[test]
    fn update_missing_client_is_not_found() {
        let mut db = Database::open_in_memory().unwrap();
        let err = db
            .update_client(
                ClientId::new(5).unwrap(),
                &NewClient {
                    name: "Ghost".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound {
                entity: "client",
                id: 5
            }
        ));
    }

    #[test]
    fn create_project_requires_existing_client() {
        let mut db = Database::open_in_memory().unwrap();
        let err = db
            .create_project(&NewProject {
                name: "Orphan".to_string(),
                client_id: ClientId::new(7).unwrap(),
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "client not found: 7");
        assert!(db.list_projects().unwrap().is_empty());
    }

    #[test]
    fn get_project_joins_client() {
        let mut db = Database::open_in_memory().unwrap();
        let (client, project) = seed_project(&mut db);
        let detail = db.get_project(project.id).unwrap().unwrap();
        assert_eq!(detail.project, project);
        assert_eq!(detail.client, client);
        assert_eq!(db.get_project(ProjectId::new(42).unwrap()).unwrap(), None);
    }

    #[test]
    fn update_project_can_move_to_another_client() {
        let mut db = Database::open_in_memory().unwrap();
        let (_, project) = seed_project(&mut db);
        let other = db
            .create_client(&NewClient {
                name: "Acme".to_string(),
            })
            .unwrap();

        db.update_project(
            project.id,
            &NewProject {
                name: "Rocket Skates".to_string(),
                client_id: other.id,
            },
        )
        .unwrap();

        let detail = db.get_project(project.id).unwrap().unwrap();
        assert_eq!(detail.to_string(), "<Acme> Rocket Skates");
    }

    #[test]
    fn update_project_rejects_unknown_client_and_keeps_row() {
        let mut db = Database::open_in_memory().unwrap();
        let (_, project) = seed_project(&mut db);
        let err = db
            .update_project(
                project.id,
                &NewProject {
                    name: "Renamed".to_string(),
                    client_id: ClientId::new(99).unwrap(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "client", .. }));
        assert_eq!(
            db.get_project(project.id).unwrap().unwrap().project.name,
            "Disruptive App"
        );
    }

    #[test]
    fn create_entry_round_trips_timestamps() {
        let mut db = Database::open_in_memory().unwrap();
        let (_, project) = seed_project(&mut db);
        let start = ts(9, 0) + chrono::Duration::milliseconds(250);
        let entry = db
            .create_entry(&new_entry(project.id, start, Some(ts(10, 30))))
            .unwrap();

        let stored = db.get_entry(entry.id).unwrap().unwrap();
        assert_eq!(stored.entry, entry);
        assert_eq!(stored.project, project);

        let raw: String = db
            .conn
            .query_row("SELECT start FROM entries WHERE id = ?", [entry.id.get()], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(raw, "2025-01-01T09:00:00.250Z");
    }

    #[test]
    fn extreme_years_round_trip_and_sort() {
        let mut db = Database::open_in_memory().unwrap();
        let (_, project) = seed_project(&mut db);
        let earliest = Utc.with_ymd_and_hms(0, 1, 1, 0, 0, 0).unwrap();
        let latest = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        let early = db
            .create_entry(&new_entry(project.id, earliest, Some(ts(9, 0))))
            .unwrap();
        let late = db
            .create_entry(&new_entry(project.id, ts(9, 0), Some(latest)))
            .unwrap();

        assert_eq!(db.get_entry(early.id).unwrap().unwrap().entry, early);
        assert_eq!(db.get_entry(late.id).unwrap().unwrap().entry, late);

        let ids: Vec<_> = db
            .list_entries()
            .unwrap()
            .into_iter()
            .map(|detail| detail.entry.id)
            .collect();
        assert_eq!(ids, [late.id, early.id]);
    }

    #[test]
    fn create_entry_requires_existing_project() {
        let mut db = Database::open_in_memory().unwrap();
        let err = db
            .create_entry(&new_entry(ProjectId::new(3).unwrap(), ts(9, 0), None))
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound {
                entity: "project",
                id: 3
            }
        ));
    }

    #[test]
    fn list_entries_newest_first_and_open_entries() {
        let mut db = Database::open_in_memory().unwrap();
        let (_, project) = seed_project(&mut db);
        db.create_entry(&new_entry(project.id, ts(8, 0), Some(ts(9, 0))))
            .unwrap();
        let open = db.create_entry(&new_entry(project.id, ts(11, 0), None)).unwrap();
        db.create_entry(&new_entry(project.id, ts(9, 30), Some(ts(10, 0))))
            .unwrap();

        let starts: Vec<DateTime<Utc>> = db
            .list_entries()
            .unwrap()
            .into_iter()
            .map(|detail| detail.entry.start)
            .collect();
        assert_eq!(starts, vec![ts(11, 0), ts(9, 30), ts(8, 0)]);

        let open_entries = db.open_entries().unwrap();
        assert_eq!(open_entries.len(), 1);
        assert_eq!(open_entries[0].entry.id, open.id);
        assert_eq!(
            open_entries[0].to_string(),
            "[2025-01-01 11:00 - ] (Disruptive App) changed line endings"
        );
    }

    #[test]
    fn update_entry_replaces_all_fields() {
        let mut db = Database::open_in_memory().unwrap();
        let (client, project) = seed_project(&mut db);
        let other = db
            .create_project(&NewProject {
                name: "Website".to_string(),
                client_id: client.id,
            })
            .unwrap();
        let entry = db
            .create_entry(&new_entry(project.id, ts(9, 0), Some(ts(10, 0))))
            .unwrap();

        let replacement = NewEntry {
            start: ts(13, 0),
            stop: None,
            project_id: other.id,
            description: "reopened".to_string(),
        };
        db.update_entry(entry.id, &replacement).unwrap();

        let stored = db.get_entry(entry.id).unwrap().unwrap();
        assert_eq!(NewEntry::from(stored.entry), replacement);
        assert_eq!(stored.project.name, "Website");
    }

    #[test]
    fn update_missing_entry_is_not_found() {
        let mut db = Database::open_in_memory().unwrap();
        let (_, project) = seed_project(&mut db);
        let err = db
            .update_entry(
                EntryId::new(12).unwrap(),
                &new_entry(project.id, ts(9, 0), None),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "entry not found: 12");
    }

    #[test]
    fn corrupt_timestamp_is_reported() {
        let mut db = Database::open_in_memory().unwrap();
        let (_, project) = seed_project(&mut db);
        db.conn
            .execute(
                "INSERT INTO entries (start, stop, project_id, description) VALUES ('yesterday', NULL, ?, '')",
                [project.id.get()],
            )
            .unwrap();

        let err = db.list_entries().unwrap_err();
        assert!(matches!(
            err,
            DbError::TimestampParse { entry_id: 1, ref timestamp, .. } if timestamp == "yesterday"
        ));
    }

    #[test]
    fn foreign_keys_are_enforced_by_sqlite() {
        let db = Database::open_in_memory().unwrap();
        let result = db.conn.execute(
            "INSERT INTO projects (name, client_id) VALUES ('Orphan', 1)",
            [],
        );
        assert!(result.is_err());
    }
}
