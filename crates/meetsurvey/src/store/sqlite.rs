//! Local `SQLite` contact store.
//!
//! Used for development and demos where no hosted CRM is available. Unlike
//! the REST backend, this one owns its contacts, so it can create them.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::contact::{Contact, ContactIdentity, ContactStore, NewContact, NotesUpdate};
use crate::error::{Error, Result};

use super::schema::CONTACTS_SCHEMA;

/// Contact store in a single `SQLite` file.
///
/// All access goes through one connection behind a mutex; queries are short
/// and never held across an await.
#[derive(Debug)]
pub struct SqliteContactStore {
    conn: Mutex<Connection>,
}

impl SqliteContactStore {
    /// Open or create a contact database at the given path.
    ///
    /// Creates parent directories and initializes the schema as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening contact database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        conn.execute_batch(CONTACTS_SCHEMA)?;

        info!("Contact database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch(CONTACTS_SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("contact database lock poisoned"))
    }

    /// Insert a contact with a fresh id and return the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, contact: &NewContact) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.conn()?.execute(
            r"
            INSERT INTO contacts (id, first_name, last_name, company, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                id,
                contact.identity.first_name,
                contact.identity.last_name,
                contact.identity.company,
                contact.notes,
            ],
        )?;
        debug!("Inserted contact {}", id);
        Ok(id)
    }

    /// Get a contact by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: &str) -> Result<Option<Contact>> {
        let contact = self
            .conn()?
            .query_row(
                r"
                SELECT id, first_name, last_name, company, notes, last_contacted
                FROM contacts WHERE id = ?1
                ",
                [id],
                Self::row_to_contact,
            )
            .optional()?;
        Ok(contact)
    }

    #[cfg(test)]
    fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_contact(row: &rusqlite::Row) -> rusqlite::Result<Contact> {
        Ok(Contact {
            id: row.get(0)?,
            identity: ContactIdentity {
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                company: row.get(3)?,
            },
            notes: row.get(4)?,
            last_contacted: row.get(5)?,
        })
    }
}

#[async_trait]
impl ContactStore for SqliteContactStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn fetch_identity(&self, id: &str) -> Result<ContactIdentity> {
        self.get(id)?
            .map(|contact| contact.identity)
            .ok_or_else(|| Error::contact_not_found(id))
    }

    async fn fetch_notes(&self, id: &str) -> Result<Option<String>> {
        let notes: Option<Option<String>> = self
            .conn()?
            .query_row("SELECT notes FROM contacts WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;
        notes.ok_or_else(|| Error::contact_not_found(id))
    }

    async fn update_notes(&self, id: &str, update: &NotesUpdate) -> Result<()> {
        let affected = self.conn()?.execute(
            "UPDATE contacts SET notes = ?1, last_contacted = ?2 WHERE id = ?3",
            params![update.notes, update.last_contacted.to_rfc3339(), id],
        )?;
        if affected == 0 {
            return Err(Error::contact_not_found(id));
        }
        Ok(())
    }

    async fn fetch_contact(&self, id: &str) -> Result<Contact> {
        self.get(id)?.ok_or_else(|| Error::contact_not_found(id))
    }

    async fn create_contact(&self, contact: &NewContact) -> Result<String> {
        self.insert(contact)
    }
}
