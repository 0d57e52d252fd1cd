//! Contact records and the store abstraction.
//!
//! Contacts live in an external CRM store. This crate only reads identity
//! fields and amends the `notes` field; it never deletes contacts, and only
//! the local development backend can create them.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identity fields projected for the page heading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactIdentity {
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Company name.
    #[serde(default)]
    pub company: Option<String>,
}

impl ContactIdentity {
    /// "First Last", trimmed; missing parts are skipped.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    /// The company, if present and non-blank.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// A full contact row, as shown by `meetsurvey contacts show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Opaque identifier.
    pub id: String,
    /// Identity fields.
    #[serde(flatten)]
    pub identity: ContactIdentity,
    /// Accumulated meeting notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// When the contact was last touched, as stored.
    #[serde(default)]
    pub last_contacted: Option<String>,
}

/// The single update written back after composing new notes.
///
/// Both fields go out in one store call so they change together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotesUpdate {
    /// The complete new notes value.
    pub notes: String,
    /// Submission time, serialized as RFC 3339.
    pub last_contacted: DateTime<Local>,
}

/// Fields for a contact created in the local store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContact {
    /// Identity fields.
    pub identity: ContactIdentity,
    /// Initial notes, if any.
    pub notes: Option<String>,
}

/// Trait for contact store backends.
///
/// A store instance is built once at startup and handed to whoever needs
/// it; there is no process-wide client.
#[async_trait::async_trait]
pub trait ContactStore: Send + Sync + std::fmt::Debug {
    /// Backend name, for logs and error messages.
    fn name(&self) -> &'static str;

    /// Fetch `first_name, last_name, company` for a contact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContactNotFound`] if no contact has this id, or a
    /// transport/database error.
    async fn fetch_identity(&self, id: &str) -> Result<ContactIdentity>;

    /// Fetch the current `notes` value. `None` means the field is null.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContactNotFound`] if no contact has this id, or a
    /// transport/database error.
    async fn fetch_notes(&self, id: &str) -> Result<Option<String>>;

    /// Set `notes` and `last_contacted` in a single update keyed by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContactNotFound`] if the update matched no contact,
    /// or an error if the update call fails.
    async fn update_notes(&self, id: &str, update: &NotesUpdate) -> Result<()>;

    /// Fetch the whole contact row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContactNotFound`] if no contact has this id, or a
    /// transport/database error.
    async fn fetch_contact(&self, id: &str) -> Result<Contact>;

    /// Create a contact and return its id.
    ///
    /// # Errors
    ///
    /// Backends that don't own their contacts return
    /// [`Error::StoreUnsupported`].
    async fn create_contact(&self, _contact: &NewContact) -> Result<String> {
        Err(Error::StoreUnsupported {
            backend: self.name(),
            operation: "creating contacts",
        })
    }
}
