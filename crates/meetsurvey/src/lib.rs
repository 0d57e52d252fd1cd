//! `meetsurvey` - Post-meeting surveys that append to CRM contact notes
//!
//! A survey link names a contact. Opening it shows either the attendee
//! feedback form or the host's meeting-notes form; submitting it formats the
//! answers as a plain-text block and appends that block to the contact's
//! notes in the contact store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod contact;
pub mod error;
pub mod logging;
pub mod notes;
pub mod page;
pub mod server;
pub mod store;
pub mod survey;

pub use config::Config;
pub use contact::{Contact, ContactIdentity, ContactStore, NewContact, NotesUpdate};
pub use error::{Error, Result, SurveyFailure};
pub use logging::init_logging;
pub use notes::{append_block, append_to_contact};
pub use server::{build_app, serve, AppState};
pub use store::{open_store, RestContactStore, SqliteContactStore};
pub use survey::{SurveyLink, SurveyVariant};
