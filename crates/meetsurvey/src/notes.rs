//! Appending survey blocks to a contact's notes.
//!
//! One append is a read-modify-write against the contact store: fetch the
//! current notes, concatenate the new block, write notes and
//! `last_contacted` back in a single update call.
//!
//! # Known limitation: lost updates
//!
//! The read and the write are separate store calls with nothing tying them
//! together. If two submissions for the same contact race, the second writer
//! may read notes that predate the first write and overwrite it, silently
//! dropping one block. Expected traffic per contact link is a handful of
//! submissions, so this is accepted.
//!
//! Resubmitting (including a double-click on submit) appends the same block
//! again. That is intended: submissions accumulate.

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::contact::{ContactStore, NotesUpdate};
use crate::error::Result;

/// Separator placed between existing notes and a new block.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Fold a new block into existing notes.
///
/// Empty or absent notes become exactly `block`. Anything else is kept in
/// full, followed by a blank line and `block`.
#[must_use]
pub fn append_block(existing: Option<&str>, block: &str) -> String {
    match existing {
        Some(notes) if !notes.is_empty() => format!("{notes}{BLOCK_SEPARATOR}{block}"),
        _ => block.to_string(),
    }
}

/// Append `block` to the notes of contact `contact_id`.
///
/// A missing contact short-circuits before any write. Nothing is retried.
///
/// # Errors
///
/// Returns [`crate::Error::ContactNotFound`] if the contact does not exist,
/// or whatever error the store raised during the fetch or the update.
pub async fn append_to_contact(
    store: &dyn ContactStore,
    contact_id: &str,
    block: &str,
    now: DateTime<Local>,
) -> Result<()> {
    let existing = store.fetch_notes(contact_id).await.inspect_err(|e| {
        warn!(contact_id, store = store.name(), "failed to fetch notes: {e}");
    })?;

    let notes = append_block(existing.as_deref(), block);
    debug!(
        contact_id,
        old_len = existing.as_deref().map_or(0, str::len),
        new_len = notes.len(),
        "composed notes"
    );

    let update = NotesUpdate {
        notes,
        last_contacted: now,
    };
    store
        .update_notes(contact_id, &update)
        .await
        .inspect_err(|e| {
            warn!(contact_id, store = store.name(), "failed to write notes: {e}");
        })?;

    info!(contact_id, "appended survey block to contact notes");
    Ok(())
}
