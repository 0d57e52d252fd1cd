//! `SQLite` schema for the local contact store.
//!
//! The columns mirror the hosted CRM's `contacts` table closely enough that
//! the same survey flow works against either.

/// Creates the contacts table and its recency index if missing.
pub const CONTACTS_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS contacts (
    id TEXT PRIMARY KEY,
    first_name TEXT,
    last_name TEXT,
    company TEXT,
    notes TEXT,
    last_contacted TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_contacts_last_contacted ON contacts(last_contacted DESC);
";
