//! Contact store backed by a PostgREST-compatible HTTP API.
//!
//! This is the interface Supabase exposes under `/rest/v1`. Rows are
//! addressed with `?id=eq.<id>`; reads ask for only the columns they need.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::contact::{Contact, ContactIdentity, ContactStore, NotesUpdate};
use crate::error::{Error, Result};

const IDENTITY_COLUMNS: &str = "first_name,last_name,company";
const NOTES_COLUMNS: &str = "notes";
const CONTACT_COLUMNS: &str = "first_name,last_name,company,notes,last_contacted";

/// HTTP client for the contacts table.
#[derive(Clone)]
pub struct RestContactStore {
    client: Client,
    base_url: String,
    table: String,
    api_key: String,
}

impl std::fmt::Debug for RestContactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestContactStore")
            .field("base_url", &self.base_url)
            .field("table", &self.table)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct NotesRow {
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContactRow {
    #[serde(flatten)]
    identity: ContactIdentity,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    last_contacted: Option<String>,
}

impl RestContactStore {
    /// Build a client for `base_url` (the project URL, without `/rest/v1`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            table: table.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a client from the `store` section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.store.url.clone(),
            config.store.api_key.clone(),
            config.store.table.clone(),
            config.store_timeout(),
        )
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Turn a non-2xx response into [`Error::StoreStatus`].
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::StoreStatus {
            status: status.as_u16(),
            body,
        })
    }

    /// Select `columns` from the row with this id.
    async fn select_one<T: DeserializeOwned>(&self, id: &str, columns: &str) -> Result<T> {
        debug!(contact_id = id, columns, "selecting contact row");
        let request = self
            .client
            .get(self.table_url())
            .query(&[("id", format!("eq.{id}")), ("select", columns.to_string())]);

        let response = Self::check(self.authorized(request).send().await?).await?;
        let rows: Vec<T> = response.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::contact_not_found(id))
    }
}

#[async_trait]
impl ContactStore for RestContactStore {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn fetch_identity(&self, id: &str) -> Result<ContactIdentity> {
        self.select_one(id, IDENTITY_COLUMNS).await
    }

    async fn fetch_notes(&self, id: &str) -> Result<Option<String>> {
        let row: NotesRow = self.select_one(id, NOTES_COLUMNS).await?;
        Ok(row.notes)
    }

    async fn update_notes(&self, id: &str, update: &NotesUpdate) -> Result<()> {
        debug!(contact_id = id, "updating contact notes");
        let request = self
            .client
            .patch(self.table_url())
            .query(&[("id", format!("eq.{id}")), ("select", "id".to_string())])
            .header("Prefer", "return=representation")
            .json(update);

        // A PATCH matching no row is still 2xx, with an empty array
        let response = Self::check(self.authorized(request).send().await?).await?;
        let rows: Vec<IgnoredAny> = response.json().await?;
        if rows.is_empty() {
            return Err(Error::contact_not_found(id));
        }
        Ok(())
    }

    async fn fetch_contact(&self, id: &str) -> Result<Contact> {
        let row: ContactRow = self.select_one(id, CONTACT_COLUMNS).await?;
        Ok(Contact {
            id: id.to_string(),
            identity: row.identity,
            notes: row.notes,
            last_contacted: row.last_contacted,
        })
    }
}
