//! Error types for meetsurvey.
//!
//! [`Error`] covers everything that can go wrong inside the crate (config,
//! contact store, local database, I/O). [`SurveyFailure`] is the much smaller
//! set of outcomes a survey respondent ever sees; handlers convert the former
//! into the latter at the page boundary.

use std::path::PathBuf;

use axum::http::StatusCode;
use thiserror::Error;

/// The main error type for meetsurvey operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Contact Store Errors ===
    /// No contact matches the given identifier.
    #[error("contact not found: {id}")]
    ContactNotFound {
        /// The identifier that was looked up.
        id: String,
    },

    /// The HTTP request to the contact store failed (connect, timeout, decode).
    #[error("contact store request failed: {0}")]
    StoreRequest(#[from] reqwest::Error),

    /// The contact store answered with a non-success status.
    #[error("contact store returned HTTP {status}: {body}")]
    StoreStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the store.
        body: String,
    },

    /// The configured backend cannot perform the requested operation.
    #[error("the {backend} contact store does not support {operation}")]
    StoreUnsupported {
        /// Name of the backend.
        backend: &'static str,
        /// The operation that was attempted.
        operation: &'static str,
    },

    // === Local Database Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Server Errors ===
    /// The HTTP listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    ServerBind {
        /// Address we tried to listen on.
        addr: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for meetsurvey operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a contact-not-found error.
    #[must_use]
    pub fn contact_not_found(id: impl Into<String>) -> Self {
        Self::ContactNotFound { id: id.into() }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means the contact does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ContactNotFound { .. })
    }
}

/// What a survey respondent can be told went wrong.
///
/// None of these are retried; each one is rendered as a message on the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurveyFailure {
    /// The link carried no `contact_id`.
    #[error("survey link has no contact_id")]
    MissingLinkParameter,

    /// The link's `contact_id` matches no contact.
    #[error("contact not found")]
    ContactNotFound,

    /// Loading the contact failed; the cause is logged, not shown.
    #[error("could not load survey")]
    LoadFailure,

    /// Appending the response failed; the cause is shown as-is.
    #[error("error saving: {message}")]
    SaveFailure {
        /// Underlying error text.
        message: String,
    },
}

impl SurveyFailure {
    /// Classify an identity-fetch error.
    #[must_use]
    pub fn from_load_error(err: &Error) -> Self {
        if err.is_not_found() {
            Self::ContactNotFound
        } else {
            Self::LoadFailure
        }
    }

    /// Wrap any error raised while saving.
    #[must_use]
    pub fn save(err: &Error) -> Self {
        Self::SaveFailure {
            message: err.to_string(),
        }
    }

    /// The headline shown to the respondent.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingLinkParameter => {
                "⚠️ Invalid survey link. Please use the link from your email.".to_string()
            }
            Self::ContactNotFound => {
                "⚠️ Contact not found. The survey link may have expired.".to_string()
            }
            Self::LoadFailure => "⚠️ Could not load survey. Please try again later.".to_string(),
            Self::SaveFailure { message } => format!("❌ Error saving: {message}"),
        }
    }

    /// Whether the page stops after the message (no form is rendered).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::SaveFailure { .. })
    }

    /// HTTP status for the page carrying this failure.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingLinkParameter => StatusCode::BAD_REQUEST,
            Self::ContactNotFound => StatusCode::NOT_FOUND,
            Self::LoadFailure => StatusCode::BAD_GATEWAY,
            Self::SaveFailure { .. } => StatusCode::OK,
        }
    }
}
