//! Survey variants and link parameters.
//!
//! A survey link carries `contact_id`, `type` and `date` as query
//! parameters. [`LinkQuery`] is the raw form; [`SurveyLink`] is what the rest
//! of the crate works with once the contact id is known to be present.

pub mod compose;
pub mod form;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, SurveyFailure};

pub use compose::{compose_block, BlockContext};
pub use form::{
    fields, AttendeeResponse, FieldKind, FieldSpec, FieldValue, FormData, HostResponse,
    SurveyResponse,
};

/// Which of the two forms to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyVariant {
    /// Feedback from the person who attended the meeting.
    #[default]
    Attendee,
    /// Notes from the person who hosted it.
    Host,
}

impl SurveyVariant {
    /// Parse the `type` parameter. Anything other than `host` is an attendee
    /// survey.
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("host") => Self::Host,
            _ => Self::Attendee,
        }
    }

    /// The value used in links.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attendee => "attendee",
            Self::Host => "host",
        }
    }
}

impl std::fmt::Display for SurveyVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters exactly as they arrive on the link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinkQuery {
    /// Contact identifier.
    #[serde(default)]
    pub contact_id: Option<String>,
    /// Survey variant tag.
    #[serde(default, rename = "type")]
    pub survey_type: Option<String>,
    /// Meeting date, free-form.
    #[serde(default)]
    pub date: Option<String>,
}

impl LinkQuery {
    /// Resolve into a [`SurveyLink`], filling the date with `today` when
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyFailure::MissingLinkParameter`] if there is no
    /// non-blank `contact_id`.
    pub fn resolve(self, today: NaiveDate) -> std::result::Result<SurveyLink, SurveyFailure> {
        let contact_id = self
            .contact_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(SurveyFailure::MissingLinkParameter)?;

        Ok(SurveyLink {
            contact_id,
            variant: SurveyVariant::from_param(self.survey_type.as_deref()),
            meeting_date: self
                .date
                .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
        })
    }
}

/// A survey link with a contact id present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyLink {
    /// Contact identifier, opaque.
    pub contact_id: String,
    /// Which form to show.
    pub variant: SurveyVariant,
    /// Meeting date as it should appear in the notes.
    pub meeting_date: String,
}

impl SurveyLink {
    /// Build the full URL for this link under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid absolute URL.
    pub fn to_url(&self, base_url: &str) -> Result<String> {
        let mut url = reqwest::Url::parse(base_url).map_err(|e| Error::ConfigValidation {
            message: format!("server.public_url is not a valid URL ({base_url}): {e}"),
        })?;
        url.query_pairs_mut()
            .append_pair("contact_id", &self.contact_id)
            .append_pair("type", self.variant.as_str())
            .append_pair("date", &self.meeting_date);
        Ok(url.into())
    }
}
