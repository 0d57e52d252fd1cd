//! Fixed field layouts for both survey variants, and the responses they
//! collect.
//!
//! The schemas are static: every field has a fixed default and a fixed
//! option list. Submitted values are never rejected. Ratings are clamped to
//! their range, unknown choices fall back to the default and missing fields
//! keep their defaults.

use super::SurveyVariant;

/// Lowest rating a slider accepts.
pub const RATING_MIN: u8 = 1;
/// Highest rating a slider accepts.
pub const RATING_MAX: u8 = 5;
/// Initial slider position.
pub const RATING_DEFAULT: u8 = 4;

/// Answers to "Was the Strategic Growth Analysis document helpful?".
pub const ANALYSIS_DOC_OPTIONS: &[&str] = &[
    "Very helpful",
    "Somewhat helpful",
    "Neutral",
    "Not very helpful",
    "Did not review it",
];

/// Services an attendee can say they are interested in.
pub const SERVICE_OPTIONS: &[&str] = &[
    "System Optimization",
    "Integration & Automation",
    "Custom Software Development",
    "AI Solutions",
    "CRM Implementation",
    "Marketing Automation",
    "Client Portal",
    "Technology & Systems Consulting",
    "None at this time",
];

/// Answers to "Interested in a follow-up conversation?".
pub const FOLLOW_UP_INTEREST_OPTIONS: &[&str] = &[
    "Yes, definitely",
    "Maybe, send me more info",
    "Not at this time",
];

/// Relationship progress choices for hosts.
pub const RELATIONSHIP_OPTIONS: &[&str] = &[
    "No connection",
    "Initial rapport",
    "Good connection",
    "Strong connection",
    "Partnership potential",
];

/// Business/referral potential choices for hosts.
pub const BUSINESS_POTENTIAL_OPTIONS: &[&str] =
    &["None", "Low", "Medium", "High", "Immediate opportunity"];

/// Follow-up action choices for hosts.
pub const FOLLOW_UP_ACTION_OPTIONS: &[&str] = &[
    "No follow-up needed",
    "Send info/proposal",
    "Schedule another meeting",
    "Make introduction",
    "Add to drip campaign",
];

/// The kind of input a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Integer slider between [`RATING_MIN`] and [`RATING_MAX`].
    Rating {
        /// Hover help.
        help: &'static str,
    },
    /// Dropdown with one selection.
    Select {
        /// Choices in display order.
        options: &'static [&'static str],
        /// Index of the preselected choice.
        default: usize,
    },
    /// Horizontal radio buttons.
    Radio {
        /// Choices in display order.
        options: &'static [&'static str],
        /// Index of the preselected choice.
        default: usize,
    },
    /// Any number of checkboxes.
    MultiSelect {
        /// Choices in display order.
        options: &'static [&'static str],
    },
    /// Multi-line text.
    TextArea {
        /// Greyed-out hint.
        placeholder: &'static str,
        /// Visible height in rows.
        rows: u8,
    },
    /// Single-line text.
    TextInput {
        /// Greyed-out hint.
        placeholder: &'static str,
    },
}

/// One labelled input on a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Form field name.
    pub name: &'static str,
    /// Label shown above the input. `{host}` is replaced with the host name.
    pub label: &'static str,
    /// Input kind.
    pub kind: FieldKind,
}

/// Attendee feedback form, in display order.
pub const ATTENDEE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "experience",
        label: "Meeting experience",
        kind: FieldKind::Rating {
            help: "1 = Poor, 5 = Excellent",
        },
    },
    FieldSpec {
        name: "value",
        label: "Value of conversation",
        kind: FieldKind::Rating {
            help: "1 = Not valuable, 5 = Very valuable",
        },
    },
    FieldSpec {
        name: "analysis_doc",
        label: "Was the Strategic Growth Analysis document helpful?",
        kind: FieldKind::Radio {
            options: ANALYSIS_DOC_OPTIONS,
            default: 1,
        },
    },
    FieldSpec {
        name: "topics",
        label: "Which services could benefit your business?",
        kind: FieldKind::MultiSelect {
            options: SERVICE_OPTIONS,
        },
    },
    FieldSpec {
        name: "follow_up",
        label: "Interested in a follow-up conversation?",
        kind: FieldKind::Radio {
            options: FOLLOW_UP_INTEREST_OPTIONS,
            default: 1,
        },
    },
    FieldSpec {
        name: "feedback",
        label: "Any other feedback or suggestions?",
        kind: FieldKind::TextArea {
            placeholder: "We genuinely appreciate your honest thoughts...",
            rows: 4,
        },
    },
    FieldSpec {
        name: "referral",
        label: "Know someone else who might benefit from meeting with {host}?",
        kind: FieldKind::TextInput {
            placeholder: "Name and contact info (optional)",
        },
    },
];

/// Host meeting-notes form, in display order.
pub const HOST_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "rating",
        label: "Overall meeting rating",
        kind: FieldKind::Rating {
            help: "1 = Poor, 5 = Excellent",
        },
    },
    FieldSpec {
        name: "relationship",
        label: "Relationship progress",
        kind: FieldKind::Select {
            options: RELATIONSHIP_OPTIONS,
            default: 2,
        },
    },
    FieldSpec {
        name: "business_potential",
        label: "Business/referral potential",
        kind: FieldKind::Select {
            options: BUSINESS_POTENTIAL_OPTIONS,
            default: 2,
        },
    },
    FieldSpec {
        name: "follow_up",
        label: "Follow-up action",
        kind: FieldKind::Select {
            options: FOLLOW_UP_ACTION_OPTIONS,
            default: 0,
        },
    },
    FieldSpec {
        name: "key_takeaways",
        label: "🎯 Key takeaways",
        kind: FieldKind::TextArea {
            placeholder: "What did you learn? What was discussed? Key insights?",
            rows: 5,
        },
    },
    FieldSpec {
        name: "action_items",
        label: "✅ Action items / Next steps",
        kind: FieldKind::TextArea {
            placeholder: "What needs to happen next? Any promises made?",
            rows: 4,
        },
    },
    FieldSpec {
        name: "additional_notes",
        label: "📝 Additional notes",
        kind: FieldKind::TextArea {
            placeholder: "Anything else worth remembering?",
            rows: 3,
        },
    },
];

/// The field layout for a variant.
#[must_use]
pub fn fields(variant: SurveyVariant) -> &'static [FieldSpec] {
    match variant {
        SurveyVariant::Attendee => ATTENDEE_FIELDS,
        SurveyVariant::Host => HOST_FIELDS,
    }
}

/// Decoded `application/x-www-form-urlencoded` pairs.
///
/// Kept as pairs so repeated keys (multi-select) survive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    /// Wrap decoded pairs.
    #[must_use]
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value for `name`, in submission order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn rating(&self, name: &str) -> u8 {
        self.get(name)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map_or(RATING_DEFAULT, |n| {
                u8::try_from(n.clamp(i64::from(RATING_MIN), i64::from(RATING_MAX)))
                    .unwrap_or(RATING_DEFAULT)
            })
    }

    fn choice(&self, name: &str, options: &[&str], default: usize) -> String {
        self.get(name)
            .and_then(|raw| options.iter().find(|opt| **opt == raw))
            .map_or_else(|| options[default].to_string(), |opt| (*opt).to_string())
    }

    fn choices(&self, name: &str, options: &[&str]) -> Vec<String> {
        let picked: Vec<&str> = self.get_all(name).collect();
        options
            .iter()
            .filter(|opt| picked.contains(opt))
            .map(|opt| (*opt).to_string())
            .collect()
    }

    fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }
}

/// Answers to the attendee form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeResponse {
    /// Meeting experience, 1..=5.
    pub experience: u8,
    /// Value of the conversation, 1..=5.
    pub value: u8,
    /// Analysis-document helpfulness.
    pub analysis_doc: String,
    /// Selected services, in option order.
    pub topics: Vec<String>,
    /// Follow-up interest.
    pub follow_up: String,
    /// Free-text feedback.
    pub feedback: String,
    /// Free-text referral.
    pub referral: String,
}

impl Default for AttendeeResponse {
    fn default() -> Self {
        Self {
            experience: RATING_DEFAULT,
            value: RATING_DEFAULT,
            analysis_doc: ANALYSIS_DOC_OPTIONS[1].to_string(),
            topics: Vec::new(),
            follow_up: FOLLOW_UP_INTEREST_OPTIONS[1].to_string(),
            feedback: String::new(),
            referral: String::new(),
        }
    }
}

impl AttendeeResponse {
    /// Collect answers from a submitted form.
    #[must_use]
    pub fn from_form(form: &FormData) -> Self {
        Self {
            experience: form.rating("experience"),
            value: form.rating("value"),
            analysis_doc: form.choice("analysis_doc", ANALYSIS_DOC_OPTIONS, 1),
            topics: form.choices("topics", SERVICE_OPTIONS),
            follow_up: form.choice("follow_up", FOLLOW_UP_INTEREST_OPTIONS, 1),
            feedback: form.text("feedback"),
            referral: form.text("referral"),
        }
    }
}

/// Answers to the host form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostResponse {
    /// Overall rating, 1..=5.
    pub rating: u8,
    /// Relationship progress.
    pub relationship: String,
    /// Business/referral potential.
    pub business_potential: String,
    /// Follow-up action.
    pub follow_up: String,
    /// Key takeaways.
    pub key_takeaways: String,
    /// Action items / next steps.
    pub action_items: String,
    /// Anything else.
    pub additional_notes: String,
}

impl Default for HostResponse {
    fn default() -> Self {
        Self {
            rating: RATING_DEFAULT,
            relationship: RELATIONSHIP_OPTIONS[2].to_string(),
            business_potential: BUSINESS_POTENTIAL_OPTIONS[2].to_string(),
            follow_up: FOLLOW_UP_ACTION_OPTIONS[0].to_string(),
            key_takeaways: String::new(),
            action_items: String::new(),
            additional_notes: String::new(),
        }
    }
}

impl HostResponse {
    /// Collect answers from a submitted form.
    #[must_use]
    pub fn from_form(form: &FormData) -> Self {
        Self {
            rating: form.rating("rating"),
            relationship: form.choice("relationship", RELATIONSHIP_OPTIONS, 2),
            business_potential: form.choice("business_potential", BUSINESS_POTENTIAL_OPTIONS, 2),
            follow_up: form.choice("follow_up", FOLLOW_UP_ACTION_OPTIONS, 0),
            key_takeaways: form.text("key_takeaways"),
            action_items: form.text("action_items"),
            additional_notes: form.text("additional_notes"),
        }
    }
}

/// The current value of a field, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Slider position.
    Rating(u8),
    /// Selected option.
    Choice(&'a str),
    /// Selected options.
    Choices(&'a [String]),
    /// Entered text.
    Text(&'a str),
}

/// A filled-in form of either variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyResponse {
    /// Attendee feedback.
    Attendee(AttendeeResponse),
    /// Host notes.
    Host(HostResponse),
}

impl SurveyResponse {
    /// The untouched form for a variant.
    #[must_use]
    pub fn defaults(variant: SurveyVariant) -> Self {
        match variant {
            SurveyVariant::Attendee => Self::Attendee(AttendeeResponse::default()),
            SurveyVariant::Host => Self::Host(HostResponse::default()),
        }
    }

    /// Collect a submitted form for a variant.
    #[must_use]
    pub fn from_form(variant: SurveyVariant, form: &FormData) -> Self {
        match variant {
            SurveyVariant::Attendee => Self::Attendee(AttendeeResponse::from_form(form)),
            SurveyVariant::Host => Self::Host(HostResponse::from_form(form)),
        }
    }

    /// Which variant this response belongs to.
    #[must_use]
    pub fn variant(&self) -> SurveyVariant {
        match self {
            Self::Attendee(_) => SurveyVariant::Attendee,
            Self::Host(_) => SurveyVariant::Host,
        }
    }

    /// The value currently held by the field called `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<FieldValue<'_>> {
        match self {
            Self::Attendee(r) => match name {
                "experience" => Some(FieldValue::Rating(r.experience)),
                "value" => Some(FieldValue::Rating(r.value)),
                "analysis_doc" => Some(FieldValue::Choice(&r.analysis_doc)),
                "topics" => Some(FieldValue::Choices(&r.topics)),
                "follow_up" => Some(FieldValue::Choice(&r.follow_up)),
                "feedback" => Some(FieldValue::Text(&r.feedback)),
                "referral" => Some(FieldValue::Text(&r.referral)),
                _ => None,
            },
            Self::Host(r) => match name {
                "rating" => Some(FieldValue::Rating(r.rating)),
                "relationship" => Some(FieldValue::Choice(&r.relationship)),
                "business_potential" => Some(FieldValue::Choice(&r.business_potential)),
                "follow_up" => Some(FieldValue::Choice(&r.follow_up)),
                "key_takeaways" => Some(FieldValue::Text(&r.key_takeaways)),
                "action_items" => Some(FieldValue::Text(&r.action_items)),
                "additional_notes" => Some(FieldValue::Text(&r.additional_notes)),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        FormData::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_every_field_has_a_value() {
        for variant in [SurveyVariant::Attendee, SurveyVariant::Host] {
            let response = SurveyResponse::defaults(variant);
            for spec in fields(variant) {
                assert!(
                    response.value(spec.name).is_some(),
                    "no value for {variant} field {}",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn test_defaults_match_schema() {
        for variant in [SurveyVariant::Attendee, SurveyVariant::Host] {
            let response = SurveyResponse::defaults(variant);
            for spec in fields(variant) {
                match (spec.kind, response.value(spec.name).unwrap()) {
                    (FieldKind::Rating { .. }, FieldValue::Rating(n)) => {
                        assert_eq!(n, RATING_DEFAULT);
                    }
                    (
                        FieldKind::Select { options, default } | FieldKind::Radio { options, default },
                        FieldValue::Choice(choice),
                    ) => assert_eq!(choice, options[default]),
                    (FieldKind::MultiSelect { .. }, FieldValue::Choices(picked)) => {
                        assert!(picked.is_empty());
                    }
                    (
                        FieldKind::TextArea { .. } | FieldKind::TextInput { .. },
                        FieldValue::Text(text),
                    ) => assert!(text.is_empty()),
                    (kind, value) => panic!("{}: {kind:?} holds {value:?}", spec.name),
                }
            }
        }
    }

    #[test]
    fn test_empty_form_yields_defaults() {
        let empty = FormData::default();
        assert_eq!(
            SurveyResponse::from_form(SurveyVariant::Attendee, &empty),
            SurveyResponse::defaults(SurveyVariant::Attendee)
        );
        assert_eq!(
            SurveyResponse::from_form(SurveyVariant::Host, &empty),
            SurveyResponse::defaults(SurveyVariant::Host)
        );
    }

    #[test]
    fn test_attendee_from_form() {
        let data = form(&[
            ("experience", "5"),
            ("value", "2"),
            ("analysis_doc", "Very helpful"),
            ("topics", "CRM Implementation"),
            ("topics", "AI Solutions"),
            ("follow_up", "Yes, definitely"),
            ("feedback", "Great session"),
            ("referral", ""),
        ]);
        let r = AttendeeResponse::from_form(&data);
        assert_eq!(r.experience, 5);
        assert_eq!(r.value, 2);
        assert_eq!(r.analysis_doc, "Very helpful");
        // Option order, not submission order
        assert_eq!(r.topics, vec!["AI Solutions", "CRM Implementation"]);
        assert_eq!(r.follow_up, "Yes, definitely");
        assert_eq!(r.feedback, "Great session");
        assert!(r.referral.is_empty());
    }

    #[test]
    fn test_ratings_are_clamped() {
        let r = HostResponse::from_form(&form(&[("rating", "11")]));
        assert_eq!(r.rating, RATING_MAX);

        let r = HostResponse::from_form(&form(&[("rating", "-3")]));
        assert_eq!(r.rating, RATING_MIN);

        let r = HostResponse::from_form(&form(&[("rating", "lots")]));
        assert_eq!(r.rating, RATING_DEFAULT);
    }

    #[test]
    fn test_unknown_choice_falls_back_to_default() {
        let r = HostResponse::from_form(&form(&[
            ("relationship", "Best friends"),
            ("follow_up", "Make introduction"),
        ]));
        assert_eq!(r.relationship, "Good connection");
        assert_eq!(r.follow_up, "Make introduction");
    }

    #[test]
    fn test_unknown_and_duplicate_topics_dropped() {
        let r = AttendeeResponse::from_form(&form(&[
            ("topics", "Client Portal"),
            ("topics", "Time travel"),
            ("topics", "Client Portal"),
        ]));
        assert_eq!(r.topics, vec!["Client Portal"]);
    }

    #[test]
    fn test_form_data_get_all() {
        let data = form(&[("a", "1"), ("b", "2"), ("a", "3")]);
        assert_eq!(data.get("a"), Some("1"));
        assert_eq!(data.get_all("a").collect::<Vec<_>>(), vec!["1", "3"]);
        assert_eq!(data.get("missing"), None);
    }

    #[test]
    fn test_follow_up_shared_name_differs_by_variant() {
        let data = form(&[("follow_up", "Not at this time")]);
        let attendee = AttendeeResponse::from_form(&data);
        let host = HostResponse::from_form(&data);
        assert_eq!(attendee.follow_up, "Not at this time");
        assert_eq!(host.follow_up, "No follow-up needed");
    }

    #[test]
    fn test_response_variant() {
        assert_eq!(
            SurveyResponse::defaults(SurveyVariant::Host).variant(),
            SurveyVariant::Host
        );
    }
}
