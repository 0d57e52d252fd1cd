//! Turns a filled-in form into the text block appended to contact notes.
//!
//! The block layout is a formatting contract: readers of the CRM notes
//! field rely on the delimiter lines and section headings. Empty free-text
//! answers are written as a placeholder, never left blank.

use chrono::NaiveDateTime;

use super::form::{AttendeeResponse, HostResponse, SurveyResponse};

/// Line that opens and closes every block.
pub const DELIMITER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Glyph repeated once per rating point.
pub const RATING_GLYPH: &str = "⭐";

/// Placeholder for empty host free-text fields.
pub const NONE_ENTERED: &str = "(none entered)";

/// Placeholder for empty attendee free-text fields.
pub const NONE_PROVIDED: &str = "(none provided)";

/// Written when an attendee picks no services.
pub const NO_TOPICS: &str = "None selected";

/// Everything a block needs besides the answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockContext<'a> {
    /// Meeting date from the link.
    pub meeting_date: &'a str,
    /// Contact display name (attendee blocks only).
    pub contact_name: &'a str,
    /// Local submission time for the header.
    pub submitted_at: NaiveDateTime,
}

/// Render a response as a notes block.
#[must_use]
pub fn compose_block(response: &SurveyResponse, ctx: &BlockContext<'_>) -> String {
    match response {
        SurveyResponse::Attendee(r) => compose_attendee(r, ctx),
        SurveyResponse::Host(r) => compose_host(r, ctx),
    }
}

fn compose_attendee(r: &AttendeeResponse, ctx: &BlockContext<'_>) -> String {
    let topics = if r.topics.is_empty() {
        NO_TOPICS.to_string()
    } else {
        r.topics.join(", ")
    };

    format!(
        "
{DELIMITER}
📋 ATTENDEE FEEDBACK ({stamp})
Meeting Date: {date}
From: {name}
{DELIMITER}
Experience: {experience}
Value: {value}
Analysis Doc: {analysis}
Topics of Interest: {topics}
Follow-up Interest: {follow_up}

FEEDBACK:
{feedback}

REFERRAL:
{referral}
{DELIMITER}",
        stamp = timestamp(ctx),
        date = ctx.meeting_date,
        name = ctx.contact_name,
        experience = rating_line(r.experience),
        value = rating_line(r.value),
        analysis = r.analysis_doc,
        follow_up = r.follow_up,
        feedback = text_or(&r.feedback, NONE_PROVIDED),
        referral = text_or(&r.referral, NONE_PROVIDED),
    )
}

fn compose_host(r: &HostResponse, ctx: &BlockContext<'_>) -> String {
    format!(
        "
{DELIMITER}
📋 HOST MEETING NOTES ({stamp})
Meeting Date: {date}
{DELIMITER}
Rating: {rating}
Relationship: {relationship}
Business Potential: {potential}
Follow-up: {follow_up}

KEY TAKEAWAYS:
{takeaways}

ACTION ITEMS:
{actions}

NOTES:
{notes}
{DELIMITER}",
        stamp = timestamp(ctx),
        date = ctx.meeting_date,
        rating = rating_line(r.rating),
        relationship = r.relationship,
        potential = r.business_potential,
        follow_up = r.follow_up,
        takeaways = text_or(&r.key_takeaways, NONE_ENTERED),
        actions = text_or(&r.action_items, NONE_ENTERED),
        notes = text_or(&r.additional_notes, NONE_ENTERED),
    )
}

fn timestamp(ctx: &BlockContext<'_>) -> String {
    ctx.submitted_at.format("%Y-%m-%d %H:%M").to_string()
}

/// `⭐⭐⭐⭐ (4/5)`
#[must_use]
pub fn rating_line(rating: u8) -> String {
    format!("{} ({rating}/5)", RATING_GLYPH.repeat(usize::from(rating)))
}

fn text_or<'a>(text: &'a str, placeholder: &'a str) -> &'a str {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        placeholder
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ctx() -> BlockContext<'static> {
        BlockContext {
            meeting_date: "2024-05-01",
            contact_name: "Ada Lovelace",
            submitted_at: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(14, 7, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_rating_line() {
        assert_eq!(rating_line(5), "⭐⭐⭐⭐⭐ (5/5)");
        assert_eq!(rating_line(1), "⭐ (1/5)");
    }

    #[test]
    fn test_attendee_example_block() {
        let response = SurveyResponse::Attendee(AttendeeResponse {
            experience: 5,
            value: 4,
            analysis_doc: "Very helpful".to_string(),
            topics: vec!["AI Solutions".to_string(), "CRM Implementation".to_string()],
            follow_up: "Yes, definitely".to_string(),
            feedback: "Great session".to_string(),
            referral: String::new(),
        });
        let block = compose_block(&response, &ctx());

        assert!(block.contains("Meeting Date: 2024-05-01"));
        assert!(block.contains("Experience: ⭐⭐⭐⭐⭐ (5/5)"));
        assert!(block.contains("Value: ⭐⭐⭐⭐ (4/5)"));
        assert!(block.contains("Analysis Doc: Very helpful"));
        assert!(block.contains("Topics of Interest: AI Solutions, CRM Implementation"));
        assert!(block.contains("Follow-up Interest: Yes, definitely"));
        assert!(block.contains("FEEDBACK:\nGreat session"));
        assert!(block.contains("REFERRAL:\n(none provided)"));
        assert!(block.contains("From: Ada Lovelace"));
    }

    #[test]
    fn test_block_framing() {
        let block = compose_block(
            &SurveyResponse::Host(HostResponse::default()),
            &ctx(),
        );
        let lines: Vec<&str> = block.split('\n').collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], DELIMITER);
        assert_eq!(lines[2], "📋 HOST MEETING NOTES (2024-05-01 14:07)");
        assert_eq!(lines[3], "Meeting Date: 2024-05-01");
        assert_eq!(lines[4], DELIMITER);
        assert_eq!(*lines.last().unwrap(), DELIMITER);
        assert!(!block.contains("From:"));
    }

    #[test]
    fn test_host_empty_text_uses_placeholders() {
        let block = compose_block(
            &SurveyResponse::Host(HostResponse {
                key_takeaways: "   ".to_string(),
                ..HostResponse::default()
            }),
            &ctx(),
        );

        assert!(block.contains("KEY TAKEAWAYS:\n(none entered)"));
        assert!(block.contains("ACTION ITEMS:\n(none entered)"));
        assert!(block.contains("NOTES:\n(none entered)"));
        assert!(block.contains("Rating: ⭐⭐⭐⭐ (4/5)"));
        assert!(block.contains("Relationship: Good connection"));
        assert!(block.contains("Business Potential: Medium"));
        assert!(block.contains("Follow-up: No follow-up needed"));
    }

    #[test]
    fn test_attendee_empty_text_uses_placeholders() {
        let block = compose_block(
            &SurveyResponse::Attendee(AttendeeResponse::default()),
            &ctx(),
        );

        assert!(block.contains("FEEDBACK:\n(none provided)"));
        assert!(block.contains("REFERRAL:\n(none provided)"));
        assert!(block.contains("Topics of Interest: None selected"));
    }

    #[test]
    fn test_free_text_is_trimmed() {
        let block = compose_block(
            &SurveyResponse::Host(HostResponse {
                action_items: "\n  send proposal by Friday  \n".to_string(),
                ..HostResponse::default()
            }),
            &ctx(),
        );
        assert!(block.contains("ACTION ITEMS:\nsend proposal by Friday\n\nNOTES:"));
    }

    #[test]
    fn test_multiline_text_kept_intact() {
        let block = compose_block(
            &SurveyResponse::Attendee(AttendeeResponse {
                feedback: "line one\nline two".to_string(),
                ..AttendeeResponse::default()
            }),
            &ctx(),
        );
        assert!(block.contains("FEEDBACK:\nline one\nline two\n\nREFERRAL:"));
    }
}
