//! HTML rendering for the survey page.
//!
//! One page serves both variants: a header with the logo, a heading for the
//! contact, the form, and a footer. After a submit the same form is rendered
//! again with the submitted values and a banner above it.
//!
//! Everything interpolated from a contact record, a link or a form goes
//! through [`html_escape`].

use std::fmt::Write as _;

use tracing::warn;

use crate::config::{BrandingConfig, HeaderStyle};
use crate::contact::ContactIdentity;
use crate::error::SurveyFailure;
use crate::survey::form::{RATING_DEFAULT, RATING_MAX, RATING_MIN};
use crate::survey::{
    fields, FieldKind, FieldSpec, FieldValue, SurveyLink, SurveyResponse, SurveyVariant,
};

/// Page title shown above the form.
pub const PAGE_HEADING: &str = "📋 Meeting Feedback";

/// Footer note shown on every page.
pub const CONFIDENTIALITY_NOTE: &str =
    "Your feedback is confidential and used only to improve our services.";

const STYLE: &str = r"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 760px; margin: 0 auto; padding: 1rem; color: #262730; }
header { display: flex; align-items: center; justify-content: space-between; gap: 1rem; }
header img, header svg { max-width: 50%; height: auto; }
hr { border: none; border-top: 1px solid #ddd; margin: 1.5rem 0; }
.caption { color: #808495; font-size: 0.9rem; margin: 0.25rem 0; }
.banner { padding: 0.75rem 1rem; border-radius: 0.5rem; margin: 1rem 0; }
.banner.success { background: #dff5e3; color: #1b5e20; }
.banner.error { background: #fde2e1; color: #8a1c1c; }
.banner.info { background: #e3effd; color: #0d47a1; }
.field { margin: 1.25rem 0; }
.field > label, .field > legend { display: block; font-weight: 600; margin-bottom: 0.4rem; }
fieldset { border: none; padding: 0; margin: 0; }
.options label { margin-right: 1rem; font-weight: normal; }
textarea, input[type=text], select { width: 100%; box-sizing: border-box; padding: 0.5rem; }
input[type=range] { width: 80%; }
button { width: 100%; padding: 0.75rem; font-size: 1rem; border-radius: 0.5rem; border: none; background: #ff4b4b; color: white; cursor: pointer; }
a.button { display: inline-block; padding: 0.5rem 1rem; border: 1px solid #ccc; border-radius: 0.5rem; text-decoration: none; }
";

/// Outcome of a submit, shown above the re-rendered form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    /// The block was appended.
    Saved,
    /// The append failed.
    Failed(SurveyFailure),
}

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Branding plus the header logo, resolved once when the server starts.
#[derive(Debug, Clone)]
pub struct PageChrome {
    /// Branding settings.
    pub branding: BrandingConfig,
    logo: String,
}

impl PageChrome {
    /// Resolve the logo markup for the configured header style.
    ///
    /// With `inline_svg` the SVG file is read here. A missing path or an
    /// unreadable file falls back to the logo URL with a warning.
    #[must_use]
    pub fn load(branding: BrandingConfig) -> Self {
        let logo = resolve_logo(&branding);
        Self { branding, logo }
    }

    /// The resolved logo markup.
    #[must_use]
    pub fn logo(&self) -> &str {
        &self.logo
    }
}

/// Render the survey form for a contact.
#[must_use]
pub fn render_survey_page(
    chrome: &PageChrome,
    link: &SurveyLink,
    identity: &ContactIdentity,
    response: &SurveyResponse,
    banner: Option<&Banner>,
) -> String {
    let branding = &chrome.branding;
    let mut body = render_intro(branding, link, identity);
    if let Some(banner) = banner {
        body.push_str(&render_banner(branding, link.variant, banner));
    }
    body.push_str(&render_form(branding, response));
    render_shell(chrome, &body)
}

/// Render a page that only carries a failure message.
#[must_use]
pub fn render_failure_page(chrome: &PageChrome, failure: &SurveyFailure) -> String {
    let mut body = format!(
        r#"<div class="banner error">{}</div>"#,
        html_escape(&failure.user_message())
    );
    if *failure == SurveyFailure::MissingLinkParameter {
        let _ = write!(
            body,
            r#"<div class="banner info">If you believe this is an error, please contact {}</div>"#,
            html_escape(&chrome.branding.support_email)
        );
    }
    render_shell(chrome, &body)
}

fn render_shell(chrome: &PageChrome, body: &str) -> String {
    let branding = &chrome.branding;
    let title = html_escape(&branding.page_title);
    let header = chrome.logo();
    let footer = format!(
        "{} | {} | {}",
        html_escape(&branding.legal_name),
        html_escape(&branding.phone),
        html_escape(&branding.support_email),
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<header>
<h1>{PAGE_HEADING}</h1>
{header}
</header>
{body}
<hr>
<footer>
<p class="caption">{footer}</p>
<p class="caption">{CONFIDENTIALITY_NOTE}</p>
</footer>
</body>
</html>
"#
    )
}

fn resolve_logo(branding: &BrandingConfig) -> String {
    match (branding.header_style, &branding.logo_svg_path) {
        (HeaderStyle::InlineSvg, Some(path)) => match std::fs::read_to_string(path) {
            Ok(svg) => return svg,
            Err(e) => warn!(
                "failed to read logo SVG at {}, using logo URL: {e}",
                path.display()
            ),
        },
        (HeaderStyle::InlineSvg, None) => {
            warn!("inline_svg header style without logo_svg_path, using logo URL");
        }
        (HeaderStyle::StaticImage, _) => {}
    }

    format!(
        r#"<img src="{}" alt="{}" width="500">"#,
        html_escape(&branding.logo_url),
        html_escape(&branding.company_name)
    )
}

fn render_intro(branding: &BrandingConfig, link: &SurveyLink, identity: &ContactIdentity) -> String {
    let date = html_escape(&link.meeting_date);
    let mut out = String::from("<hr>\n");

    match link.variant {
        SurveyVariant::Host => {
            let _ = writeln!(
                out,
                "<h2>📝 Your Meeting Notes: {}</h2>",
                html_escape(&identity.display_name())
            );
            if let Some(company) = identity.company() {
                let _ = writeln!(out, r#"<p class="caption">🏢 {}</p>"#, html_escape(company));
            }
            let _ = writeln!(out, r#"<p class="caption">📅 Meeting Date: {date}</p>"#);
            out.push_str(
                r#"<div class="banner info">💡 Capture your thoughts while they're fresh! This saves directly to the CRM.</div>"#,
            );
        }
        SurveyVariant::Attendee => {
            let _ = writeln!(
                out,
                "<h2>Thank you for meeting with {}!</h2>",
                html_escape(&branding.host_name)
            );
            let _ = writeln!(out, r#"<p class="caption">📅 Meeting Date: {date}</p>"#);
            out.push_str(
                "<p>Your feedback helps us improve. <strong>This takes less than 2 minutes.</strong></p>",
            );
        }
    }
    out.push('\n');
    out
}

fn render_form(branding: &BrandingConfig, response: &SurveyResponse) -> String {
    let variant = response.variant();
    let submit = match variant {
        SurveyVariant::Host => "💾 Save Meeting Notes",
        SurveyVariant::Attendee => "📨 Submit Feedback",
    };

    let mut out = String::from("<form method=\"post\">\n");
    for spec in fields(variant) {
        out.push_str(&render_field(spec, response.value(spec.name), &branding.host_name));
    }
    let _ = writeln!(out, r#"<button type="submit">{submit}</button>"#);
    out.push_str("</form>\n");
    out
}

fn render_field(spec: &FieldSpec, value: Option<FieldValue<'_>>, host_name: &str) -> String {
    let name = spec.name;
    let label = html_escape(&spec.label.replace("{host}", host_name));

    match spec.kind {
        FieldKind::Rating { help } => {
            let current = match value {
                Some(FieldValue::Rating(n)) => n,
                _ => RATING_DEFAULT,
            };
            format!(
                r#"<div class="field">
<label for="{name}" title="{help}">{label}</label>
<input type="range" id="{name}" name="{name}" min="{RATING_MIN}" max="{RATING_MAX}" step="1" value="{current}" oninput="this.nextElementSibling.value = this.value">
<output>{current}</output>
</div>
"#,
                help = html_escape(help),
            )
        }
        FieldKind::Select { options, default } => {
            let selected = selected_choice(value, options, default);
            let mut opts = String::new();
            for option in options {
                let attr = if *option == selected { " selected" } else { "" };
                let option = html_escape(option);
                let _ = writeln!(opts, r#"<option value="{option}"{attr}>{option}</option>"#);
            }
            format!(
                r#"<div class="field">
<label for="{name}">{label}</label>
<select id="{name}" name="{name}">
{opts}</select>
</div>
"#
            )
        }
        FieldKind::Radio { options, default } => {
            let selected = selected_choice(value, options, default);
            let mut opts = String::new();
            for option in options {
                let attr = if *option == selected { " checked" } else { "" };
                let option = html_escape(option);
                let _ = writeln!(
                    opts,
                    r#"<label><input type="radio" name="{name}" value="{option}"{attr}> {option}</label>"#
                );
            }
            format!(
                r#"<fieldset class="field">
<legend>{label}</legend>
<div class="options">
{opts}</div>
</fieldset>
"#
            )
        }
        FieldKind::MultiSelect { options } => {
            let picked: &[String] = match value {
                Some(FieldValue::Choices(picked)) => picked,
                _ => &[],
            };
            let mut opts = String::new();
            for option in options {
                let attr = if picked.iter().any(|p| p == option) {
                    " checked"
                } else {
                    ""
                };
                let option = html_escape(option);
                let _ = writeln!(
                    opts,
                    r#"<label><input type="checkbox" name="{name}" value="{option}"{attr}> {option}</label><br>"#
                );
            }
            format!(
                r#"<fieldset class="field">
<legend>{label}</legend>
<div class="options">
{opts}</div>
</fieldset>
"#
            )
        }
        FieldKind::TextArea { placeholder, rows } => {
            let text = text_value(value);
            format!(
                r#"<div class="field">
<label for="{name}">{label}</label>
<textarea id="{name}" name="{name}" rows="{rows}" placeholder="{placeholder}">{text}</textarea>
</div>
"#,
                placeholder = html_escape(placeholder),
                text = html_escape(text),
            )
        }
        FieldKind::TextInput { placeholder } => {
            let text = text_value(value);
            format!(
                r#"<div class="field">
<label for="{name}">{label}</label>
<input type="text" id="{name}" name="{name}" placeholder="{placeholder}" value="{text}">
</div>
"#,
                placeholder = html_escape(placeholder),
                text = html_escape(text),
            )
        }
    }
}

fn selected_choice<'a>(
    value: Option<FieldValue<'a>>,
    options: &'a [&'a str],
    default: usize,
) -> &'a str {
    match value {
        Some(FieldValue::Choice(choice)) => choice,
        _ => options.get(default).copied().unwrap_or_default(),
    }
}

fn text_value(value: Option<FieldValue<'_>>) -> &str {
    match value {
        Some(FieldValue::Text(text)) => text,
        _ => "",
    }
}

fn render_banner(branding: &BrandingConfig, variant: SurveyVariant, banner: &Banner) -> String {
    match (banner, variant) {
        (Banner::Saved, SurveyVariant::Host) => {
            r#"<div class="banner success">✅ Meeting notes saved to CRM!</div>"#.to_string()
        }
        (Banner::Saved, SurveyVariant::Attendee) => format!(
            r#"<div class="banner success">✅ Thank you! Your feedback has been recorded.</div>
<hr>
<p><strong>Learn more about {company}:</strong></p>
<a class="button" href="{website}">🌐 Visit Our Website</a>
"#,
            company = html_escape(&branding.company_name),
            website = html_escape(&branding.website_url),
        ),
        (Banner::Failed(failure), _) => format!(
            r#"<div class="banner error">{}</div>"#,
            html_escape(&failure.user_message())
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::survey::{FormData, LinkQuery};

    fn link(variant: &str) -> SurveyLink {
        LinkQuery {
            contact_id: Some("c-42".to_string()),
            survey_type: Some(variant.to_string()),
            date: Some("2024-05-01".to_string()),
        }
        .resolve(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        .unwrap()
    }

    fn identity() -> ContactIdentity {
        ContactIdentity {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            company: Some("Analytical Engines".to_string()),
        }
    }

    fn chrome() -> PageChrome {
        PageChrome::load(BrandingConfig::default())
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_attendee_page_defaults() {
        let link = link("attendee");
        let html = render_survey_page(
            &chrome(),
            &link,
            &identity(),
            &SurveyResponse::defaults(SurveyVariant::Attendee),
            None,
        );

        assert!(html.contains("Thank you for meeting with Patrick!"));
        assert!(html.contains("📅 Meeting Date: 2024-05-01"));
        assert!(html.contains("less than 2 minutes"));
        assert!(html.contains("📨 Submit Feedback"));
        assert!(html.contains("meeting with Patrick?"));
        assert!(html.contains(r#"value="Somewhat helpful" checked"#));
        assert!(html.contains(r#"name="experience" min="1" max="5" step="1" value="4""#));
        assert!(!html.contains("banner success"));
    }

    #[test]
    fn test_host_page_heading() {
        let html = render_survey_page(
            &chrome(),
            &link("host"),
            &identity(),
            &SurveyResponse::defaults(SurveyVariant::Host),
            None,
        );

        assert!(html.contains("📝 Your Meeting Notes: Ada Lovelace"));
        assert!(html.contains("🏢 Analytical Engines"));
        assert!(html.contains("💾 Save Meeting Notes"));
        assert!(html.contains(r#"<option value="No follow-up needed" selected>"#));
    }

    #[test]
    fn test_host_page_without_company() {
        let html = render_survey_page(
            &chrome(),
            &link("host"),
            &ContactIdentity::default(),
            &SurveyResponse::defaults(SurveyVariant::Host),
            None,
        );
        assert!(!html.contains("🏢"));
    }

    #[test]
    fn test_submitted_values_are_kept() {
        let form = FormData::new(vec![
            ("topics".to_string(), "AI Solutions".to_string()),
            ("feedback".to_string(), "<b>great</b>".to_string()),
        ]);
        let response = SurveyResponse::from_form(SurveyVariant::Attendee, &form);
        let html = render_survey_page(
            &chrome(),
            &link("attendee"),
            &identity(),
            &response,
            Some(&Banner::Saved),
        );

        assert!(html.contains(r#"value="AI Solutions" checked"#));
        assert!(html.contains("&lt;b&gt;great&lt;/b&gt;</textarea>"));
        assert!(html.contains("✅ Thank you! Your feedback has been recorded."));
        assert!(html.contains("🌐 Visit Our Website"));
    }

    #[test]
    fn test_host_saved_banner() {
        let html = render_survey_page(
            &chrome(),
            &link("host"),
            &identity(),
            &SurveyResponse::defaults(SurveyVariant::Host),
            Some(&Banner::Saved),
        );
        assert!(html.contains("✅ Meeting notes saved to CRM!"));
        assert!(!html.contains("Visit Our Website"));
    }

    #[test]
    fn test_failed_banner_keeps_form() {
        let failure = SurveyFailure::SaveFailure {
            message: "HTTP 503".to_string(),
        };
        let html = render_survey_page(
            &chrome(),
            &link("attendee"),
            &identity(),
            &SurveyResponse::defaults(SurveyVariant::Attendee),
            Some(&Banner::Failed(failure)),
        );
        assert!(html.contains("❌ Error saving: HTTP 503"));
        assert!(html.contains("<form"));
    }

    #[test]
    fn test_contact_name_is_escaped() {
        let identity = ContactIdentity {
            first_name: Some("<script>".to_string()),
            ..ContactIdentity::default()
        };
        let html = render_survey_page(
            &chrome(),
            &link("host"),
            &identity,
            &SurveyResponse::defaults(SurveyVariant::Host),
            None,
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_missing_link_page_shows_support() {
        let html = render_failure_page(
            &chrome(),
            &SurveyFailure::MissingLinkParameter,
        );
        assert!(html.contains("Invalid survey link"));
        assert!(html.contains("support@metropointtech.com"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_not_found_page_has_no_support_hint() {
        let html = render_failure_page(&chrome(), &SurveyFailure::ContactNotFound);
        assert!(html.contains("Contact not found"));
        assert!(!html.contains("If you believe this is an error"));
    }

    #[test]
    fn test_footer() {
        let html = render_failure_page(&chrome(), &SurveyFailure::LoadFailure);
        assert!(html.contains("Metro Point Technology LLC | (239) 600-8159 | support@metropointtech.com"));
        assert!(html.contains(CONFIDENTIALITY_NOTE));
        assert!(html.contains("<title>Meeting Feedback | Metro Point Technology</title>"));
    }

    #[test]
    fn test_static_image_header() {
        assert!(chrome().logo().starts_with(r#"<img src="https://metropointtech.com/logo-animated.svg""#));
    }

    #[test]
    fn test_inline_svg_header() {
        let path = std::env::temp_dir().join(format!("meetsurvey_logo_{}.svg", std::process::id()));
        std::fs::write(&path, "<svg><circle r=\"4\"/></svg>").unwrap();

        let branding = BrandingConfig {
            header_style: HeaderStyle::InlineSvg,
            logo_svg_path: Some(path.clone()),
            ..BrandingConfig::default()
        };
        let chrome = PageChrome::load(branding);
        let _ = std::fs::remove_file(&path);

        // The file is gone; pages keep the markup read at load time.
        assert_eq!(chrome.logo(), "<svg><circle r=\"4\"/></svg>");
        let html = render_failure_page(&chrome, &SurveyFailure::LoadFailure);
        assert!(html.contains("<svg><circle r=\"4\"/></svg>"));
    }

    #[test]
    fn test_inline_svg_falls_back_to_image() {
        let branding = BrandingConfig {
            header_style: HeaderStyle::InlineSvg,
            logo_svg_path: Some(PathBuf::from("/nonexistent/logo.svg")),
            ..BrandingConfig::default()
        };
        assert!(PageChrome::load(branding).logo().starts_with("<img"));
    }
}
