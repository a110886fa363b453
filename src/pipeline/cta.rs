//! Call-to-action policy engine.
//!
//! Decides whether a CTA is appended, renders the chosen phrasing, and adds a
//! support/contact sentence to apology and status emails that go out without
//! one. The engine only ever appends to the body.

use serde::Serialize;
use tracing::debug;

use crate::pipeline::rules::{capitalize_first, rules_for};
use crate::pipeline::types::{CtaTemplate, PolicyConfig, VariableKey};

/// What the CTA stage did to the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CtaOutcome {
    /// A CTA sentence from this template was appended.
    Appended { template: CtaTemplate },
    /// A CTA was required but the body already had one.
    AlreadyPresent,
    /// No CTA (not requested or forbidden by purpose); a support sentence was appended.
    SupportFallback,
    /// Nothing was appended.
    None,
}

impl CtaOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Appended { .. } => "appended",
            Self::AlreadyPresent => "already_present",
            Self::SupportFallback => "support_fallback",
            Self::None => "none",
        }
    }
}

/// Does the body already contain a CTA for the policy's locale?
pub fn has_cta(body: &str, policy: &PolicyConfig) -> bool {
    rules_for(policy.locale).has_cta(body)
}

/// Should a CTA sentence be appended to this body?
///
/// Purpose suppression wins over `require_cta`; an existing CTA is never doubled.
pub fn should_append_cta(body: &str, policy: &PolicyConfig) -> bool {
    if policy.purpose.forbids_cta() {
        return false;
    }
    if has_cta(body, policy) {
        return false;
    }
    policy.require_cta
}

/// Render the CTA sentence for the policy's template, locale and audience.
pub fn cta_text(policy: &PolicyConfig) -> String {
    let phrases = &rules_for(policy.locale).cta;
    let link = policy.variables.get(VariableKey::MeetingLink);

    let template = match (policy.cta_template, link) {
        (CtaTemplate::ScheduleDemo, _) => phrases.schedule_demo,
        (CtaTemplate::ConfirmReply, _) => phrases.confirm_reply,
        (CtaTemplate::FillForm, Some(_)) => phrases.fill_form_link,
        (CtaTemplate::FillForm, None) => phrases.fill_form,
        (CtaTemplate::DownloadAsset, Some(_)) => phrases.download_link,
        (CtaTemplate::DownloadAsset, None) => phrases.download,
    };

    let text = template
        .replace("{pronoun}", phrases.pronoun(policy.audience))
        .replace("{link}", link.unwrap_or(""));
    capitalize_first(&text)
}

/// Support sentence for apology/status emails, with the hotline if known.
pub fn support_fallback_text(policy: &PolicyConfig) -> String {
    let rules = rules_for(policy.locale);
    match policy.variables.get(VariableKey::Hotline) {
        Some(hotline) => rules.support_with_hotline.replace("{hotline}", hotline),
        None => rules.support_generic.to_string(),
    }
}

/// Run the CTA stage once: decide, then append at most one sentence.
pub fn apply_cta(body: &str, policy: &PolicyConfig) -> (String, CtaOutcome) {
    let rules = rules_for(policy.locale);

    if policy.effective_require_cta() {
        if !should_append_cta(body, policy) {
            debug!(purpose = policy.purpose.label(), "Body already has a CTA");
            return (body.to_string(), CtaOutcome::AlreadyPresent);
        }
        let sentence = cta_text(policy);
        debug!(
            template = policy.cta_template.label(),
            "Appending CTA sentence"
        );
        return (
            append_paragraph(body, &sentence),
            CtaOutcome::Appended {
                template: policy.cta_template,
            },
        );
    }

    if policy.purpose.wants_support_fallback() && !rules.contact_offer.is_match(body) {
        debug!(purpose = policy.purpose.label(), "Appending support fallback");
        let sentence = support_fallback_text(policy);
        return (append_paragraph(body, &sentence), CtaOutcome::SupportFallback);
    }

    (body.to_string(), CtaOutcome::None)
}

/// Append `paragraph` after a blank line (or as the whole body if empty).
pub(crate) fn append_paragraph(body: &str, paragraph: &str) -> String {
    let body = body.trim_end();
    if body.is_empty() {
        paragraph.to_string()
    } else {
        format!("{body}\n\n{paragraph}")
    }
}
