//! Draft processor. Runs a raw model draft through every policy stage.
//!
//! **Core invariant: every draft that leaves here satisfies the policy.**
//! The processor is total: empty or garbage drafts still produce a valid
//! final draft.
//!
//! Stage order is fixed:
//! 1. Trim pleasantries
//! 2. Strip duplicate signatures (against the canonical signature)
//! 3. Tune audience register
//! 4. CTA decision + append (or support fallback)
//! 5. Placeholder / whitespace cleanup
//! 6. Append the canonical signature if it is not already at the end
//! 7. Soften claims (covers CTA sentences too)
//! 8. Resolve the subject and build alternatives
//!
//! Cleanup must follow CTA insertion, and the signature must be appended only
//! after duplicates are gone.

use serde::Serialize;
use tracing::{debug, info};

use crate::pipeline::cta::{CtaOutcome, append_paragraph, apply_cta};
use crate::pipeline::interpolate::interpolate;
use crate::pipeline::sanitizer::{
    remove_placeholders, soften_claims, trim_pleasantries, tune_audience,
};
use crate::pipeline::signature::{Signature, dedupe_signature};
use crate::pipeline::subject::{resolve_subject, subject_variants};
use crate::pipeline::types::{FinalDraft, PolicyConfig, RawDraft};

/// Result of running a draft through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedDraft {
    /// The compliant draft.
    pub draft: FinalDraft,
    /// Ranked alternative subjects, resolved subject first when it is not generic.
    pub subject_alternatives: Vec<String>,
    /// The model's subject was unusable and a fallback phrase was used.
    pub subject_fallback: bool,
    /// What the CTA stage did.
    pub cta: CtaOutcome,
}

impl ProcessedDraft {
    /// Swap in one of the alternative subjects by index. Out-of-range keeps the current one.
    pub fn pick_subject(mut self, index: usize) -> Self {
        if let Some(choice) = self.subject_alternatives.get(index).cloned() {
            self.draft = self.draft.with_subject(choice);
        }
        self
    }
}

/// Runs drafts through the policy pipeline for one request's policy.
#[derive(Debug, Clone)]
pub struct DraftProcessor {
    policy: PolicyConfig,
    signature: Signature,
}

impl DraftProcessor {
    /// Create a processor; the canonical signature is computed once here.
    pub fn new(policy: PolicyConfig) -> Self {
        let signature = Signature::from_raw(&policy.signature_raw, policy.locale);
        Self { policy, signature }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Fill `{{variable}}` tokens in free-text input from this policy's variables.
    pub fn interpolate(&self, text: &str) -> String {
        interpolate(text, &self.policy.variables)
    }

    /// Run every stage on a raw draft.
    pub fn process(&self, raw: &RawDraft) -> ProcessedDraft {
        let policy = &self.policy;
        let locale = policy.locale;

        let body = trim_pleasantries(&raw.body, locale);
        let body = dedupe_signature(&body, self.signature.canonical());
        let body = tune_audience(&body, policy.audience, locale);
        debug!(chars = body.chars().count(), "Draft body sanitized");

        let (body, cta) = apply_cta(&body, policy);
        let body = remove_placeholders(&body);
        let body = self.append_signature(&body);
        let body = soften_claims(&body, locale);

        let resolved = resolve_subject(&raw.subject, policy.purpose, locale);
        let subject_alternatives = subject_variants(&resolved.subject, policy.purpose, locale);

        info!(
            purpose = policy.purpose.label(),
            locale = locale.language_name(),
            cta = cta.label(),
            subject_fallback = resolved.used_fallback,
            "Draft processed"
        );

        ProcessedDraft {
            draft: FinalDraft {
                subject: resolved.subject,
                body,
            },
            subject_alternatives,
            subject_fallback: resolved.used_fallback,
            cta,
        }
    }

    fn append_signature(&self, body: &str) -> String {
        let canonical = self.signature.canonical();
        if canonical.is_empty() || body.trim_end().ends_with(canonical) {
            return body.to_string();
        }
        append_paragraph(body, canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{CtaTemplate, Locale, Purpose};

    #[test]
    fn signature_appended_once_at_end() {
        let policy = PolicyConfig::new(Purpose::Generic, Locale::En)
            .with_signature("Trân trọng,\nMai Tran");
        let processor = DraftProcessor::new(policy);
        let raw = RawDraft::new(
            "Notes from Monday",
            "Here are the notes.\n\nBest regards,\nMai Tran\n\nWarm regards,\nMai Tran",
        );
        let out = processor.process(&raw);
        assert_eq!(out.draft.body, "Here are the notes.\n\nBest regards,\nMai Tran");
    }

    #[test]
    fn signature_with_title_is_replaced_by_canonical() {
        let policy = PolicyConfig::new(Purpose::Generic, Locale::En)
            .with_signature("Best regards,\nPhuoc Doan");
        let raw = RawDraft::new(
            "Notes from Monday",
            "Here are the notes.\n\nBest regards,\nPhuoc Doan, Sales Lead",
        );
        let out = DraftProcessor::new(policy).process(&raw);
        assert_eq!(out.draft.body, "Here are the notes.\n\nBest regards,\nPhuoc Doan");
    }

    #[test]
    fn empty_signature_appends_nothing() {
        let processor = DraftProcessor::new(PolicyConfig::new(Purpose::Generic, Locale::En));
        let out = processor.process(&RawDraft::new("Quick note here", "Just a note."));
        assert_eq!(out.draft.body, "Just a note.");
    }

    #[test]
    fn empty_draft_still_produces_valid_output() {
        let policy = PolicyConfig::new(Purpose::SalesOutreach, Locale::Vi)
            .with_cta(true, CtaTemplate::ConfirmReply)
            .with_signature("An Nguyen");
        let out = DraftProcessor::new(policy).process(&RawDraft::default());
        assert!(out.subject_fallback);
        assert_eq!(out.draft.subject, "Mời demo giải pháp giúp tối ưu hiệu suất (15–20’)");
        assert_eq!(
            out.draft.body,
            "Quý vị vui lòng phản hồi email này để xác nhận giúp tôi nhé.\n\nTrân trọng,\nAn Nguyen"
        );
    }

    #[test]
    fn cta_sentences_are_softened_too() {
        // Softening runs last, after the CTA is appended.
        let policy = PolicyConfig::new(Purpose::SalesOutreach, Locale::En)
            .with_cta(true, CtaTemplate::ScheduleDemo);
        let out = DraftProcessor::new(policy)
            .process(&RawDraft::new("Faster month-end close", "We guarantee a faster close."));
        assert!(out.draft.body.starts_with("We aim to a faster close."));
        assert!(out.draft.body.ends_with("demo next week?"));
    }

    #[test]
    fn pick_subject_swaps_in_alternative() {
        let processor = DraftProcessor::new(PolicyConfig::new(Purpose::LeaveRequest, Locale::En));
        let out = processor.process(&RawDraft::new("Day off on Monday", "I'd like to take Monday off."));
        assert_eq!(out.subject_alternatives[0], "Day off on Monday");
        let picked = out.pick_subject(2);
        assert_eq!(picked.draft.subject, "Requesting one day off");
        let unchanged = picked.clone().pick_subject(99);
        assert_eq!(unchanged.draft.subject, "Requesting one day off");
    }

    #[test]
    fn interpolates_from_policy_variables() {
        use crate::pipeline::types::{VariableKey, Variables};
        let policy = PolicyConfig::new(Purpose::CustomerReply, Locale::En)
            .with_variables(Variables::default().with(VariableKey::OrderId, "A1"));
        let processor = DraftProcessor::new(policy);
        assert_eq!(processor.interpolate("Order {{order_id}}"), "Order A1");
    }
}
