//! Subject resolution and alternative subject suggestions.
//!
//! Lengths are counted in characters (Unicode scalar values), not bytes,
//! so Vietnamese subjects are bounded the same way English ones are.

use crate::pipeline::rules::{SENTINEL_SUBJECTS, rules_for};
use crate::pipeline::types::{Locale, Purpose};

/// Hard upper bound for the final subject.
pub const MAX_SUBJECT_CHARS: usize = 70;

/// Upper bound for each suggested alternative.
pub const MAX_VARIANT_CHARS: usize = 60;

/// Maximum number of alternatives offered.
pub const MAX_VARIANTS: usize = 5;

/// Subjects shorter than this are treated as missing.
pub const MIN_SUBJECT_CHARS: usize = 5;

const ELLIPSIS: &str = "...";

/// Resolved subject plus whether the fallback phrase was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSubject {
    pub subject: String,
    pub used_fallback: bool,
}

/// Is this one of the "model gave us nothing" placeholder subjects?
pub fn is_sentinel(subject: &str) -> bool {
    let lowered = subject.trim().to_lowercase();
    SENTINEL_SUBJECTS.contains(&lowered.as_str())
}

/// Cut to `max` characters, ending in "..." when shortened.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Validate the model's subject, falling back to a locale/purpose phrase.
pub fn resolve_subject(raw: &str, purpose: Purpose, locale: Locale) -> ResolvedSubject {
    let trimmed = raw.trim();
    let unusable =
        trimmed.is_empty() || is_sentinel(trimmed) || trimmed.chars().count() < MIN_SUBJECT_CHARS;

    let (subject, used_fallback) = if unusable {
        (rules_for(locale).subject_entry(purpose).fallback, true)
    } else {
        (trimmed, false)
    };

    ResolvedSubject {
        subject: truncate_with_ellipsis(subject, MAX_SUBJECT_CHARS),
        used_fallback,
    }
}

/// Ranked subject alternatives: the base subject first (unless generic),
/// then canned phrases for the purpose. Unique, bounded, at most five.
pub fn subject_variants(base: &str, purpose: Purpose, locale: Locale) -> Vec<String> {
    let base = base.trim();
    let entry = rules_for(locale).subject_entry(purpose);

    let leading = (!base.is_empty() && !is_sentinel(base)).then_some(base);
    let candidates = leading.into_iter().chain(entry.variants.iter().copied());

    let mut variants: Vec<String> = Vec::with_capacity(MAX_VARIANTS);
    for candidate in candidates {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            continue;
        }
        let candidate = truncate_with_ellipsis(candidate, MAX_VARIANT_CHARS);
        if !variants.contains(&candidate) {
            variants.push(candidate);
        }
        if variants.len() == MAX_VARIANTS {
            break;
        }
    }
    variants
}
