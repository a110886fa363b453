//! Signature canonicalization and de-duplication.
//!
//! The canonical signature is `<Salutation>,\n<Name>`, with the salutation
//! taken from the target locale. The model often writes its own signature,
//! sometimes in the wrong language, so every copy of it is stripped from the
//! body before the canonical one is appended exactly once.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::pipeline::rules::{SALUTATION_TOKENS, rules_for};
use crate::pipeline::types::Locale;

static LEADING_SALUTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\A\s*{SALUTATION_TOKENS}[ \t]*,?\s*")).unwrap());

static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Canonical signature block, computed once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    canonical: String,
    name: String,
}

impl Signature {
    /// Build the canonical signature for a locale from raw user input.
    pub fn from_raw(raw: &str, locale: Locale) -> Self {
        let canonical = normalize_signature(raw, locale);
        let name = name_line(&canonical).to_string();
        Self { canonical, name }
    }

    /// The full block to append, or empty if the user gave no signature.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The trailing name line.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

/// Normalize a raw signature to the locale's salutation convention.
///
/// Any leading salutation (either locale, case-insensitive, optional comma)
/// is replaced by the target locale's. Empty input stays empty.
pub fn normalize_signature(raw: &str, locale: Locale) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let salutation = rules_for(locale).salutation;
    let rest = LEADING_SALUTATION.replace(trimmed, "");
    let name = rest
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .unwrap_or("");

    if name.is_empty() {
        format!("{salutation},")
    } else {
        format!("{salutation},\n{name}")
    }
}

/// Last non-empty line of a canonical signature, unless that line is the salutation itself.
fn name_line(canonical: &str) -> &str {
    let mut lines = canonical.lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.next();
    lines.last().or(first.filter(|l| !l.ends_with(','))).unwrap_or("")
}

/// Remove every signature occurrence for `canonical`'s name from `body`.
///
/// Matches `salutation, (newline)? name ...` blocks for all known salutations,
/// case-insensitively, plus lines holding nothing but the name. Mentions of
/// the name inside running text are left alone. The canonical block is appended later by the caller.
pub fn dedupe_signature(body: &str, canonical: &str) -> String {
    let name = name_line(canonical);
    if body.is_empty() || name.is_empty() {
        return body.to_string();
    }

    // After a salutation the name line may carry a title ("Phuoc Doan, Sales Lead").
    // On its own the line must be just the name.
    let escaped = regex::escape(name);
    let pattern = format!(
        r"(?im)^[ \t]*(?:{SALUTATION_TOKENS}[ \t]*,?[ \t]*(?:\r?\n[ \t]*)*{escaped}[^\r\n]*|{escaped}[ \t]*,?[ \t]*)\r?$\n?"
    );
    let signature_re = Regex::new(&pattern).unwrap();

    let stripped = signature_re.replace_all(body, "");
    if stripped.len() != body.len() {
        debug!(name, "Removed duplicate signature block(s) from draft");
    }

    let collapsed = EXCESS_BLANK_LINES.replace_all(&stripped, "\n\n");
    collapsed.trim_end().to_string()
}
