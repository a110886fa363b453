//! Body sanitizer: pleasantry trimming, audience tuning, placeholder removal
//! and claim softening.
//!
//! All functions are pure `&str -> String` transforms. Locale-specific
//! behavior comes from the rule tables, never from branches here.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::pipeline::rules::rules_for;
use crate::pipeline::types::{Audience, Locale};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\[[^\]\n]*\]").unwrap());

static EMPTY_LINK_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:here|tại đây)[ \t]*:[ \t]*\.[ \t]*").unwrap());

static DANGLING_LINK_INTRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)\b(?:here|tại đây)[ \t]*:[ \t]*$(?P<next>\r?\n[ \t]*(?:https?://|www\.))?")
        .unwrap()
});

static TRAILING_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)[ \t]+\r?$").unwrap());

static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strip trailing spaces, collapse runs of blank lines to one, trim the ends.
pub fn tidy_whitespace(text: &str) -> String {
    let trimmed = TRAILING_SPACE.replace_all(text, "");
    EXCESS_BLANK_LINES
        .replace_all(&trimmed, "\n\n")
        .trim()
        .to_string()
}

/// Remove greeting/closing boilerplate sentences. Each pattern is applied once.
pub fn trim_pleasantries(body: &str, locale: Locale) -> String {
    if body.trim().is_empty() {
        return String::new();
    }
    let rules = rules_for(locale);
    let mut text = body.to_string();
    for rule in &rules.pleasantries {
        text = rule.apply(&text).into_owned();
    }
    tidy_whitespace(&text)
}

/// Light register substitution for B2B/B2C recipients.
pub fn tune_audience(body: &str, audience: Audience, locale: Locale) -> String {
    let mut text = body.to_string();
    for rule in rules_for(locale).audience_rules(audience) {
        text = rule.apply(&text).into_owned();
    }
    text
}

/// Remove `[...]` placeholders (with the spacing before them) and empty link
/// residue left behind by them.
///
/// Runs to a fixed point, so running it again on its own output is a no-op.
/// Every pass only deletes text, so a pass that changes anything shortens it
/// and the loop ends.
pub fn remove_placeholders(body: &str) -> String {
    let mut current = cleanup_pass(body);
    loop {
        let next = cleanup_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn cleanup_pass(text: &str) -> String {
    let text = PLACEHOLDER.replace_all(text, "");
    let text = EMPTY_LINK_DOT.replace_all(&text, "");
    let text = DANGLING_LINK_INTRO.replace_all(&text, |caps: &Captures<'_>| {
        // A link on the next line means the intro is not dangling.
        if caps.name("next").is_some() {
            caps[0].to_string()
        } else {
            String::new()
        }
    });
    tidy_whitespace(&text)
}

/// Hedge absolute claims. Each rule runs once, left to right.
pub fn soften_claims(body: &str, locale: Locale) -> String {
    let mut text = body.to_string();
    for rule in &rules_for(locale).softening {
        text = rule.apply(&text).into_owned();
    }
    text
}
