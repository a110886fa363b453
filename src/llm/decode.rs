//! Best-effort decoding of the generation service's response.
//!
//! The service is asked for `{"subject": ..., "body": ...}` but does not
//! always comply. Recovery order:
//! 1. The whole response is the JSON object
//! 2. A JSON object inside extra text or a markdown fence
//! 3. The legacy `Subject: ...` / `Body:` plain-text layout
//! 4. The raw text as the body, with a sentinel subject
//!
//! Decoding never fails. `FormatError` only flows between the steps.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::FormatError;
use crate::pipeline::types::RawDraft;

/// Subject used when the response carries none. Recognized as a sentinel later.
pub const SENTINEL_SUBJECT: &str = "Generated Email";

/// Body used when the response is empty.
pub const EMPTY_BODY: &str = "No content";

static LABELED_SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^Subject:[ \t]*(.+)$").unwrap());

static LABELED_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ims)^Body:\s*(.*)\z").unwrap());

/// Which recovery step produced the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeSource {
    Json,
    Extracted,
    Labeled,
    RawText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDraft {
    pub draft: RawDraft,
    pub source: DecodeSource,
}

#[derive(Deserialize)]
struct DraftJson {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

/// Decode a response into a raw draft. Total.
pub fn decode_draft(text: &str) -> DecodedDraft {
    let trimmed = text.trim();

    let direct_err = match parse_draft_json(trimmed) {
        Ok(draft) => {
            return DecodedDraft {
                draft,
                source: DecodeSource::Json,
            };
        }
        Err(e) => e,
    };

    match extract_draft(trimmed) {
        Ok(draft) => {
            warn!(error = %direct_err, "Recovered draft JSON from surrounding text");
            return DecodedDraft {
                draft,
                source: DecodeSource::Extracted,
            };
        }
        Err(e) => warn!(error = %e, "Response has no usable draft JSON"),
    }

    if let Some(draft) = parse_labeled(trimmed) {
        return DecodedDraft {
            draft,
            source: DecodeSource::Labeled,
        };
    }

    let body = if trimmed.is_empty() { EMPTY_BODY } else { trimmed };
    DecodedDraft {
        draft: RawDraft::new(SENTINEL_SUBJECT, body),
        source: DecodeSource::RawText,
    }
}

fn parse_draft_json(text: &str) -> Result<RawDraft, FormatError> {
    let parsed: DraftJson = serde_json::from_str(text)?;
    Ok(RawDraft {
        subject: parsed.subject.unwrap_or_default(),
        body: parsed.body.unwrap_or_default(),
    })
}

fn extract_draft(text: &str) -> Result<RawDraft, FormatError> {
    let candidate = extract_json_object(text);
    if !candidate.starts_with('{') {
        return Err(FormatError::NoObject);
    }
    parse_draft_json(&candidate)
}

fn parse_labeled(text: &str) -> Option<RawDraft> {
    let subject = LABELED_SUBJECT
        .captures(text)
        .map(|c| c[1].trim().to_string());
    let body = LABELED_BODY.captures(text).map(|c| c[1].trim().to_string());

    if subject.is_none() && body.is_none() {
        return None;
    }
    Some(RawDraft {
        subject: subject.unwrap_or_else(|| SENTINEL_SUBJECT.to_string()),
        body: body.unwrap_or_else(|| text.to_string()),
    })
}

/// Extract a JSON object from text that might have surrounding prose or
/// markdown code fences.
fn extract_json_object(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return trimmed.to_string();
    }

    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim().to_string();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('{') {
                return inner.to_string();
            }
        }
    }

    // Outermost brace span
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && end > start
    {
        return trimmed[start..=end].to_string();
    }

    trimmed.to_string()
}
