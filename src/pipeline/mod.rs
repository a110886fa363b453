//! Draft normalization pipeline.
//!
//! Every raw draft from the generation service flows through:
//! 1. `trim_pleasantries`: strip greeting/closing boilerplate
//! 2. `dedupe_signature`: drop every model-written signature
//! 3. `tune_audience`: B2B/B2C register
//! 4. `apply_cta`: append one CTA, or a support sentence
//! 5. `remove_placeholders`: `[...]` and empty link residue
//! 6. Canonical signature appended once
//! 7. `soften_claims`: hedge absolute claims
//! 8. `resolve_subject` + `subject_variants`
//!
//! **The pipeline is total.** It never fails and never touches the network;
//! `DraftProcessor` is the entry point.

pub mod cta;
pub mod interpolate;
pub mod processor;
pub mod rules;
pub mod sanitizer;
pub mod signature;
pub mod subject;
pub mod types;

pub use processor::{DraftProcessor, ProcessedDraft};
pub use types::{
    Audience, CtaTemplate, FinalDraft, Locale, PolicyConfig, Purpose, RawDraft, VariableKey,
    Variables,
};
