//! Generation collaborator integration.
//!
//! Supports:
//! - **Gemini**: Generative Language REST API via reqwest
//! - **Canned**: a fixed response, for offline runs
//!
//! The collaborator is untrusted. Its output goes through `decode_draft` and
//! then the pipeline; nothing it returns reaches the user unprocessed.

pub mod decode;
pub mod gemini;
pub mod prompt;
pub mod provider;

pub use decode::{DecodeSource, DecodedDraft, decode_draft};
pub use gemini::GeminiGenerator;
pub use prompt::{GenerationPrompt, build_generation_prompt, build_salutation};
pub use provider::{CannedGenerator, DraftGenerator};

use std::sync::Arc;

use crate::config::GeneratorConfig;
use crate::error::ConfigError;

/// Create the live generator from configuration. Requires an API key.
pub fn create_generator(config: &GeneratorConfig) -> Result<Arc<dyn DraftGenerator>, ConfigError> {
    let api_key = config.require_api_key()?.clone();
    tracing::info!("Using Gemini (model: {})", config.model);
    Ok(Arc::new(GeminiGenerator::new(config, api_key)))
}
