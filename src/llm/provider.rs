//! Generation collaborator trait.

use async_trait::async_trait;

use crate::error::GenerationError;

/// Produces raw draft text from an instruction prompt.
///
/// Implementations return the service's text as-is; decoding and every
/// policy rule are applied afterwards by the caller.
#[async_trait]
pub trait DraftGenerator: Send + Sync {
    /// Model identifier, for logging.
    fn model_name(&self) -> &str;

    /// Generate a response for `prompt` at the given sampling temperature.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError>;
}

/// Returns a fixed response. Used for offline runs with a saved response.
#[derive(Debug, Clone)]
pub struct CannedGenerator {
    response: String,
}

impl CannedGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl DraftGenerator for CannedGenerator {
    fn model_name(&self) -> &str {
        "canned"
    }

    async fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String, GenerationError> {
        Ok(self.response.clone())
    }
}
