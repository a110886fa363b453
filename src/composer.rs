//! Email composer: request in, compliant draft out.
//!
//! Validates the request, prompts the generation collaborator, decodes its
//! response and runs the policy pipeline. The prompt and raw response are
//! kept alongside the result for inspection.

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::llm::{
    DecodeSource, DraftGenerator, GenerationPrompt, build_generation_prompt, build_salutation,
    decode_draft,
};
use crate::pipeline::{DraftProcessor, ProcessedDraft};
use crate::request::DraftRequest;

/// Output of one compose run.
#[derive(Debug, Clone)]
pub struct Composition {
    pub processed: ProcessedDraft,
    /// Prompt sent to the generation service.
    pub prompt: String,
    /// Response text exactly as received.
    pub raw_response: String,
    pub decode_source: DecodeSource,
}

pub struct EmailComposer {
    generator: Arc<dyn DraftGenerator>,
}

impl EmailComposer {
    pub fn new(generator: Arc<dyn DraftGenerator>) -> Self {
        Self { generator }
    }

    /// Build the processor and the generation prompt for a request.
    ///
    /// Fails only on missing required input.
    pub fn prepare(&self, request: &DraftRequest) -> Result<(DraftProcessor, String)> {
        request.validate()?;

        let processor = DraftProcessor::new(request.policy());
        let details = processor.interpolate(&request.details);
        let recipient = request.recipient.as_deref();
        let salutation = build_salutation(recipient, request.locale);

        let prompt = build_generation_prompt(&GenerationPrompt {
            purpose: request.purpose,
            tone: request.tone.label(),
            locale: request.locale,
            recipient,
            details: &details,
            signature: processor.signature().canonical(),
            word_target: request.length.word_target(),
            require_cta: processor.policy().effective_require_cta(),
            salutation: &salutation,
            variables: &request.variables,
        });
        Ok((processor, prompt))
    }

    /// Generate and normalize one draft.
    pub async fn compose(&self, request: &DraftRequest) -> Result<Composition> {
        let (processor, prompt) = self.prepare(request)?;

        let raw_response = self
            .generator
            .generate(&prompt, request.tone.temperature())
            .await?;
        let decoded = decode_draft(&raw_response);
        let processed = processor.process(&decoded.draft);

        info!(
            model = self.generator.model_name(),
            source = ?decoded.source,
            subject_chars = processed.draft.subject.chars().count(),
            "Draft composed"
        );

        Ok(Composition {
            processed,
            prompt,
            raw_response,
            decode_source: decoded.source,
        })
    }
}
