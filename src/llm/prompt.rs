//! Instruction prompt sent to the generation service.

use crate::pipeline::rules::rules_for;
use crate::pipeline::subject::MAX_VARIANT_CHARS;
use crate::pipeline::types::{Locale, Purpose, Variables};

/// Everything the service is told about the draft it should write.
#[derive(Debug, Clone)]
pub struct GenerationPrompt<'a> {
    pub purpose: Purpose,
    pub tone: &'a str,
    pub locale: Locale,
    pub recipient: Option<&'a str>,
    /// Free-text details with variables already interpolated.
    pub details: &'a str,
    /// Canonical signature block.
    pub signature: &'a str,
    pub word_target: u32,
    pub require_cta: bool,
    /// Exact opening line, or empty.
    pub salutation: &'a str,
    pub variables: &'a Variables,
}

/// Opening greeting for the recipient in the locale's form; empty without a recipient.
pub fn build_salutation(recipient: Option<&str>, locale: Locale) -> String {
    rules_for(locale).greeting_for(recipient.unwrap_or(""))
}

/// Render the instruction document demanding strict `{"subject", "body"}` JSON.
pub fn build_generation_prompt(input: &GenerationPrompt<'_>) -> String {
    let cta_rule = if input.require_cta {
        "Include a clear call-to-action at the end."
    } else {
        "Do not include a call-to-action."
    };
    let recipient = input
        .recipient
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or("N/A");
    let details = match input.details.trim() {
        "" => "N/A",
        d => d,
    };

    let mut prompt = format!(
        "You are an assistant that writes concise, professional business emails.\n\
         Return STRICT JSON only. No markdown, no explanations, no code fences.\n\
         \n\
         Constraints (non-negotiable):\n\
         - Language: {language}\n\
         - Tone: {tone}\n\
         - Subject line ≤ {max_subject} characters\n\
         - Body around {words} words\n\
         - Use the provided recipient if available; otherwise keep it natural\n\
         - {cta_rule}\n\
         - The body MUST end with the signature below.\n\
         - Start the body with this exact salutation line (if non-empty): \"{salutation}\"\n\
         - Do NOT use placeholders like [Link...] or [form...]. Use actual values from variables if available.\n\
         \n\
         Context:\n\
         - Purpose: {purpose}\n\
         - Recipient: {recipient}\n\
         - Details: {details}\n\
         - Signature: {signature}",
        language = input.locale.language_name(),
        tone = input.tone,
        max_subject = MAX_VARIANT_CHARS,
        words = input.word_target,
        salutation = input.salutation,
        purpose = input.purpose.label(),
        signature = input.signature,
    );

    let present = input.variables.present();
    if !present.is_empty() {
        prompt.push_str("\nAvailable variables:");
        for (key, value) in present {
            prompt.push_str(&format!("\n- {}: {value}", key.prompt_label()));
        }
    }

    prompt.push_str(
        "\n\nReturn EXACTLY this JSON shape:\n\
         {\"subject\": \"<one line>\", \"body\": \"<multi-line email body ending with the signature>\"}",
    );
    prompt
}
