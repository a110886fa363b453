//! Gemini generation adapter over the Generative Language REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::llm::provider::DraftGenerator;

const PROVIDER: &str = "gemini";

/// Calls `models/{model}:generateContent` with one user turn.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    endpoint: String,
    top_p: f32,
}

impl GeminiGenerator {
    pub fn new(config: &GeneratorConfig, api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            top_p: config.top_p,
        }
    }

    fn api_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn request_body(&self, prompt: &str, temperature: f32) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": temperature,
                "topP": self.top_p
            }
        })
    }
}

#[async_trait]
impl DraftGenerator for GeminiGenerator {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError> {
        tracing::debug!(model = %self.model, temperature, "Calling Gemini generateContent");

        let resp = self
            .client
            .post(self.api_url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&self.request_body(prompt, temperature))
            .send()
            .await
            .map_err(|e| GenerationError::RequestFailed {
                provider: PROVIDER.into(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GenerationError::AuthFailed {
                provider: PROVIDER.into(),
            });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(GenerationError::RateLimited {
                provider: PROVIDER.into(),
                retry_after,
            });
        }
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(GenerationError::RequestFailed {
                provider: PROVIDER.into(),
                reason: format!("HTTP {status}: {detail}"),
            });
        }

        let payload: GenerateContentResponse = resp.json().await?;
        payload
            .text()
            .ok_or_else(|| GenerationError::InvalidResponse {
                provider: PROVIDER.into(),
                reason: "response has no candidate text".into(),
            })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate that has any.
    fn text(&self) -> Option<String> {
        self.candidates.iter().find_map(|candidate| {
            let parts = &candidate.content.as_ref()?.parts;
            let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
            (!text.trim().is_empty()).then(|| text.trim().to_string())
        })
    }
}
