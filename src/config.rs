//! Configuration types.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default nucleus sampling value sent with every request.
pub const DEFAULT_TOP_P: f32 = 0.9;

/// Default Generative Language API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_VAR: &str = "GEMINI_API_KEY";
const MODEL_VAR: &str = "EMAIL_DRAFT_MODEL";
const TOP_P_VAR: &str = "EMAIL_DRAFT_TOP_P";
const ENDPOINT_VAR: &str = "EMAIL_DRAFT_ENDPOINT";

/// Generation service configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Only needed for live generation.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub top_p: f32,
    pub endpoint: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            top_p: DEFAULT_TOP_P,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let top_p = match get(TOP_P_VAR) {
            Some(raw) => parse_top_p(&raw)?,
            None => defaults.top_p,
        };

        Ok(Self {
            api_key: get(API_KEY_VAR).map(SecretString::from),
            model: get(MODEL_VAR).unwrap_or(defaults.model),
            top_p,
            endpoint: get(ENDPOINT_VAR).unwrap_or(defaults.endpoint),
        })
    }

    /// The API key, or an error naming the variable to set.
    pub fn require_api_key(&self) -> Result<&SecretString, ConfigError> {
        self.api_key
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar(API_KEY_VAR.to_string()))
    }
}

fn parse_top_p(raw: &str) -> Result<f32, ConfigError> {
    let value: f32 = raw.parse().map_err(|e| ConfigError::InvalidValue {
        key: TOP_P_VAR.to_string(),
        message: format!("{raw:?} is not a number: {e}"),
    })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidValue {
            key: TOP_P_VAR.to_string(),
            message: format!("{value} is outside 0.0..=1.0"),
        });
    }
    Ok(value)
}
