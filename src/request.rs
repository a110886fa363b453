//! Draft requests: what the user asks for, before generation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::pipeline::types::{Audience, CtaTemplate, Locale, PolicyConfig, Purpose, Variables};

/// Default signature for presets.
pub const DEFAULT_SIGNATURE: &str = "Best regards,\nPhuoc Doan";

/// Writing tone. Selects the sampling temperature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Formal,
    Friendly,
    Apologetic,
    Neutral,
}

impl Tone {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Formal => "Formal",
            Self::Friendly => "Friendly",
            Self::Apologetic => "Apologetic",
            Self::Neutral => "Neutral",
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            Self::Formal => 0.4,
            Self::Friendly => 0.7,
            Self::Apologetic => 0.5,
            Self::Neutral => 0.6,
        }
    }
}

/// Body length. Selects the word target given to the generation service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Detailed,
}

impl Length {
    pub fn word_target(&self) -> u32 {
        match self {
            Self::Short => 80,
            Self::Medium => 120,
            Self::Detailed => 160,
        }
    }
}

/// Named quick-start requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    SalesOutreach,
    CustomerApology,
    StatusUpdate,
    LeaveRequest,
}

/// One draft request, usually loaded from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRequest {
    pub purpose: Purpose,
    #[serde(default)]
    pub tone: Tone,
    pub locale: Locale,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default)]
    pub length: Length,
    #[serde(default)]
    pub recipient: Option<String>,
    /// Free-text details. Required; may contain `{{variable}}` tokens.
    #[serde(default)]
    pub details: String,
    /// Unset means "only for sales outreach".
    #[serde(default)]
    pub require_cta: Option<bool>,
    #[serde(default)]
    pub cta_template: CtaTemplate,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub variables: Variables,
}

impl DraftRequest {
    pub fn new(purpose: Purpose, locale: Locale, details: impl Into<String>) -> Self {
        Self {
            purpose,
            tone: Tone::default(),
            locale,
            audience: Audience::default(),
            length: Length::default(),
            recipient: None,
            details: details.into(),
            require_cta: None,
            cta_template: CtaTemplate::default(),
            signature: String::new(),
            variables: Variables::default(),
        }
    }

    /// Parse a request from JSON text.
    pub fn from_json(text: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a request from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, RequestError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Build one of the quick-start presets.
    pub fn preset(preset: Preset) -> Self {
        let (purpose, tone, locale, length, details) = match preset {
            Preset::SalesOutreach => (
                Purpose::SalesOutreach,
                Tone::Friendly,
                Locale::Vi,
                Length::Medium,
                "Giới thiệu phần mềm quản lý bán hàng giúp tiết kiệm thời gian; đề nghị demo 15–20 phút trong tuần tới.",
            ),
            Preset::CustomerApology => (
                Purpose::CustomerReply,
                Tone::Apologetic,
                Locale::Vi,
                Length::Short,
                "Xin lỗi khách hàng vì giao hàng trễ 2 ngày; tặng voucher 10% cho lần sau.",
            ),
            Preset::StatusUpdate => (
                Purpose::StatusUpdate,
                Tone::Formal,
                Locale::En,
                Length::Medium,
                "Milestone 1 done, Milestone 2 in QA, Milestone 3 expected by Friday.",
            ),
            Preset::LeaveRequest => (
                Purpose::LeaveRequest,
                Tone::Formal,
                Locale::Vi,
                Length::Short,
                "Xin nghỉ 1 ngày Thứ Hai tuần tới vì lý do cá nhân; đã bàn giao công việc.",
            ),
        };
        Self {
            tone,
            length,
            signature: DEFAULT_SIGNATURE.to_string(),
            ..Self::new(purpose, locale, details)
        }
    }

    /// Details must be present before anything is generated.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.details.trim().is_empty() {
            return Err(RequestError::MissingInput {
                field: "details".into(),
            });
        }
        Ok(())
    }

    /// Whether the user asked for a CTA, defaulting by purpose.
    pub fn require_cta(&self) -> bool {
        self.require_cta
            .unwrap_or(self.purpose == Purpose::SalesOutreach)
    }

    /// The immutable policy the pipeline runs under.
    pub fn policy(&self) -> PolicyConfig {
        PolicyConfig::new(self.purpose, self.locale)
            .with_audience(self.audience)
            .with_cta(self.require_cta(), self.cta_template)
            .with_signature(self.signature.clone())
            .with_variables(self.variables.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::pipeline::types::VariableKey;

    #[test]
    fn parses_minimal_request() {
        let request =
            DraftRequest::from_json(r#"{"purpose": "status_update", "locale": "en", "details": "QA done"}"#)
                .unwrap();
        assert_eq!(request.tone, Tone::Formal);
        assert_eq!(request.length, Length::Medium);
        assert_eq!(request.audience, Audience::B2b);
        assert!(!request.require_cta());
    }

    #[test]
    fn sales_outreach_requires_cta_by_default() {
        let request = DraftRequest::new(Purpose::SalesOutreach, Locale::En, "Intro");
        assert!(request.require_cta());
        let request = DraftRequest {
            require_cta: Some(false),
            ..request
        };
        assert!(!request.require_cta());
    }

    #[test]
    fn empty_details_rejected() {
        let request = DraftRequest::new(Purpose::Generic, Locale::En, " \n ");
        assert!(matches!(
            request.validate(),
            Err(RequestError::MissingInput { field }) if field == "details"
        ));
        assert!(DraftRequest::new(Purpose::Generic, Locale::En, "x").validate().is_ok());
    }

    #[test]
    fn tone_and_length_mappings() {
        assert_eq!(Tone::Formal.temperature(), 0.4);
        assert_eq!(Tone::Friendly.temperature(), 0.7);
        assert_eq!(Tone::Apologetic.temperature(), 0.5);
        assert_eq!(Tone::Neutral.temperature(), 0.6);
        assert_eq!(Length::Short.word_target(), 80);
        assert_eq!(Length::Detailed.word_target(), 160);
    }

    #[test]
    fn policy_mirrors_request() {
        let request = DraftRequest {
            audience: Audience::B2c,
            cta_template: CtaTemplate::FillForm,
            signature: "An".into(),
            variables: Variables::default().with(VariableKey::MeetingLink, "https://x.co/f"),
            ..DraftRequest::new(Purpose::SalesOutreach, Locale::En, "Intro")
        };
        let policy = request.policy();
        assert_eq!(policy.audience, Audience::B2c);
        assert!(policy.require_cta);
        assert_eq!(policy.cta_template, CtaTemplate::FillForm);
        assert_eq!(policy.signature_raw, "An");
        assert_eq!(
            policy.variables.get(VariableKey::MeetingLink),
            Some("https://x.co/f")
        );
    }

    #[test]
    fn presets_are_valid() {
        for preset in [
            Preset::SalesOutreach,
            Preset::CustomerApology,
            Preset::StatusUpdate,
            Preset::LeaveRequest,
        ] {
            let request = DraftRequest::preset(preset);
            assert!(request.validate().is_ok());
            assert_eq!(request.signature, DEFAULT_SIGNATURE);
        }
        let apology = DraftRequest::preset(Preset::CustomerApology);
        assert_eq!(apology.purpose, Purpose::CustomerReply);
        assert_eq!(apology.tone, Tone::Apologetic);
        assert_eq!(apology.length, Length::Short);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "purpose": "sales_outreach",
                "tone": "friendly",
                "locale": "vi",
                "audience": "b2c",
                "recipient": "chị Lan",
                "details": "Demo {{{{order_id}}}}",
                "cta_template": "download_asset",
                "signature": "Best regards,\nAn",
                "variables": {{ "orderId": "A1" }}
            }}"#
        )
        .unwrap();

        let request = DraftRequest::from_path(file.path()).unwrap();
        assert_eq!(request.locale, Locale::Vi);
        assert_eq!(request.tone, Tone::Friendly);
        assert_eq!(request.recipient.as_deref(), Some("chị Lan"));
        assert_eq!(request.details, "Demo {{order_id}}");
        assert_eq!(request.cta_template, CtaTemplate::DownloadAsset);
        assert_eq!(request.variables.get(VariableKey::OrderId), Some("A1"));
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DraftRequest::from_path(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, RequestError::Io(_)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = DraftRequest::from_json("{ nope").unwrap_err();
        assert!(matches!(err, RequestError::Parse(_)));
    }
}
