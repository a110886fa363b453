//! Shared types for the draft pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Policy enums ────────────────────────────────────────────────────

/// What the email is for. Drives CTA policy and subject phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    SalesOutreach,
    CustomerReply,
    StatusUpdate,
    LeaveRequest,
    EventInvitation,
    FeedbackRequest,
    PartnershipInquiry,
    Generic,
}

impl Purpose {
    /// Short label for logging and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SalesOutreach => "Sales outreach",
            Self::CustomerReply => "Customer reply",
            Self::StatusUpdate => "Status update",
            Self::LeaveRequest => "Leave request",
            Self::EventInvitation => "Event invitation",
            Self::FeedbackRequest => "Feedback request",
            Self::PartnershipInquiry => "Partnership inquiry",
            Self::Generic => "Generic business email",
        }
    }

    /// Purposes that must never carry a call-to-action.
    pub fn forbids_cta(&self) -> bool {
        matches!(self, Self::LeaveRequest)
    }

    /// Purposes that get a support/contact sentence when no CTA is added.
    pub fn wants_support_fallback(&self) -> bool {
        matches!(self, Self::CustomerReply | Self::StatusUpdate)
    }
}

/// Output language. Indexes the locale rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[serde(alias = "english", alias = "EN")]
    En,
    #[serde(alias = "vietnamese", alias = "VI")]
    Vi,
}

impl Locale {
    /// All supported locales, in rule-table order.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Vi];

    /// Position of this locale's entry in the rule table.
    pub fn index(&self) -> usize {
        match self {
            Self::En => 0,
            Self::Vi => 1,
        }
    }

    /// Language name as given to the generation service.
    pub fn language_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Vi => "Vietnamese",
        }
    }
}

/// Recipient register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    #[serde(alias = "B2B")]
    B2b,
    #[serde(alias = "B2C")]
    B2c,
}

/// Which call-to-action phrasing to append.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaTemplate {
    #[default]
    ScheduleDemo,
    ConfirmReply,
    FillForm,
    DownloadAsset,
}

impl CtaTemplate {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ScheduleDemo => "schedule_demo",
            Self::ConfirmReply => "confirm_reply",
            Self::FillForm => "fill_form",
            Self::DownloadAsset => "download_asset",
        }
    }
}

// ── Variables ───────────────────────────────────────────────────────

/// Recognized `{{token}}` variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKey {
    OrderId,
    DeliveryDate,
    Hotline,
    MeetingLink,
}

impl VariableKey {
    pub const ALL: [VariableKey; 4] = [
        VariableKey::OrderId,
        VariableKey::DeliveryDate,
        VariableKey::Hotline,
        VariableKey::MeetingLink,
    ];

    /// Identifier used inside `{{...}}`.
    pub fn token(&self) -> &'static str {
        match self {
            Self::OrderId => "order_id",
            Self::DeliveryDate => "delivery_date",
            Self::Hotline => "hotline",
            Self::MeetingLink => "meeting_link",
        }
    }

    /// Human-readable name used in the generation prompt.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Self::OrderId => "Order ID",
            Self::DeliveryDate => "Delivery date",
            Self::Hotline => "Hotline",
            Self::MeetingLink => "Meeting/Form link",
        }
    }

    /// Look up a recognized identifier. Anything else (including the reserved
    /// `_cta_template` key) is not a variable.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.token() == token)
    }
}

/// Per-request variable values. Blank values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variables {
    #[serde(default, alias = "orderId", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, alias = "deliveryDate", skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotline: Option<String>,
    #[serde(default, alias = "meetingLink", skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
}

impl Variables {
    /// Set a variable (builder style). Values are trimmed.
    pub fn with(mut self, key: VariableKey, value: impl Into<String>) -> Self {
        let value = value.into().trim().to_string();
        let slot = match key {
            VariableKey::OrderId => &mut self.order_id,
            VariableKey::DeliveryDate => &mut self.delivery_date,
            VariableKey::Hotline => &mut self.hotline,
            VariableKey::MeetingLink => &mut self.meeting_link,
        };
        *slot = Some(value);
        self
    }

    /// Value of a variable, or `None` if unset or blank.
    pub fn get(&self, key: VariableKey) -> Option<&str> {
        let value = match key {
            VariableKey::OrderId => &self.order_id,
            VariableKey::DeliveryDate => &self.delivery_date,
            VariableKey::Hotline => &self.hotline,
            VariableKey::MeetingLink => &self.meeting_link,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Variables that carry a value, in declaration order.
    pub fn present(&self) -> Vec<(VariableKey, &str)> {
        VariableKey::ALL
            .into_iter()
            .filter_map(|k| self.get(k).map(|v| (k, v)))
            .collect()
    }
}

// ── Policy ──────────────────────────────────────────────────────────

/// Immutable per-request policy. The pipeline reads nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub purpose: Purpose,
    pub locale: Locale,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default)]
    pub require_cta: bool,
    #[serde(default)]
    pub cta_template: CtaTemplate,
    #[serde(default)]
    pub signature_raw: String,
    #[serde(default)]
    pub variables: Variables,
}

impl PolicyConfig {
    /// Policy with defaults for everything but purpose and locale.
    pub fn new(purpose: Purpose, locale: Locale) -> Self {
        Self {
            purpose,
            locale,
            audience: Audience::default(),
            require_cta: false,
            cta_template: CtaTemplate::default(),
            signature_raw: String::new(),
            variables: Variables::default(),
        }
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_cta(mut self, require: bool, template: CtaTemplate) -> Self {
        self.require_cta = require;
        self.cta_template = template;
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature_raw = signature.into();
        self
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// CTA requirement after purpose precedence. Purpose suppression wins.
    pub fn effective_require_cta(&self) -> bool {
        self.require_cta && !self.purpose.forbids_cta()
    }
}

// ── Drafts ──────────────────────────────────────────────────────────

/// Untrusted draft as returned by the generation collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDraft {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl RawDraft {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Policy-compliant draft produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalDraft {
    pub subject: String,
    pub body: String,
}

impl FinalDraft {
    /// Replace the subject (e.g. with a picked alternative).
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Plain-text download form: `Subject: {subject}\n\n{body}`.
    pub fn to_artifact(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FinalDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subject: {}\n\n{}", self.subject, self.body)
    }
}
