//! Locale rule tables.
//!
//! Every locale-specific pattern and phrase the pipeline uses lives here:
//! - CTA detection patterns and CTA phrasing templates
//! - Salutation and greeting forms
//! - Pleasantry boilerplate to strip
//! - Audience register substitutions
//! - Claim-softening substitutions
//! - Subject fallbacks and canned subject variants per purpose
//!
//! Tables are built once on first use and are read-only afterwards. Adding a
//! locale means adding a `Locale` variant and one table entry here.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::pipeline::types::{Audience, Locale, Purpose};

/// Salutation tokens recognized in signatures, for any locale.
pub const SALUTATION_TOKENS: &str = r"(?:trân\s*trọng|best\s*regards?|warm\s*regards?)";

/// Sentinel subjects that mean "the model gave us nothing useful".
pub const SENTINEL_SUBJECTS: [&str; 2] = ["generated email", "subject"];

/// A regex rewrite. Matches where the `keep` group participates are left as-is.
#[derive(Debug)]
pub struct Substitution {
    pub pattern: Regex,
    /// Replacement template (`${1}` style group references allowed).
    pub replacement: &'static str,
}

impl Substitution {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    /// Apply once over the whole text, left to right, non-overlapping.
    ///
    /// A capitalized match gets a capitalized replacement. A match directly
    /// followed by an apostrophe is part of a contraction and is skipped.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(text, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let end = caps.get(0).map_or(0, |m| m.end());
            if caps.name("keep").is_some() || text[end..].starts_with(['\'', '’']) {
                return whole.to_string();
            }
            let mut out = String::new();
            caps.expand(self.replacement, &mut out);
            if whole.chars().next().is_some_and(char::is_uppercase) {
                capitalize_first(&out)
            } else {
                out
            }
        })
    }
}

/// Upper-case the first character, leave the rest alone.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// CTA phrasing templates. `{pronoun}` and `{link}` are filled in by the CTA engine.
#[derive(Debug)]
pub struct CtaPhrases {
    pub schedule_demo: &'static str,
    pub confirm_reply: &'static str,
    pub fill_form_link: &'static str,
    pub fill_form: &'static str,
    pub download_link: &'static str,
    pub download: &'static str,
    /// Formal plural address (B2B).
    pub pronoun_b2b: &'static str,
    /// Informal address (B2C).
    pub pronoun_b2c: &'static str,
}

impl CtaPhrases {
    pub fn pronoun(&self, audience: Audience) -> &'static str {
        match audience {
            Audience::B2b => self.pronoun_b2b,
            Audience::B2c => self.pronoun_b2c,
        }
    }

    /// Every template with sample values filled in.
    pub fn rendered_samples(&self) -> Vec<String> {
        let mut samples = Vec::new();
        for audience in [Audience::B2b, Audience::B2c] {
            for template in [
                self.schedule_demo,
                self.confirm_reply,
                self.fill_form_link,
                self.fill_form,
                self.download_link,
                self.download,
            ] {
                samples.push(
                    template
                        .replace("{pronoun}", self.pronoun(audience))
                        .replace("{link}", "https://example.com/x"),
                );
            }
        }
        samples
    }
}

/// Subject phrases for one purpose.
#[derive(Debug)]
pub struct SubjectEntry {
    pub purpose: Purpose,
    /// Used when the model's subject is missing or generic.
    pub fallback: &'static str,
    /// Canned alternatives offered alongside the resolved subject.
    pub variants: &'static [&'static str],
}

/// All rules for one locale.
#[derive(Debug)]
pub struct LocaleRules {
    pub locale: Locale,
    /// Closing salutation used in the canonical signature.
    pub salutation: &'static str,
    /// Opening greeting, `{name}` is the recipient.
    pub greeting: &'static str,
    /// Patterns that mean "this body already has a call-to-action".
    pub cta_patterns: Vec<Regex>,
    pub cta: CtaPhrases,
    /// Patterns that mean "this body already offers further contact".
    pub contact_offer: Regex,
    /// Support sentence with a `{hotline}` slot.
    pub support_with_hotline: &'static str,
    /// Support sentence when no hotline number is known.
    pub support_generic: &'static str,
    /// Greeting/closing boilerplate to strip.
    pub pleasantries: Vec<Substitution>,
    pub audience_b2b: Vec<Substitution>,
    pub audience_b2c: Vec<Substitution>,
    /// Absolute claims to hedged claims. No right-hand side may match its own pattern.
    pub softening: Vec<Substitution>,
    pub subjects: Vec<SubjectEntry>,
    /// Subject phrases for purposes without their own entry.
    pub generic_subject: SubjectEntry,
}

impl LocaleRules {
    /// Opening greeting for a recipient, or empty if there is none.
    pub fn greeting_for(&self, recipient: &str) -> String {
        let name = recipient.trim();
        if name.is_empty() {
            return String::new();
        }
        self.greeting.replace("{name}", name)
    }

    /// Does the body already contain a call-to-action?
    pub fn has_cta(&self, body: &str) -> bool {
        let lowered = body.to_lowercase();
        self.cta_patterns.iter().any(|p| p.is_match(&lowered))
    }

    pub fn audience_rules(&self, audience: Audience) -> &[Substitution] {
        match audience {
            Audience::B2b => &self.audience_b2b,
            Audience::B2c => &self.audience_b2c,
        }
    }

    /// Subject phrases for a purpose.
    pub fn subject_entry(&self, purpose: Purpose) -> &SubjectEntry {
        self.subjects
            .iter()
            .find(|e| e.purpose == purpose)
            .unwrap_or(&self.generic_subject)
    }
}

static LOCALE_RULES: LazyLock<[LocaleRules; 2]> =
    LazyLock::new(|| [english_rules(), vietnamese_rules()]);

/// Rule table for a locale.
pub fn rules_for(locale: Locale) -> &'static LocaleRules {
    &LOCALE_RULES[locale.index()]
}

fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources.iter().map(|p| Regex::new(p).unwrap()).collect()
}

fn english_rules() -> LocaleRules {
    LocaleRules {
        locale: Locale::En,
        salutation: "Best regards",
        greeting: "Dear {name},",
        cta_patterns: patterns(&[
            r"(?i)\b(?:fill out|fill in|form)\b",
            r"(?i)\b(?:schedule|book a call|demo|time that works)\b",
            r"(?i)\b(?:reply to|confirm)",
            r"(?i)\b(?:download|view the|brief deck)\b",
            r"(?i)please.*?register|register.*?here|\bsign up\b|click.*?link|visit.*?link",
            r"(?i)https?://|www\.",
        ]),
        cta: CtaPhrases {
            schedule_demo: "Would you be open to a quick 15–20 min demo next week?",
            confirm_reply: "Please reply to confirm at your convenience.",
            fill_form_link: "Could you fill out this short form so we can tailor the demo: {link}",
            fill_form: "Could you fill out this short form so we can tailor the demo?",
            download_link: "You can download our brief deck here: {link}",
            download: "You can download our brief deck.",
            pronoun_b2b: "you",
            pronoun_b2c: "you",
        },
        contact_offer: Regex::new(r"(?i)support|reach us|reply to this email").unwrap(),
        support_with_hotline: "If you need further support, please reply to this email or contact our hotline {hotline}.",
        support_generic: "If you need further support, please reply to this email or contact our hotline.",
        pleasantries: vec![
            Substitution::new(
                r"(?i)I hope (?:this (?:email|message|note) )?finds you well[.!]?[ \t]*",
                "",
            ),
            Substitution::new(
                r"(?i)(?:I )?hope you(?:['’]re| are) (?:doing )?well[.!]?[ \t]*",
                "",
            ),
            Substitution::new(
                r"(?i)I hope you will (?:continue|support|work)[^.\n]*\.[ \t]*",
                "",
            ),
            Substitution::new(r"(?i)Wishing you (?:a great|a wonderful)[^.!\n]*[.!][ \t]*", ""),
            Substitution::new(r"(?im)^[ \t]*I hope[^.\n]*\.[ \t]*", ""),
        ],
        audience_b2b: vec![Substitution::new(
            r"(?i)\b(?P<keep>thank you)\b|\byou\b",
            "your team",
        )],
        audience_b2c: vec![Substitution::new(r"(?i)\byour team\b", "you")],
        softening: vec![
            Substitution::new(
                r"(?i)\bup to\s*(\d+(?:[.,]\d+)?\s?%)",
                "we've seen up to around ${1} in some cases",
            ),
            Substitution::new(r"(?i)\bguarantee\b", "aim to"),
            Substitution::new(r"(?i)\b(?:a\s+)?cutting-edge solution\b", "a suitable solution"),
        ],
        subjects: vec![
            SubjectEntry {
                purpose: Purpose::SalesOutreach,
                fallback: "Quick 15–20’ demo to improve efficiency",
                variants: &[
                    "Quick 15–20’ demo request",
                    "Intro to our solution",
                    "Brief chat about your needs",
                ],
            },
            SubjectEntry {
                purpose: Purpose::CustomerReply,
                fallback: "Apology for your order – with a voucher",
                variants: &["Sincere apology for the delay", "Order update with a voucher"],
            },
            SubjectEntry {
                purpose: Purpose::StatusUpdate,
                fallback: "Project status update",
                variants: &["Project status update", "Milestone progress update"],
            },
            SubjectEntry {
                purpose: Purpose::LeaveRequest,
                fallback: "Leave request",
                variants: &["Leave request", "Requesting one day off"],
            },
            SubjectEntry {
                purpose: Purpose::EventInvitation,
                fallback: "Invitation to our upcoming event",
                variants: &["You're invited: upcoming event", "Save the date"],
            },
            SubjectEntry {
                purpose: Purpose::FeedbackRequest,
                fallback: "We'd value your feedback",
                variants: &["Quick feedback request", "How did we do?"],
            },
            SubjectEntry {
                purpose: Purpose::PartnershipInquiry,
                fallback: "Exploring a partnership",
                variants: &["Partnership opportunity", "Exploring ways to work together"],
            },
        ],
        generic_subject: SubjectEntry {
            purpose: Purpose::Generic,
            fallback: "Regarding our discussion",
            variants: &["Regarding our discussion", "Quick follow-up"],
        },
    }
}

fn vietnamese_rules() -> LocaleRules {
    LocaleRules {
        locale: Locale::Vi,
        salutation: "Trân trọng",
        greeting: "Kính gửi {name},",
        cta_patterns: patterns(&[
            r"(?i)điền form|điền biểu mẫu|điền vào|biểu mẫu ngắn gọn",
            r"(?i)đặt lịch|hẹn lịch|đặt hẹn|trao đổi.*?phút|thời gian phù hợp|cho tôi biết thời gian|lịch trình",
            r"(?i)phản hồi email|xác nhận",
            r"(?i)tải tài liệu|tải file|download|xem thêm",
            r"(?i)hãy đăng ký|đăng ký tại|đăng ký ngay|liên hệ.*?hotline|vui lòng liên hệ",
            r"(?i)https?://|www\.",
        ]),
        cta: CtaPhrases {
            schedule_demo: "{pronoun} có thể cho tôi biết thời gian phù hợp để trao đổi ngắn 15–20 phút không?",
            confirm_reply: "{pronoun} vui lòng phản hồi email này để xác nhận giúp tôi nhé.",
            fill_form_link: "{pronoun} có thể điền form tại đây để chúng tôi chuẩn bị nội dung phù hợp: {link}",
            fill_form: "{pronoun} có thể điền form để chúng tôi chuẩn bị nội dung phù hợp.",
            download_link: "{pronoun} có thể tải tài liệu giới thiệu tại đây: {link}",
            download: "{pronoun} có thể tải tài liệu giới thiệu của chúng tôi.",
            pronoun_b2b: "quý vị",
            pronoun_b2c: "anh/chị",
        },
        contact_offer: Regex::new(r"(?i)liên hệ|hỗ trợ|phản hồi email").unwrap(),
        support_with_hotline: "Nếu anh/chị cần hỗ trợ thêm, vui lòng phản hồi email này hoặc liên hệ hotline {hotline}.",
        support_generic: "Nếu anh/chị cần hỗ trợ thêm, vui lòng phản hồi email này hoặc liên hệ hotline.",
        pleasantries: vec![
            Substitution::new(
                r"(?i)Hy vọng (?:anh/chị|anh|chị|bạn|quý[^.\n]*?) (?:đã |sẽ )?có một ngày (?:tốt lành|hiệu quả)[^.!\n]*[.!]?[ \t]*",
                "",
            ),
            Substitution::new(
                r"(?i)Chúc (?:anh/chị|anh|chị|bạn|quý[^.\n]*?) (?:có một |một |thật )?(?:ngày|tuần|tháng) (?:tốt lành|hiệu quả|thành công|vui vẻ)[^.!\n]*[.!]?[ \t]*",
                "",
            ),
            Substitution::new(
                r"(?i)\A(?P<greeting>Kính gửi[^,\n]*,\s*)(?:Chúng tôi|Tôi|Bên tôi) hy vọng[^.\n]*\.[ \t]*",
                "${greeting}",
            ),
            Substitution::new(
                r"(?i)Hy vọng (?:anh/chị|anh|chị|bạn|quý[^.\n]*?) sẽ (?:tiếp tục|ủng hộ|hợp tác|phát triển)[^.\n]*\.[ \t]*",
                "",
            ),
            Substitution::new(r"(?i)Hy vọng được (?:nghe|nhận|trao đổi)[^.\n]*\.[ \t]*", ""),
            Substitution::new(r"(?im)^[ \t]*Hy vọng[^.\n]*\.[ \t]*", ""),
            // English closing the model sometimes leaves in Vietnamese drafts.
            Substitution::new(
                r"(?im)^[ \t]*Please let me know a suitable time to proceed\.?[ \t]*$",
                "",
            ),
        ],
        audience_b2b: vec![Substitution::new(
            r"(?i)\b(?:doanh nghiệp|công ty)\s+(?:anh/chị|anh|bạn|chị)\b",
            "quý công ty",
        )],
        audience_b2c: vec![
            Substitution::new(r"(?i)\bquý\s*công\s*ty\b", "anh/chị"),
            Substitution::new(r"(?i)\bquý\s*đơn vị\b", "anh/chị"),
        ],
        softening: vec![
            Substitution::new(
                r"(?i)lên đến\s*(\d+(?:[.,]\d+)?\s?%)",
                "đã ghi nhận tới khoảng ${1} ở một số trường hợp",
            ),
            Substitution::new(r"(?i)\bcam kết\b", "nỗ lực"),
            Substitution::new(r"(?i)giải pháp tiên tiến", "giải pháp phù hợp"),
        ],
        subjects: vec![
            SubjectEntry {
                purpose: Purpose::SalesOutreach,
                fallback: "Mời demo giải pháp giúp tối ưu hiệu suất (15–20’)",
                variants: &[
                    "Mời demo giải pháp (15–20’)",
                    "Giới thiệu giải pháp tối ưu hiệu suất",
                    "Hẹn trao đổi nhanh về nhu cầu",
                ],
            },
            SubjectEntry {
                purpose: Purpose::CustomerReply,
                fallback: "Thư xin lỗi về đơn hàng và ưu đãi đính kèm",
                variants: &[
                    "Thành thật xin lỗi về sự chậm trễ đơn hàng",
                    "Cập nhật đơn hàng & ưu đãi",
                ],
            },
            SubjectEntry {
                purpose: Purpose::StatusUpdate,
                fallback: "Cập nhật tiến độ công việc",
                variants: &["Cập nhật tiến độ dự án", "Tình trạng các mốc công việc"],
            },
            SubjectEntry {
                purpose: Purpose::LeaveRequest,
                fallback: "Đề nghị xin nghỉ phép",
                variants: &["Đề nghị xin nghỉ phép", "Xin phép nghỉ 1 ngày"],
            },
            SubjectEntry {
                purpose: Purpose::EventInvitation,
                fallback: "Thư mời tham dự sự kiện",
                variants: &["Trân trọng kính mời tham dự sự kiện", "Thư mời sự kiện"],
            },
            SubjectEntry {
                purpose: Purpose::FeedbackRequest,
                fallback: "Mong nhận được góp ý của anh/chị",
                variants: &["Xin ý kiến phản hồi của anh/chị", "Khảo sát nhanh về trải nghiệm"],
            },
            SubjectEntry {
                purpose: Purpose::PartnershipInquiry,
                fallback: "Đề xuất hợp tác",
                variants: &["Đề xuất hợp tác", "Cơ hội hợp tác giữa hai bên"],
            },
        ],
        generic_subject: SubjectEntry {
            purpose: Purpose::Generic,
            fallback: "Thông tin trao đổi",
            variants: &["Thông tin trao đổi", "Trao đổi nhanh"],
        },
    }
}
