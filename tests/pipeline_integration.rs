//! End-to-end tests for the draft pipeline.
//!
//! Each test feeds a realistic (badly behaved) model draft through
//! `DraftProcessor` and checks the policy guarantees on the final draft.

use email_draft::pipeline::cta::CtaOutcome;
use email_draft::pipeline::rules::rules_for;
use email_draft::pipeline::subject::MAX_SUBJECT_CHARS;
use email_draft::pipeline::{
    Audience, CtaTemplate, DraftProcessor, Locale, PolicyConfig, Purpose, RawDraft, VariableKey,
    Variables,
};

const EN_SIGNATURE: &str = "Best regards,\nPhuoc Doan";

/// Signature lines (salutation or name) in a body, ignoring case.
fn signature_lines(body: &str, name: &str) -> usize {
    body.lines()
        .map(|l| l.trim().trim_end_matches(',').to_lowercase())
        .filter(|l| l == &name.to_lowercase())
        .count()
}

// ── Scenarios ───────────────────────────────────────────────────────

#[test]
fn vietnamese_customer_reply_with_english_signature() {
    let policy = PolicyConfig::new(Purpose::CustomerReply, Locale::Vi).with_signature(EN_SIGNATURE);
    let raw = RawDraft::new(
        "Generated Email",
        "Kính gửi anh Minh,\n\
         Chúng tôi hy vọng anh vẫn khỏe. Chúng tôi thành thật xin lỗi vì đơn hàng [Mã đơn hàng] giao trễ 2 ngày. \
         Chúng tôi xin gửi anh voucher 10% cho lần mua tiếp theo tại đây: [Link voucher].\n\n\
         Best regards,\nPhuoc Doan",
    );

    let out = DraftProcessor::new(policy).process(&raw);
    let body = &out.draft.body;

    assert_eq!(body.matches("Trân trọng,").count(), 1);
    assert!(!body.to_lowercase().contains("best regards"));
    assert!(body.ends_with("Trân trọng,\nPhuoc Doan"));
    assert_eq!(signature_lines(body, "Phuoc Doan"), 1);
    assert!(body.contains("liên hệ hotline"));
    assert!(!body.contains('['));
    assert!(!body.contains("  "));
    assert!(!body.to_lowercase().contains("hy vọng"));
    assert!(body.starts_with("Kính gửi anh Minh,\nChúng tôi thành thật xin lỗi"));
    assert_eq!(out.cta, CtaOutcome::SupportFallback);

    assert!(out.subject_fallback);
    assert_eq!(out.draft.subject, "Thư xin lỗi về đơn hàng và ưu đãi đính kèm");
}

#[test]
fn english_sales_outreach_with_form_link() {
    let policy = PolicyConfig::new(Purpose::SalesOutreach, Locale::En)
        .with_cta(true, CtaTemplate::FillForm)
        .with_signature("Trân trọng,\nPhuoc Doan")
        .with_variables(Variables::default().with(VariableKey::MeetingLink, "https://x.co/f"));
    let raw = RawDraft::new(
        "Cut admin time on your sales team",
        "Dear Anna,\nI hope this email finds you well.\n\
         Our sales platform cuts admin time by up to 30%.\n\n\
         Warm regards,\nPhuoc Doan",
    );

    let out = DraftProcessor::new(policy).process(&raw);
    let body = &out.draft.body;

    assert!(body.ends_with("Best regards,\nPhuoc Doan"));
    assert_eq!(body.matches("https://x.co/f").count(), 1);
    assert!(body.contains("fill out this short form so we can tailor the demo: https://x.co/f"));
    assert!(!body.contains("Warm regards"));
    assert!(!body.contains("I hope"));
    assert!(body.contains("we've seen up to around 30% in some cases"));
    assert_eq!(
        out.cta,
        CtaOutcome::Appended {
            template: CtaTemplate::FillForm
        }
    );
    assert_eq!(out.draft.subject, "Cut admin time on your sales team");
    assert!(!out.subject_fallback);
}

#[test]
fn link_already_in_body_is_not_repeated() {
    let policy = PolicyConfig::new(Purpose::SalesOutreach, Locale::En)
        .with_cta(true, CtaTemplate::FillForm)
        .with_variables(Variables::default().with(VariableKey::MeetingLink, "https://x.co/f"));
    let raw = RawDraft::new(
        "Quick form",
        "Please share your needs via https://x.co/f so we can prepare.",
    );

    let out = DraftProcessor::new(policy).process(&raw);
    assert_eq!(out.draft.body.matches("https://x.co/f").count(), 1);
    assert_eq!(out.cta, CtaOutcome::AlreadyPresent);
}

#[test]
fn b2c_vietnamese_sales_cta_uses_informal_pronoun() {
    let policy = PolicyConfig::new(Purpose::SalesOutreach, Locale::Vi)
        .with_audience(Audience::B2c)
        .with_cta(true, CtaTemplate::ScheduleDemo)
        .with_signature("An");
    let raw = RawDraft::new("Ưu đãi cho quý công ty", "Quý công ty sẽ tiết kiệm thời gian.");

    let out = DraftProcessor::new(policy).process(&raw);
    assert_eq!(
        out.draft.body,
        "Anh/chị sẽ tiết kiệm thời gian.\n\n\
         Anh/chị có thể cho tôi biết thời gian phù hợp để trao đổi ngắn 15–20 phút không?\n\n\
         Trân trọng,\nAn"
    );
}

#[test]
fn vietnamese_reply_is_stable_when_reprocessed() {
    let policy = PolicyConfig::new(Purpose::CustomerReply, Locale::Vi)
        .with_signature(EN_SIGNATURE)
        .with_variables(Variables::default().with(VariableKey::Hotline, "1900 1234"));
    let processor = DraftProcessor::new(policy);

    let first = processor.process(&RawDraft::new(
        "Xin lỗi về đơn hàng A1",
        "Chúng tôi xin lỗi vì giao hàng trễ [2 ngày].\n\nTrân trọng,\nPhuoc Doan",
    ));
    assert!(first.draft.body.contains("liên hệ hotline 1900 1234."));

    let again = processor.process(&RawDraft::new(
        first.draft.subject.clone(),
        first.draft.body.clone(),
    ));
    assert_eq!(again.draft, first.draft);
    assert_eq!(again.cta, CtaOutcome::None);
}

// ── Properties ──────────────────────────────────────────────────────

#[test]
fn signature_appears_once_at_the_end() {
    let bodies = [
        "",
        "Short note.",
        "Note.\n\nBest regards,\nPhuoc Doan",
        "Note.\nTrân trọng, Phuoc Doan\n\nWarm regards,\n\nPhuoc Doan\nPHUOC DOAN",
        "Best regards,\nPhuoc Doan\n\nNote in between.\n\nBest regards,\nPhuoc Doan",
        "Here are the notes.\n\nBest regards,\nPhuoc Doan, Sales Lead",
    ];
    for locale in Locale::ALL {
        let salutation = rules_for(locale).salutation;
        for purpose in [Purpose::Generic, Purpose::CustomerReply, Purpose::SalesOutreach] {
            let policy = PolicyConfig::new(purpose, locale)
                .with_cta(true, CtaTemplate::ConfirmReply)
                .with_signature(EN_SIGNATURE);
            let processor = DraftProcessor::new(policy);
            for body in bodies {
                let out = processor.process(&RawDraft::new("A fine subject", body));
                let expected_tail = format!("{salutation},\nPhuoc Doan");
                assert!(
                    out.draft.body.ends_with(&expected_tail),
                    "{locale:?}/{purpose:?}: {:?}",
                    out.draft.body
                );
                assert_eq!(
                    signature_lines(&out.draft.body, "Phuoc Doan"),
                    1,
                    "{locale:?}/{purpose:?}: {:?}",
                    out.draft.body
                );
                assert_eq!(out.draft.body.matches(salutation).count(), 1);
            }
        }
    }
}

#[test]
fn subject_is_bounded() {
    let processor = DraftProcessor::new(PolicyConfig::new(Purpose::Generic, Locale::Vi));
    for len in [0, 4, 5, 69, 70, 71, 120] {
        let raw_subject = "đ".repeat(len);
        let out = processor.process(&RawDraft::new(raw_subject, "Nội dung."));
        let chars = out.draft.subject.chars().count();
        assert!(chars <= MAX_SUBJECT_CHARS, "len {len} gave {chars}");
        if len > MAX_SUBJECT_CHARS {
            assert_eq!(chars, MAX_SUBJECT_CHARS);
            assert!(out.draft.subject.ends_with("..."));
        }
        assert!(out.subject_alternatives.len() <= 5);
        assert!(out.subject_alternatives.iter().all(|s| s.chars().count() <= 60));
    }
}

#[test]
fn leave_request_never_gets_a_cta() {
    for locale in Locale::ALL {
        for template in [
            CtaTemplate::ScheduleDemo,
            CtaTemplate::ConfirmReply,
            CtaTemplate::FillForm,
            CtaTemplate::DownloadAsset,
        ] {
            let policy = PolicyConfig::new(Purpose::LeaveRequest, locale)
                .with_cta(true, template)
                .with_signature("An")
                .with_variables(Variables::default().with(VariableKey::MeetingLink, "https://x.co/f"));
            let out = DraftProcessor::new(policy).process(&RawDraft::new(
                "Leave on Monday",
                "I would like to take Monday off for personal reasons.",
            ));
            assert_eq!(out.cta, CtaOutcome::None);
            assert!(!out.draft.body.contains("https://"));
            let salutation = rules_for(locale).salutation;
            assert_eq!(
                out.draft.body,
                format!("I would like to take Monday off for personal reasons.\n\n{salutation},\nAn")
            );
        }
    }
}

#[test]
fn required_cta_is_appended_exactly_once() {
    for locale in Locale::ALL {
        let policy = PolicyConfig::new(Purpose::EventInvitation, locale)
            .with_cta(true, CtaTemplate::DownloadAsset)
            .with_variables(Variables::default().with(VariableKey::MeetingLink, "https://x.co/deck"));
        let out = DraftProcessor::new(policy).process(&RawDraft::new("Event next week", "Event notes."));
        assert_eq!(out.draft.body.matches("https://x.co/deck").count(), 1);
        assert!(matches!(out.cta, CtaOutcome::Appended { .. }));
    }
}
