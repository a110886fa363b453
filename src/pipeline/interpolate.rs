//! `{{variable}}` interpolation for free-text request input.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::pipeline::types::{VariableKey, Variables};

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}").unwrap());

/// Replace recognized `{{name}}` tokens with their value, or nothing if unset.
///
/// Unknown tokens (including the reserved `_cta_template` key) are left as written.
pub fn interpolate(text: &str, variables: &Variables) -> String {
    TOKEN
        .replace_all(text, |caps: &Captures<'_>| match VariableKey::from_token(&caps[1]) {
            Some(key) => variables.get(key).unwrap_or("").to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_variables() {
        let vars = Variables::default()
            .with(VariableKey::OrderId, "A1")
            .with(VariableKey::DeliveryDate, "Friday");
        assert_eq!(
            interpolate("Order {{order_id}} ships {{delivery_date}}", &vars),
            "Order A1 ships Friday"
        );
    }

    #[test]
    fn unset_known_variable_becomes_empty() {
        assert_eq!(
            interpolate("Call {{hotline}} now", &Variables::default()),
            "Call  now"
        );
    }

    #[test]
    fn unknown_tokens_are_untouched() {
        let vars = Variables::default().with(VariableKey::Hotline, "1900 1234");
        assert_eq!(
            interpolate("{{coupon}} {{_cta_template}} {{hotline}}", &vars),
            "{{coupon}} {{_cta_template}} 1900 1234"
        );
    }

    #[test]
    fn repeated_tokens_all_replaced() {
        let vars = Variables::default().with(VariableKey::MeetingLink, "https://x.co/m");
        assert_eq!(
            interpolate("{{meeting_link}} and {{meeting_link}}", &vars),
            "https://x.co/m and https://x.co/m"
        );
    }
}
