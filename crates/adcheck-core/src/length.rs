//! Text length checking against a character limit.
//!
//! Used before adding a piece of copy to an ad: the caller supplies the text
//! and a limit, and gets back whether it fits and by how much.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::text;

/// Limit applied when the caller does not supply one.
pub const DEFAULT_LIMIT: usize = 30;

/// Input record for a length check, as supplied by the workflow host.
///
/// Both fields are optional on the wire. A missing text is the empty string;
/// a missing (or zero) limit is [`DEFAULT_LIMIT`]. The limit may be any JSON
/// number: negative limits are kept (nothing fits them) and fractional limits
/// are rounded down, which leaves the verdict for whole-unit lengths unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LengthInput {
    /// The text to measure.
    pub text: Option<String>,
    /// Maximum allowed length in characters.
    pub limit: Option<f64>,
}

impl LengthInput {
    /// Build an input from a text and an optional limit.
    pub fn new(text: impl Into<String>, limit: Option<usize>) -> Self {
        Self {
            text: Some(text.into()),
            limit: limit.map(|l| l as f64),
        }
    }

    /// The limit the caller asked for, if any.
    ///
    /// The host sends `0` for an unset numeric field, so zero counts as
    /// absent. A fraction above zero is a real (if tiny) limit.
    pub fn requested_limit(&self) -> Option<i64> {
        self.limit
            .filter(|l| l.is_finite() && *l != 0.0)
            .map(|l| l.floor() as i64)
    }

    /// The limit after default filling.
    pub fn effective_limit(&self) -> i64 {
        self.limit_or(None)
    }

    /// Apply defaults and run the check.
    pub fn check(&self) -> LengthReport {
        self.check_with_default(None)
    }

    /// Run the check, using `fallback` instead of [`DEFAULT_LIMIT`] when no
    /// limit was requested. A zero fallback is ignored as well.
    pub fn check_with_default(&self, fallback: Option<usize>) -> LengthReport {
        check_length(
            self.text.as_deref().unwrap_or_default(),
            self.limit_or(fallback),
        )
    }

    fn limit_or(&self, fallback: Option<usize>) -> i64 {
        self.requested_limit()
            .or_else(|| fallback.filter(|&l| l > 0).map(signed))
            .unwrap_or(signed(DEFAULT_LIMIT))
    }
}

/// Result of checking a text against a limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LengthReport {
    /// The text that was checked.
    pub text: String,
    /// Length of the text in UTF-16 code units.
    pub length: usize,
    /// The limit the text was checked against.
    pub limit: i64,
    /// Whether `length <= limit`.
    pub valid: bool,
    /// `limit - length`; negative when the text is too long.
    pub remaining: i64,
}

impl LengthReport {
    /// Human-readable status line.
    pub fn status(&self) -> String {
        if self.valid {
            format!("OK ({} chars remaining)", self.remaining)
        } else {
            format!("TOO LONG by {} chars", self.remaining.unsigned_abs())
        }
    }
}

impl fmt::Display for LengthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Text: \"{}\"\nLength: {}/{}\nValid: {}\nStatus: {}",
            self.text,
            self.length,
            self.limit,
            self.valid,
            self.status()
        )
    }
}

/// Check `text` against `limit`.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn check_length(text: &str, limit: i64) -> LengthReport {
    let length = text::char_len(text);
    let remaining = limit.saturating_sub(signed(length));

    LengthReport {
        text: text.to_string(),
        length,
        limit,
        valid: remaining >= 0,
        remaining,
    }
}

fn signed(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_with_default_limit_is_valid() {
        let report = LengthInput::default().check();
        assert_eq!(report.length, 0);
        assert_eq!(report.limit, 30);
        assert!(report.valid);
        assert_eq!(report.remaining, 30);
    }

    #[test]
    fn text_over_limit_reports_overflow() {
        let report = check_length("12345678901234567890123456789012", 30);
        assert_eq!(report.length, 32);
        assert!(!report.valid);
        assert_eq!(report.remaining, -2);
        assert_eq!(report.status(), "TOO LONG by 2 chars");
    }

    #[test]
    fn text_at_limit_is_valid() {
        let report = check_length("abcde", 5);
        assert!(report.valid);
        assert_eq!(report.status(), "OK (0 chars remaining)");
    }

    #[test]
    fn validity_and_remaining_agree_across_limits() {
        let text = "Free Shipping Today";
        let len = text.chars().count();
        for limit in -5..40 {
            let report = check_length(text, limit);
            assert_eq!(report.valid, len as i64 <= limit, "limit {limit}");
            assert_eq!(report.remaining, limit - len as i64, "limit {limit}");
        }
    }

    #[test]
    fn display_is_four_lines() {
        let report = check_length("Buy Now", 30);
        assert_eq!(
            report.to_string(),
            "Text: \"Buy Now\"\nLength: 7/30\nValid: true\nStatus: OK (23 chars remaining)"
        );
    }

    #[test]
    fn display_too_long() {
        let report = check_length("Shop the Biggest Summer Sale Ever", 30);
        let out = report.to_string();
        assert!(out.contains("Length: 33/30"));
        assert!(out.contains("Valid: false"));
        assert!(out.ends_with("Status: TOO LONG by 3 chars"));
    }

    #[test]
    fn zero_limit_falls_back_to_default() {
        let input = LengthInput::new("abc", Some(0));
        assert_eq!(input.effective_limit(), 30);
        assert_eq!(input.requested_limit(), None);
    }

    #[test]
    fn explicit_limit_is_used() {
        let report = LengthInput::new("abcdefghijklmnop", Some(15)).check();
        assert_eq!(report.limit, 15);
        assert!(!report.valid);
    }

    #[test]
    fn input_deserializes_with_missing_fields() {
        let input: LengthInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input, LengthInput::default());

        let input: LengthInput = serde_json::from_str(r#"{"text":"hi","limit":5}"#).unwrap();
        assert_eq!(input.check().remaining, 3);
    }

    #[test]
    fn negative_limit_is_reported_not_rejected() {
        let input: LengthInput = serde_json::from_str(r#"{"text":"abc","limit":-5}"#).unwrap();
        let report = input.check();
        assert_eq!(report.limit, -5);
        assert!(!report.valid);
        assert_eq!(report.remaining, -8);
        assert_eq!(
            report.to_string(),
            "Text: \"abc\"\nLength: 3/-5\nValid: false\nStatus: TOO LONG by 8 chars"
        );
    }

    #[test]
    fn float_limits_are_accepted() {
        let input: LengthInput = serde_json::from_str(r#"{"text":"abc","limit":20.0}"#).unwrap();
        let report = input.check();
        assert_eq!(report.limit, 20);
        assert_eq!(report.remaining, 17);

        let report = LengthInput {
            text: Some("abc".into()),
            limit: Some(3.9),
        }
        .check();
        assert_eq!(report.limit, 3);
        assert!(report.valid);
    }

    #[test]
    fn fractional_limit_below_one_is_not_the_default() {
        let input = LengthInput {
            text: Some("a".into()),
            limit: Some(0.5),
        };
        assert_eq!(input.requested_limit(), Some(0));
        assert!(!input.check().valid);
    }

    #[test]
    fn fallback_applies_only_without_a_requested_limit() {
        let unset = LengthInput::new("abcdefg", None);
        assert_eq!(unset.check_with_default(Some(5)).limit, 5);
        assert_eq!(unset.check_with_default(Some(0)).limit, 30);
        assert_eq!(unset.check_with_default(None).limit, 30);

        let zero = LengthInput::new("abcdefg", Some(0));
        assert_eq!(zero.check_with_default(Some(5)).limit, 5);

        let explicit = LengthInput::new("abcdefg", Some(12));
        assert_eq!(explicit.check_with_default(Some(5)).limit, 12);
    }
}
