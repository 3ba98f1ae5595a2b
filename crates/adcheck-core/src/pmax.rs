//! Performance Max asset group validation.
//!
//! Same per-item length limits as responsive search ads, plus long
//! headlines, different count ranges, and a mobile rule: at least one
//! headline must be short enough for small screens.
//!
//! | Asset         | Max chars | Min count | Max count |
//! |---------------|-----------|-----------|-----------|
//! | headline      | 30        | 3         | 15        |
//! | long_headline | 90        | 1         | 5         |
//! | description   | 90        | 3         | 5         |
//! | path          | 15        | 2         | 2         |

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ads::{
    self, AdFormat, AssetBundle, AssetKind, AssetReport, CategorySummary, CountError, Findings,
    LengthIssue,
};
use crate::error::InputResult;
use crate::text;

/// A headline at most this long counts toward the mobile requirement.
pub const MOBILE_HEADLINE_CHARS: usize = 15;

/// The assets of one Performance Max asset group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PmaxBundle {
    /// Headlines, in order.
    #[serde(deserialize_with = "ads::null_as_empty")]
    pub headlines: Vec<String>,
    /// Long headlines, in order.
    #[serde(deserialize_with = "ads::null_as_empty")]
    pub long_headlines: Vec<String>,
    /// Descriptions, in order.
    #[serde(deserialize_with = "ads::null_as_empty")]
    pub descriptions: Vec<String>,
    /// Display URL paths, in order.
    #[serde(deserialize_with = "ads::null_as_empty")]
    pub paths: Vec<String>,
}

impl AssetBundle for PmaxBundle {
    const FORMAT: AdFormat = AdFormat::PerformanceMax;

    fn items(&self, kind: AssetKind) -> &[String] {
        match kind {
            AssetKind::Headline => &self.headlines,
            AssetKind::LongHeadline => &self.long_headlines,
            AssetKind::Description => &self.descriptions,
            AssetKind::Path => &self.paths,
        }
    }

    fn items_mut(&mut self, kind: AssetKind) -> Option<&mut Vec<String>> {
        Some(match kind {
            AssetKind::Headline => &mut self.headlines,
            AssetKind::LongHeadline => &mut self.long_headlines,
            AssetKind::Description => &mut self.descriptions,
            AssetKind::Path => &mut self.paths,
        })
    }
}

/// Validator input: an asset group nested under `ads`, or given directly.
///
/// Resolution follows [`crate::AdsInput`]: a non-null `ads` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PmaxInput {
    /// Asset group nested under a key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ads: Option<PmaxBundle>,
    /// Asset group given at the top level.
    #[serde(flatten)]
    pub direct: PmaxBundle,
}

impl PmaxInput {
    /// Resolve to the asset group that should be validated.
    pub fn into_bundle(self) -> PmaxBundle {
        self.ads.unwrap_or(self.direct)
    }

    /// Decode a JSON document and resolve it to an asset group.
    pub fn bundle_from_json(json: &str) -> InputResult<PmaxBundle> {
        let input: Self = serde_json::from_str(json)?;
        Ok(input.into_bundle())
    }
}

/// Outcome of the mobile headline rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MobileHeadlineCheck {
    /// Longest headline that counts as mobile-friendly.
    pub limit: usize,
    /// Number of headlines within `limit`.
    pub found: usize,
    /// Whether at least one was found.
    pub valid: bool,
}

impl MobileHeadlineCheck {
    /// Count the mobile-friendly headlines.
    pub fn of(headlines: &[String]) -> Self {
        let found = headlines
            .iter()
            .filter(|h| text::char_len(h) <= MOBILE_HEADLINE_CHARS)
            .count();
        Self {
            limit: MOBILE_HEADLINE_CHARS,
            found,
            valid: found > 0,
        }
    }
}

impl fmt::Display for MobileHeadlineCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "Mobile headlines ({} chars or fewer): {}", self.limit, self.found)
        } else {
            write!(
                f,
                "Headlines: at least 1 of {} chars or fewer required for mobile, got 0",
                self.limit
            )
        }
    }
}

/// Result of validating a Performance Max asset group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PmaxReport {
    /// Categories with the wrong number of items (at most one per category).
    pub count_errors: Vec<CountError>,
    /// The mobile headline rule.
    pub mobile: MobileHeadlineCheck,
    /// Items over their category's length limit.
    pub length_issues: Vec<LengthIssue>,
    /// Totals for headlines, long headlines, descriptions and paths.
    pub summary: Vec<CategorySummary>,
    /// True when every count, length and mobile requirement holds.
    pub valid: bool,
}

impl AssetReport for PmaxReport {
    type Bundle = PmaxBundle;

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn length_issues(&self) -> &[LengthIssue] {
        &self.length_issues
    }

    fn problem_count(&self) -> usize {
        self.count_errors.len() + self.length_issues.len() + usize::from(!self.mobile.valid)
    }
}

impl fmt::Display for PmaxReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            f.write_str("VALID: All assets meet Performance Max requirements!\n\n")?;
        } else {
            f.write_str("INVALID: Fix the following issues:\n\n")?;
        }
        ads::write_section(f, "COUNT ERRORS", &self.count_errors)?;
        if !self.mobile.valid {
            ads::write_section(f, "MOBILE", std::slice::from_ref(&self.mobile))?;
        }
        ads::write_section(f, "LENGTH ISSUES", &self.length_issues)?;
        ads::write_summary(f, &self.summary)?;
        if self.mobile.valid {
            write!(f, "\n- {}", self.mobile)?;
        }
        Ok(())
    }
}

/// Validate a Performance Max asset group.
#[tracing::instrument(skip(bundle), fields(
    headlines = bundle.headlines.len(),
    long_headlines = bundle.long_headlines.len(),
    descriptions = bundle.descriptions.len(),
    paths = bundle.paths.len(),
))]
pub fn validate_pmax(bundle: &PmaxBundle) -> PmaxReport {
    let Findings {
        count_errors,
        length_issues,
        summary,
    } = ads::inspect(bundle);
    let mobile = MobileHeadlineCheck::of(&bundle.headlines);

    let valid = count_errors.is_empty() && length_issues.is_empty() && mobile.valid;
    tracing::debug!(
        valid,
        count_errors = count_errors.len(),
        length_issues = length_issues.len(),
        mobile_headlines = mobile.found,
        "asset group validated"
    );

    PmaxReport {
        count_errors,
        mobile,
        length_issues,
        summary,
        valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::CountViolation;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn group() -> PmaxBundle {
        PmaxBundle {
            headlines: strings(&["Trail Shoes", "Free Returns", "Shop the Spring Range"]),
            long_headlines: strings(&["Lightweight trail shoes built for every season"]),
            descriptions: strings(&["Grip that lasts.", "Ships free.", "Made to run."]),
            paths: strings(&["shoes", "trail"]),
        }
    }

    #[test]
    fn complete_group_passes() {
        let report = validate_pmax(&group());
        assert!(report.valid, "{report}");
        assert_eq!(report.mobile.found, 2);
        assert_eq!(
            report.to_string(),
            "VALID: All assets meet Performance Max requirements!\n\n\
             SUMMARY:\n\
             - Headlines: 3 (valid: 3)\n\
             - Long Headlines: 1 (valid: 1)\n\
             - Descriptions: 3 (valid: 3)\n\
             - Paths: 2 (valid: 2)\n\
             - Mobile headlines (15 chars or fewer): 2"
        );
    }

    #[test]
    fn no_short_headline_fails_mobile_rule() {
        let mut b = group();
        b.headlines = strings(&[
            "Lightweight Trail Shoes",
            "Free Returns On All Orders",
            "Shop the Spring Range",
        ]);
        let report = validate_pmax(&b);
        assert!(!report.valid);
        assert!(report.count_errors.is_empty());
        assert!(report.length_issues.is_empty());
        assert!(!report.mobile.valid);
        assert_eq!(report.problem_count(), 1);
        assert!(report.to_string().contains(
            "MOBILE:\n- Headlines: at least 1 of 15 chars or fewer required for mobile, got 0\n\n"
        ));
        assert!(!report.to_string().contains("Mobile headlines ("));
    }

    #[test]
    fn headline_of_exactly_fifteen_counts_as_mobile() {
        let check = MobileHeadlineCheck::of(&strings(&["123456789012345", "x".repeat(16).as_str()]));
        assert_eq!(check.found, 1);
        assert!(check.valid);
    }

    #[test]
    fn empty_group_reports_every_count_and_mobile() {
        let report = validate_pmax(&PmaxBundle::default());
        let messages: Vec<String> = report.count_errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            [
                "Headlines: minimum 3 required, got 0",
                "Long Headlines: minimum 1 required, got 0",
                "Descriptions: minimum 3 required, got 0",
                "Paths: exactly 2 required, got 0",
            ]
        );
        assert!(!report.mobile.valid);
        assert_eq!(report.problem_count(), 5);
    }

    #[test]
    fn count_ranges_differ_from_search_ads() {
        let mut b = group();
        b.descriptions = strings(&["a", "b"]);
        let report = validate_pmax(&b);
        assert_eq!(report.count_errors[0].kind, AssetKind::Description);
        assert_eq!(report.count_errors[0].violation, CountViolation::Minimum);

        b.descriptions = strings(&["a", "b", "c", "d", "e"]);
        assert!(validate_pmax(&b).valid);

        b.long_headlines = vec!["x".to_string(); 6];
        let report = validate_pmax(&b);
        assert_eq!(
            report.count_errors[0].to_string(),
            "Long Headlines: maximum 5 allowed, got 6"
        );
    }

    #[test]
    fn long_headline_over_limit_is_previewed_and_corrected() {
        let mut b = group();
        let long = "Lightweight trail running shoes with extra grip, built for muddy spring mornings and long runs";
        b.long_headlines = vec![long.to_string()];
        let report = validate_pmax(&b);

        let issue = &report.length_issues[0];
        assert_eq!(issue.kind, AssetKind::LongHeadline);
        assert_eq!(issue.limit, 90);
        assert!(
            issue
                .to_string()
                .starts_with("Long Headline 1: \"Lightweight trail running shoe...\" - 94/90 chars (TOO LONG by 4)")
        );

        let fixed = report.corrected(&b);
        assert!(text::char_len(&fixed.long_headlines[0]) <= 90);
        assert!(validate_pmax(&fixed).valid);
    }

    #[test]
    fn input_accepts_nested_group() {
        let b = PmaxInput::bundle_from_json(
            r#"{"ads":{"headlines":["a"],"long_headlines":["long"]},"headlines":["top"]}"#,
        )
        .unwrap();
        assert_eq!(b.headlines, ["a"]);
        assert_eq!(b.long_headlines, ["long"]);
    }

    #[test]
    fn input_null_long_headlines_default_to_empty() {
        let b = PmaxInput::bundle_from_json(r#"{"long_headlines":null}"#).unwrap();
        assert!(b.long_headlines.is_empty());
    }
}
