//! Google Ads asset validation.
//!
//! Checks a bundle of ad assets against the rules of its [`AdFormat`]: how
//! many headlines, descriptions and display paths an ad needs, and how long
//! each one may be. Rule violations are returned as data in a report;
//! nothing here fails.
//!
//! Responsive search ads ([`AdBundle`], [`validate_ads`]):
//!
//! | Asset       | Max chars | Min count | Max count |
//! |-------------|-----------|-----------|-----------|
//! | headline    | 30        | 3         | 15        |
//! | description | 90        | 2         | 4         |
//! | path        | 15        | 2         | 2         |
//!
//! Performance Max asset groups are validated in [`crate::pmax`].

use std::borrow::Cow;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::InputResult;
use crate::text;

/// How many characters of an over-long description are quoted in a report.
const DESCRIPTION_PREVIEW_CHARS: usize = 30;

/// Asset categories across ad formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum AssetKind {
    /// Headline shown at the top of the ad.
    Headline,
    /// Long headline (Performance Max only).
    LongHeadline,
    /// Body text below the headlines.
    Description,
    /// Display URL path segment.
    Path,
}

/// Count and length requirements for one asset category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AssetRule {
    /// Maximum length of a single item.
    pub max_chars: usize,
    /// Minimum number of items.
    pub min_count: usize,
    /// Maximum number of items.
    pub max_count: usize,
}

impl AssetRule {
    const fn new(kind: AssetKind, min_count: usize, max_count: usize) -> Self {
        Self {
            max_chars: kind.max_chars(),
            min_count,
            max_count,
        }
    }

    /// Whether the rule demands an exact count rather than a range.
    pub const fn is_exact(&self) -> bool {
        self.min_count == self.max_count
    }
}

impl AssetKind {
    /// Per-item length limit. The same in every format.
    pub const fn max_chars(self) -> usize {
        match self {
            Self::Headline => 30,
            Self::LongHeadline | Self::Description => 90,
            Self::Path => 15,
        }
    }

    /// Identifier, as used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Headline => "headline",
            Self::LongHeadline => "long_headline",
            Self::Description => "description",
            Self::Path => "path",
        }
    }

    /// Singular display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Headline => "Headline",
            Self::LongHeadline => "Long Headline",
            Self::Description => "Description",
            Self::Path => "Path",
        }
    }

    /// Plural display label.
    pub const fn plural_label(self) -> &'static str {
        match self {
            Self::Headline => "Headlines",
            Self::LongHeadline => "Long Headlines",
            Self::Description => "Descriptions",
            Self::Path => "Paths",
        }
    }

    /// The form of `item` quoted in a length issue.
    ///
    /// Descriptions and long headlines are long, so only their opening is shown.
    fn preview(self, item: &str) -> Cow<'_, str> {
        match self {
            Self::Description | Self::LongHeadline => Cow::Owned(format!(
                "{}{}",
                text::truncate(item, DESCRIPTION_PREVIEW_CHARS),
                text::ELLIPSIS
            )),
            Self::Headline | Self::Path => Cow::Borrowed(item),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ad formats, each with its own asset requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdFormat {
    /// Responsive search ad.
    ResponsiveSearch,
    /// Performance Max asset group.
    PerformanceMax,
}

impl AdFormat {
    /// All formats.
    pub const ALL: [Self; 2] = [Self::ResponsiveSearch, Self::PerformanceMax];

    /// The categories this format uses, in report order.
    pub const fn kinds(self) -> &'static [AssetKind] {
        match self {
            Self::ResponsiveSearch => &[AssetKind::Headline, AssetKind::Description, AssetKind::Path],
            Self::PerformanceMax => &[
                AssetKind::Headline,
                AssetKind::LongHeadline,
                AssetKind::Description,
                AssetKind::Path,
            ],
        }
    }

    /// The rule for `kind` in this format, if the format uses it.
    pub const fn rule(self, kind: AssetKind) -> Option<AssetRule> {
        use AssetKind::{Description, Headline, LongHeadline, Path};
        let (min, max) = match (self, kind) {
            (_, Headline) => (3, 15),
            (Self::ResponsiveSearch, LongHeadline) => return None,
            (Self::PerformanceMax, LongHeadline) => (1, 5),
            (Self::ResponsiveSearch, Description) => (2, 4),
            (Self::PerformanceMax, Description) => (3, 5),
            (_, Path) => (2, 2),
        };
        Some(AssetRule::new(kind, min, max))
    }

    /// Display name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ResponsiveSearch => "Responsive search ad",
            Self::PerformanceMax => "Performance Max",
        }
    }
}

/// A set of asset lists validated under one [`AdFormat`].
pub trait AssetBundle: Clone {
    /// The format whose rules apply.
    const FORMAT: AdFormat;

    /// The items of one category; empty for categories the bundle lacks.
    fn items(&self, kind: AssetKind) -> &[String];

    /// Mutable access to one category, if the bundle has it.
    fn items_mut(&mut self, kind: AssetKind) -> Option<&mut Vec<String>>;
}

/// The assets of one responsive search ad.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AdBundle {
    /// Headlines, in order.
    #[serde(deserialize_with = "null_as_empty")]
    pub headlines: Vec<String>,
    /// Descriptions, in order.
    #[serde(deserialize_with = "null_as_empty")]
    pub descriptions: Vec<String>,
    /// Display URL paths, in order.
    #[serde(deserialize_with = "null_as_empty")]
    pub paths: Vec<String>,
}

impl AssetBundle for AdBundle {
    const FORMAT: AdFormat = AdFormat::ResponsiveSearch;

    fn items(&self, kind: AssetKind) -> &[String] {
        match kind {
            AssetKind::Headline => &self.headlines,
            AssetKind::Description => &self.descriptions,
            AssetKind::Path => &self.paths,
            AssetKind::LongHeadline => &[],
        }
    }

    fn items_mut(&mut self, kind: AssetKind) -> Option<&mut Vec<String>> {
        match kind {
            AssetKind::Headline => Some(&mut self.headlines),
            AssetKind::Description => Some(&mut self.descriptions),
            AssetKind::Path => Some(&mut self.paths),
            AssetKind::LongHeadline => None,
        }
    }
}

pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Validator input: a bundle nested under `ads`, or given directly.
///
/// `{"ads": {"headlines": [...]}}` and `{"headlines": [...]}` are both
/// accepted. When `ads` is present and not null it wins and any top-level
/// asset fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AdsInput {
    /// Bundle nested under a key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ads: Option<AdBundle>,
    /// Bundle given at the top level.
    #[serde(flatten)]
    pub direct: AdBundle,
}

impl AdsInput {
    /// Resolve to the bundle that should be validated.
    pub fn into_bundle(self) -> AdBundle {
        self.ads.unwrap_or(self.direct)
    }

    /// Decode a JSON document and resolve it to a bundle.
    pub fn bundle_from_json(json: &str) -> InputResult<AdBundle> {
        let input: Self = serde_json::from_str(json)?;
        Ok(input.into_bundle())
    }
}

impl From<AdBundle> for AdsInput {
    fn from(bundle: AdBundle) -> Self {
        Self {
            ads: None,
            direct: bundle,
        }
    }
}

/// Which count requirement a category broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CountViolation {
    /// Fewer items than the minimum.
    Minimum,
    /// More items than the maximum.
    Maximum,
    /// Not exactly the required number.
    Exact,
}

/// A category with the wrong number of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CountError {
    /// The offending category.
    pub kind: AssetKind,
    /// Which bound was broken.
    pub violation: CountViolation,
    /// The bound that applies.
    pub required: usize,
    /// The number of items supplied.
    pub actual: usize,
}

impl fmt::Display for CountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.kind.plural_label();
        let (required, actual) = (self.required, self.actual);
        match self.violation {
            CountViolation::Minimum => {
                write!(f, "{label}: minimum {required} required, got {actual}")
            }
            CountViolation::Maximum => {
                write!(f, "{label}: maximum {required} allowed, got {actual}")
            }
            CountViolation::Exact => {
                write!(f, "{label}: exactly {required} required, got {actual}")
            }
        }
    }
}

/// An item longer than its category allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LengthIssue {
    /// The item's category.
    pub kind: AssetKind,
    /// 1-based position within the category.
    pub index: usize,
    /// The full item text.
    pub text: String,
    /// Length of the item.
    pub length: usize,
    /// The category's per-item limit.
    pub limit: usize,
    /// How far over the limit the item is.
    pub overflow: usize,
    /// A shortened version that fits the limit.
    pub suggestion: String,
}

impl fmt::Display for LengthIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: \"{}\" - {}/{} chars (TOO LONG by {})",
            self.kind.label(),
            self.index,
            self.kind.preview(&self.text),
            self.length,
            self.limit,
            self.overflow
        )
    }
}

/// Per-category totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategorySummary {
    /// The category.
    pub kind: AssetKind,
    /// Number of items supplied.
    pub total: usize,
    /// Number of items within the per-item length limit.
    ///
    /// Independent of the count requirement: items can be length-valid while
    /// the category as a whole has too few of them.
    pub length_valid: usize,
}

impl fmt::Display for CategorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {}: {} (valid: {})",
            self.kind.plural_label(),
            self.total,
            self.length_valid
        )
    }
}

/// Common surface of the per-format validation reports.
pub trait AssetReport: fmt::Display + Serialize {
    /// The bundle type the report is produced from.
    type Bundle: AssetBundle + Serialize;

    /// True when the bundle meets every requirement.
    fn is_valid(&self) -> bool;

    /// Items over their category's length limit.
    fn length_issues(&self) -> &[LengthIssue];

    /// Number of failed requirements, length issues included.
    fn problem_count(&self) -> usize;

    /// A copy of `bundle` with every over-long item replaced by its suggestion.
    ///
    /// `bundle` should be the one this report was produced from.
    fn corrected(&self, bundle: &Self::Bundle) -> Self::Bundle {
        let mut corrected = bundle.clone();
        for issue in self.length_issues() {
            if let Some(item) = corrected
                .items_mut(issue.kind)
                .and_then(|items| items.get_mut(issue.index.saturating_sub(1)))
            {
                item.clone_from(&issue.suggestion);
            }
        }
        corrected
    }
}

/// Result of validating an ad bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AdsReport {
    /// Categories with the wrong number of items (at most one per category).
    pub count_errors: Vec<CountError>,
    /// Items over their category's length limit.
    pub length_issues: Vec<LengthIssue>,
    /// Totals for headlines, descriptions and paths, in that order.
    pub summary: Vec<CategorySummary>,
    /// True when there are no count errors and no length issues.
    pub valid: bool,
}

impl AssetReport for AdsReport {
    type Bundle = AdBundle;

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn length_issues(&self) -> &[LengthIssue] {
        &self.length_issues
    }

    fn problem_count(&self) -> usize {
        self.count_errors.len() + self.length_issues.len()
    }
}

impl fmt::Display for AdsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            f.write_str("VALID: All ads pass validation!\n\n")?;
        } else {
            f.write_str("INVALID: Fix the following issues:\n\n")?;
        }
        write_section(f, "COUNT ERRORS", &self.count_errors)?;
        write_section(f, "LENGTH ISSUES", &self.length_issues)?;
        write_summary(f, &self.summary)
    }
}

/// Write a titled bullet list followed by a blank line; nothing when empty.
pub(crate) fn write_section<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    lines: &[T],
) -> fmt::Result {
    if lines.is_empty() {
        return Ok(());
    }
    writeln!(f, "{title}:")?;
    for line in lines {
        writeln!(f, "- {line}")?;
    }
    f.write_str("\n")
}

pub(crate) fn write_summary(f: &mut fmt::Formatter<'_>, summary: &[CategorySummary]) -> fmt::Result {
    f.write_str("SUMMARY:")?;
    for category in summary {
        write!(f, "\n{category}")?;
    }
    Ok(())
}

/// Check a category's item count against its rule in `format`.
///
/// The minimum is checked first; a category under its minimum is not also
/// checked against its maximum. Categories the format does not use never
/// produce an error.
pub fn check_count(format: AdFormat, kind: AssetKind, actual: usize) -> Option<CountError> {
    let rule = format.rule(kind)?;
    let (violation, required) = if rule.is_exact() {
        if actual == rule.min_count {
            return None;
        }
        (CountViolation::Exact, rule.min_count)
    } else if actual < rule.min_count {
        (CountViolation::Minimum, rule.min_count)
    } else if actual > rule.max_count {
        (CountViolation::Maximum, rule.max_count)
    } else {
        return None;
    };

    Some(CountError {
        kind,
        violation,
        required,
        actual,
    })
}

/// Count errors, length issues and totals for one bundle.
pub(crate) struct Findings {
    pub(crate) count_errors: Vec<CountError>,
    pub(crate) length_issues: Vec<LengthIssue>,
    pub(crate) summary: Vec<CategorySummary>,
}

/// Run the count and per-item length checks of `B::FORMAT` over `bundle`.
pub(crate) fn inspect<B: AssetBundle>(bundle: &B) -> Findings {
    let kinds = B::FORMAT.kinds();
    let count_errors: Vec<CountError> = kinds
        .iter()
        .filter_map(|&kind| check_count(B::FORMAT, kind, bundle.items(kind).len()))
        .collect();

    let mut length_issues = Vec::new();
    let mut summary = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let limit = kind.max_chars();
        let items = bundle.items(kind);
        let mut length_valid = 0;
        for (i, item) in items.iter().enumerate() {
            let length = text::char_len(item);
            if length <= limit {
                length_valid += 1;
                continue;
            }
            length_issues.push(LengthIssue {
                kind,
                index: i + 1,
                text: item.clone(),
                length,
                limit,
                overflow: length - limit,
                suggestion: text::suggest_shortening(item, limit),
            });
        }
        summary.push(CategorySummary {
            kind,
            total: items.len(),
            length_valid,
        });
    }

    Findings {
        count_errors,
        length_issues,
        summary,
    }
}

/// Validate a responsive search ad bundle against the asset rules.
#[tracing::instrument(skip(bundle), fields(
    headlines = bundle.headlines.len(),
    descriptions = bundle.descriptions.len(),
    paths = bundle.paths.len(),
))]
pub fn validate_ads(bundle: &AdBundle) -> AdsReport {
    let Findings {
        count_errors,
        length_issues,
        summary,
    } = inspect(bundle);

    let valid = count_errors.is_empty() && length_issues.is_empty();
    tracing::debug!(
        valid,
        count_errors = count_errors.len(),
        length_issues = length_issues.len(),
        "ad bundle validated"
    );

    AdsReport {
        count_errors,
        length_issues,
        summary,
        valid,
    }
}
