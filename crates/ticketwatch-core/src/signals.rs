//! Keyword and pattern lists for the signal heuristics.

use serde::Serialize;

/// Immutable heuristic configuration handed to the signal extractor.
///
/// Keywords are matched as case-insensitive substrings. Patterns are regular
/// expressions compiled case-insensitively by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalConfig {
    pub sector_keywords: Vec<String>,
    pub quantity_patterns: Vec<String>,
    pub positive_keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
    pub block_pattern: String,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            sector_keywords: owned(&["gold circle", "golden circle", "prato gold", "inner circle"]),
            quantity_patterns: owned(&[
                r"\b2\s*tickets?\b",
                r"\b2x\b",
                r"\bcoppia\b",
                r"\b2\s*bigliett",
            ]),
            positive_keywords: owned(&[
                "buy tickets",
                "find tickets",
                "resale",
                "tickets available",
                "acquista",
                "disponibili",
                "available now",
            ]),
            negative_keywords: owned(&[
                "sold out",
                "currently unavailable",
                "no tickets available",
                "esaurito",
                "esauriti",
                "not available",
            ]),
            block_pattern: "imperva|captcha|i'm not a human|additional security check|why am i seeing this page"
                .to_string(),
        }
    }
}

/// Boolean heuristic flags derived from one page's text.
///
/// Categories are independent: a page can be both positive and negative at
/// once. Ambiguity is reported, not resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct SignalSet {
    pub has_preferred_sector: bool,
    pub has_preferred_quantity: bool,
    pub has_positive_availability: bool,
    pub has_negative_availability: bool,
    pub is_likely_blocked: bool,
}

impl SignalSet {
    /// A signal strong enough to re-report a page whose content did not change.
    #[must_use]
    pub fn is_interesting(&self) -> bool {
        self.has_preferred_sector || self.has_positive_availability
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
