//! Keyword and pattern heuristics over a page's visible text.

use regex::{Regex, RegexBuilder};
use ticketwatch_core::{ConfigError, SignalConfig, SignalSet};

/// Applies a fixed [`SignalConfig`] to page text.
///
/// Patterns are compiled once at construction; `extract` is pure.
#[derive(Debug, Clone)]
pub struct SignalExtractor {
    config: SignalConfig,
    sector_keywords: Vec<String>,
    quantity_patterns: Vec<Regex>,
    positive_keywords: Vec<String>,
    negative_keywords: Vec<String>,
    block_pattern: Regex,
}

impl SignalExtractor {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if any quantity pattern or the
    /// block pattern is not a valid regular expression.
    pub fn new(config: SignalConfig) -> Result<Self, ConfigError> {
        let quantity_patterns = config
            .quantity_patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        let block_pattern = compile(&config.block_pattern)?;

        Ok(Self {
            sector_keywords: lowercase_all(&config.sector_keywords),
            positive_keywords: lowercase_all(&config.positive_keywords),
            negative_keywords: lowercase_all(&config.negative_keywords),
            quantity_patterns,
            block_pattern,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Classify a page. Keyword categories are matched against `text`; the
    /// block indicator is matched against `text` followed by the lower-cased
    /// `html`, since challenge pages often carry their markers only in markup.
    #[must_use]
    pub fn extract(&self, text: &str, html: &str) -> SignalSet {
        let lowered = text.to_lowercase();
        let contains_any =
            |keywords: &[String]| keywords.iter().any(|k| !k.is_empty() && lowered.contains(k));

        let mut haystack = String::with_capacity(text.len() + html.len());
        haystack.push_str(text);
        haystack.push_str(&html.to_lowercase());

        SignalSet {
            has_preferred_sector: contains_any(&self.sector_keywords),
            has_preferred_quantity: self.quantity_patterns.iter().any(|re| re.is_match(&lowered)),
            has_positive_availability: contains_any(&self.positive_keywords),
            has_negative_availability: contains_any(&self.negative_keywords),
            is_likely_blocked: self.block_pattern.is_match(&haystack),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_owned(),
            source: e,
        })
}

fn lowercase_all(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| k.to_lowercase()).collect()
}
