//! JSON body posted to the webhook.

use base64::Engine as _;
use serde::Serialize;
use ticketwatch_core::{SignalConfig, SignalSet, Target};

/// Maximum number of characters of visible text forwarded to the receiver.
pub const TEXT_EXCERPT_CHARS: usize = 4000;

/// Provider tag attached when the page looks like a bot challenge.
const BLOCK_PROVIDER: &str = "imperva_or_captcha";

/// The keyword and pattern lists used to compute the signals, so the
/// receiver can re-apply or audit the same heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heuristics {
    pub sector_keywords: Vec<String>,
    pub qty_patterns: Vec<String>,
    pub positive_keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
}

impl From<&SignalConfig> for Heuristics {
    fn from(config: &SignalConfig) -> Self {
        Self {
            sector_keywords: config.sector_keywords.clone(),
            qty_patterns: config.quantity_patterns.clone(),
            positive_keywords: config.positive_keywords.clone(),
            negative_keywords: config.negative_keywords.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub url: String,
    pub label: String,
    #[serde(rename = "chatId", skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub blocked: bool,
    #[serde(rename = "detectedProvider")]
    pub detected_provider: Option<&'static str>,
    pub signals: SignalSet,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_base64: Option<String>,
    #[serde(flatten)]
    pub heuristics: Option<Heuristics>,
}

impl Payload {
    /// Start a payload for `target` carrying the rendered HTML. Optional
    /// evidence is attached with the `with_*` methods.
    #[must_use]
    pub fn new(target: &Target, html: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: target.url.clone(),
            label: target.label().to_string(),
            chat_id: None,
            html: html.into(),
            text: None,
            blocked: false,
            detected_provider: None,
            signals: SignalSet::default(),
            reason: reason.into(),
            screenshot_base64: None,
            heuristics: None,
        }
    }

    #[must_use]
    pub fn with_chat_id(mut self, chat_id: Option<i64>) -> Self {
        self.chat_id = chat_id;
        self
    }

    /// Attach the first [`TEXT_EXCERPT_CHARS`] characters of `text`.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.chars().take(TEXT_EXCERPT_CHARS).collect());
        self
    }

    #[must_use]
    pub fn with_signals(mut self, signals: SignalSet) -> Self {
        self.blocked = signals.is_likely_blocked;
        self.detected_provider = signals.is_likely_blocked.then_some(BLOCK_PROVIDER);
        self.signals = signals;
        self
    }

    #[must_use]
    pub fn with_screenshot(mut self, png: &[u8]) -> Self {
        self.screenshot_base64 = Some(base64::engine::general_purpose::STANDARD.encode(png));
        self
    }

    #[must_use]
    pub fn with_heuristics(mut self, config: &SignalConfig) -> Self {
        self.heuristics = Some(Heuristics::from(config));
        self
    }
}
