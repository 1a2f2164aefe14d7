//! Navigation policy: how a page is visited before it is captured.

use std::time::Duration;

use serde::Serialize;
use ticketwatch_core::AppConfig;

/// Selectors tried in order to dismiss a cookie/consent banner. The first
/// selector that matches is clicked and the rest are ignored.
pub const DEFAULT_CONSENT_SELECTORS: &[&str] = &[
    "button#onetrust-accept-btn-handler",
    "button::-p-text(Accetta)",
    "button::-p-text(Accetto)",
    "[data-accept]",
    "[aria-label*=\"Accetta\"]",
];

/// Page lifecycle event that counts as "navigation finished".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    Load,
    #[serde(rename = "domcontentloaded")]
    DomContentLoaded,
    #[serde(rename = "networkidle2")]
    NetworkIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationPolicy {
    pub timeout: Duration,
    pub wait_until: WaitUntil,
    pub user_agent: String,
    pub locale: String,
    pub viewport: Viewport,
    pub consent_selectors: Vec<String>,
    pub consent_click_timeout: Duration,
    /// Fraction of the body height to scroll to before settling.
    pub scroll_fraction: f64,
    pub settle_delay: Duration,
    pub capture_screenshot: bool,
    pub extract_text: bool,
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            wait_until: WaitUntil::DomContentLoaded,
            user_agent: ticketwatch_core::config::DEFAULT_USER_AGENT.to_string(),
            locale: "it-IT".to_string(),
            viewport: Viewport {
                width: 1366,
                height: 900,
            },
            consent_selectors: DEFAULT_CONSENT_SELECTORS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            consent_click_timeout: Duration::from_millis(1500),
            scroll_fraction: 1.0 / 3.0,
            settle_delay: Duration::from_millis(800),
            capture_screenshot: true,
            extract_text: true,
        }
    }
}

impl NavigationPolicy {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.nav_timeout_secs),
            user_agent: config.user_agent.clone(),
            locale: config.locale.clone(),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            capture_screenshot: config.features.capture_screenshot,
            extract_text: config.features.extract_text,
            ..Self::default()
        }
    }

    /// `Accept-Language` header derived from the locale, preferring the
    /// locale itself, then its bare language, then English.
    ///
    /// `it-IT` becomes `it-IT,it;q=0.9,en-US;q=0.8,en;q=0.7`.
    #[must_use]
    pub fn accept_language(&self) -> String {
        let locale = self.locale.trim();
        let language = locale.split(['-', '_']).next().unwrap_or(locale);
        if language.eq_ignore_ascii_case("en") {
            return format!("{locale},en;q=0.9");
        }
        format!("{locale},{language};q=0.9,en-US;q=0.8,en;q=0.7")
    }

    /// Upper bound on how long one render may take end to end: navigation,
    /// consent click, settle delay and capture, plus slack for the engine.
    #[must_use]
    pub fn overall_deadline(&self) -> Duration {
        self.timeout
            .saturating_add(self.consent_click_timeout)
            .saturating_add(self.settle_delay)
            .saturating_add(Duration::from_secs(30))
    }
}
