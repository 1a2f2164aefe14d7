use std::path::PathBuf;

/// Optional parts of the pipeline. Each flag switches one payload field (and
/// the work that produces it) on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct FeatureFlags {
    pub capture_screenshot: bool,
    pub extract_text: bool,
    pub include_heuristics: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            capture_screenshot: true,
            extract_text: true,
            include_heuristics: true,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub webhook_url: String,
    pub webhook_auth: Option<String>,
    pub webhook_timeout_secs: u64,
    pub chat_id: Option<i64>,
    pub browserless_url: String,
    pub browserless_token: Option<String>,
    pub targets_path: PathBuf,
    pub state_path: PathBuf,
    pub shots_dir: Option<PathBuf>,
    pub log_level: String,
    pub nav_timeout_secs: u64,
    pub settle_delay_ms: u64,
    pub user_agent: String,
    pub locale: String,
    pub features: FeatureFlags,
    pub max_concurrent_targets: usize,
    pub render_max_retries: u32,
    pub render_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("webhook_url", &self.webhook_url)
            .field(
                "webhook_auth",
                &self.webhook_auth.as_ref().map(|_| "[redacted]"),
            )
            .field("webhook_timeout_secs", &self.webhook_timeout_secs)
            .field("chat_id", &self.chat_id)
            .field("browserless_url", &self.browserless_url)
            .field(
                "browserless_token",
                &self.browserless_token.as_ref().map(|_| "[redacted]"),
            )
            .field("targets_path", &self.targets_path)
            .field("state_path", &self.state_path)
            .field("shots_dir", &self.shots_dir)
            .field("log_level", &self.log_level)
            .field("nav_timeout_secs", &self.nav_timeout_secs)
            .field("settle_delay_ms", &self.settle_delay_ms)
            .field("user_agent", &self.user_agent)
            .field("locale", &self.locale)
            .field("features", &self.features)
            .field("max_concurrent_targets", &self.max_concurrent_targets)
            .field("render_max_retries", &self.render_max_retries)
            .field("render_backoff_base_ms", &self.render_backoff_base_ms)
            .finish()
    }
}
