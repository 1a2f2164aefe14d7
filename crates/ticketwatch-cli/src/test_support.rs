use std::path::Path;

use ticketwatch_core::{AppConfig, FeatureFlags};

/// Config with every file under `dir` and endpoints nothing listens on.
pub(crate) fn config_in(dir: &Path) -> AppConfig {
    AppConfig {
        webhook_url: "http://127.0.0.1:9/hook".to_string(),
        webhook_auth: None,
        webhook_timeout_secs: 1,
        chat_id: None,
        browserless_url: "http://127.0.0.1:9".to_string(),
        browserless_token: None,
        targets_path: dir.join("targets.yaml"),
        state_path: dir.join("state.json"),
        shots_dir: None,
        log_level: "info".to_string(),
        nav_timeout_secs: 1,
        settle_delay_ms: 0,
        user_agent: "ticketwatch-test".to_string(),
        locale: "en-US".to_string(),
        features: FeatureFlags::default(),
        max_concurrent_targets: 1,
        render_max_retries: 0,
        render_backoff_base_ms: 0,
    }
}

pub(crate) fn write_targets(dir: &Path, yaml: &str) {
    std::fs::write(dir.join("targets.yaml"), yaml).unwrap();
}
