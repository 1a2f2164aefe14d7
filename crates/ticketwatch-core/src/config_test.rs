use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("WEBHOOK_URL", "https://hooks.example.com/webhook/tickets");
    m
}

#[test]
fn parse_bool_accepts_common_spellings() {
    assert_eq!(parse_bool("true"), Some(true));
    assert_eq!(parse_bool(" YES "), Some(true));
    assert_eq!(parse_bool("1"), Some(true));
    assert_eq!(parse_bool("off"), Some(false));
    assert_eq!(parse_bool("0"), Some(false));
    assert_eq!(parse_bool("maybe"), None);
}

#[test]
fn build_app_config_fails_without_webhook_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "WEBHOOK_URL"),
        "expected MissingEnvVar(WEBHOOK_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_webhook_url_as_missing() {
    let mut map = HashMap::new();
    map.insert("WEBHOOK_URL", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "WEBHOOK_URL"),
        "expected MissingEnvVar(WEBHOOK_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.webhook_url, "https://hooks.example.com/webhook/tickets");
    assert!(cfg.webhook_auth.is_none());
    assert_eq!(cfg.webhook_timeout_secs, 30);
    assert!(cfg.chat_id.is_none());
    assert_eq!(cfg.browserless_url, "http://localhost:3000");
    assert!(cfg.browserless_token.is_none());
    assert_eq!(cfg.targets_path, PathBuf::from("./urls.json"));
    assert_eq!(cfg.state_path, PathBuf::from("./state.json"));
    assert!(cfg.shots_dir.is_none());
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.nav_timeout_secs, 60);
    assert_eq!(cfg.settle_delay_ms, 800);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.locale, "it-IT");
    assert_eq!(cfg.features, FeatureFlags::default());
    assert_eq!(cfg.max_concurrent_targets, 1);
    assert_eq!(cfg.render_max_retries, 0);
    assert_eq!(cfg.render_backoff_base_ms, 1000);
}

#[test]
fn chat_id_is_parsed_as_integer() {
    let mut map = full_env();
    map.insert("CHAT_ID", "123456789");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.chat_id, Some(123_456_789));
}

#[test]
fn chat_id_accepts_negative_group_ids() {
    let mut map = full_env();
    map.insert("CHAT_ID", "-100200300");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.chat_id, Some(-100_200_300));
}

#[test]
fn chat_id_invalid() {
    let mut map = full_env();
    map.insert("CHAT_ID", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CHAT_ID"),
        "expected InvalidEnvVar(CHAT_ID), got: {result:?}"
    );
}

#[test]
fn nav_timeout_secs_override() {
    let mut map = full_env();
    map.insert("TICKETWATCH_NAV_TIMEOUT_SECS", "120");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.nav_timeout_secs, 120);
}

#[test]
fn nav_timeout_secs_zero_is_rejected() {
    let mut map = full_env();
    map.insert("TICKETWATCH_NAV_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TICKETWATCH_NAV_TIMEOUT_SECS"),
        "expected InvalidEnvVar(TICKETWATCH_NAV_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn nav_timeout_secs_above_bound_is_rejected() {
    let mut map = full_env();
    map.insert("TICKETWATCH_NAV_TIMEOUT_SECS", "18446744073709551615");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TICKETWATCH_NAV_TIMEOUT_SECS"),
        "expected InvalidEnvVar(TICKETWATCH_NAV_TIMEOUT_SECS), got: {result:?}"
    );

    map.insert("TICKETWATCH_NAV_TIMEOUT_SECS", "3601");
    assert!(build_app_config(lookup_from_map(&map)).is_err());

    map.insert("TICKETWATCH_NAV_TIMEOUT_SECS", "3600");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.nav_timeout_secs, MAX_NAV_TIMEOUT_SECS);
}

#[test]
fn settle_delay_above_bound_is_rejected() {
    let mut map = full_env();
    map.insert("TICKETWATCH_SETTLE_DELAY_MS", "18446744073709551615");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TICKETWATCH_SETTLE_DELAY_MS"),
        "expected InvalidEnvVar(TICKETWATCH_SETTLE_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn nav_timeout_secs_invalid() {
    let mut map = full_env();
    map.insert("TICKETWATCH_NAV_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TICKETWATCH_NAV_TIMEOUT_SECS"),
        "expected InvalidEnvVar(TICKETWATCH_NAV_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn feature_flags_can_be_disabled() {
    let mut map = full_env();
    map.insert("TICKETWATCH_CAPTURE_SCREENSHOT", "false");
    map.insert("TICKETWATCH_INCLUDE_HEURISTICS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.features.capture_screenshot);
    assert!(cfg.features.extract_text);
    assert!(!cfg.features.include_heuristics);
}

#[test]
fn feature_flag_invalid() {
    let mut map = full_env();
    map.insert("TICKETWATCH_EXTRACT_TEXT", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TICKETWATCH_EXTRACT_TEXT"),
        "expected InvalidEnvVar(TICKETWATCH_EXTRACT_TEXT), got: {result:?}"
    );
}

#[test]
fn max_concurrent_targets_override() {
    let mut map = full_env();
    map.insert("TICKETWATCH_MAX_CONCURRENT_TARGETS", "4");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_concurrent_targets, 4);
}

#[test]
fn render_max_retries_invalid() {
    let mut map = full_env();
    map.insert("TICKETWATCH_RENDER_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TICKETWATCH_RENDER_MAX_RETRIES"),
        "expected InvalidEnvVar(TICKETWATCH_RENDER_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn shots_dir_and_paths_override() {
    let mut map = full_env();
    map.insert("TICKETWATCH_SHOTS_DIR", "./shots");
    map.insert("TICKETWATCH_TARGETS_PATH", "/etc/ticketwatch/urls.yaml");
    map.insert("TICKETWATCH_STATE_PATH", "/var/lib/ticketwatch/state.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.shots_dir, Some(PathBuf::from("./shots")));
    assert_eq!(cfg.targets_path, PathBuf::from("/etc/ticketwatch/urls.yaml"));
    assert_eq!(
        cfg.state_path,
        PathBuf::from("/var/lib/ticketwatch/state.json")
    );
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = full_env();
    map.insert("WEBHOOK_AUTH", "super-secret");
    map.insert("BROWSERLESS_TOKEN", "token-123");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(!rendered.contains("token-123"));
    assert!(rendered.contains("[redacted]"));
}
