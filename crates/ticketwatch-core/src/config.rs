use std::path::PathBuf;

use crate::app_config::{AppConfig, FeatureFlags};
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Upper bound for the navigation timeout. Render deadlines are derived
/// from it by adding durations, so it must stay far from `u64::MAX`.
pub const MAX_NAV_TIMEOUT_SECS: u64 = 3600;

pub const MAX_SETTLE_DELAY_MS: u64 = 60_000;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the process environment,
/// so tests can drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_flag = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match optional(var) {
            None => Ok(default),
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got \"{raw}\""),
            }),
        }
    };

    let webhook_url = require("WEBHOOK_URL")?;
    let webhook_auth = optional("WEBHOOK_AUTH");
    let webhook_timeout_secs = parse_u64("TICKETWATCH_WEBHOOK_TIMEOUT_SECS", "30")?;

    let chat_id = optional("CHAT_ID")
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: "CHAT_ID".to_string(),
                    reason: e.to_string(),
                })
        })
        .transpose()?;

    let browserless_url = or_default("BROWSERLESS_URL", "http://localhost:3000");
    let browserless_token = optional("BROWSERLESS_TOKEN");

    let targets_path = PathBuf::from(or_default("TICKETWATCH_TARGETS_PATH", "./urls.json"));
    let state_path = PathBuf::from(or_default("TICKETWATCH_STATE_PATH", "./state.json"));
    let shots_dir = optional("TICKETWATCH_SHOTS_DIR").map(PathBuf::from);
    let log_level = or_default("TICKETWATCH_LOG_LEVEL", "info");

    let nav_timeout_secs = parse_u64("TICKETWATCH_NAV_TIMEOUT_SECS", "60")?;
    check_range("TICKETWATCH_NAV_TIMEOUT_SECS", nav_timeout_secs, 1, MAX_NAV_TIMEOUT_SECS)?;
    let settle_delay_ms = parse_u64("TICKETWATCH_SETTLE_DELAY_MS", "800")?;
    check_range("TICKETWATCH_SETTLE_DELAY_MS", settle_delay_ms, 0, MAX_SETTLE_DELAY_MS)?;
    let user_agent = or_default("TICKETWATCH_USER_AGENT", DEFAULT_USER_AGENT);
    let locale = or_default("TICKETWATCH_LOCALE", "it-IT");

    let features = FeatureFlags {
        capture_screenshot: parse_flag("TICKETWATCH_CAPTURE_SCREENSHOT", true)?,
        extract_text: parse_flag("TICKETWATCH_EXTRACT_TEXT", true)?,
        include_heuristics: parse_flag("TICKETWATCH_INCLUDE_HEURISTICS", true)?,
    };

    let max_concurrent_targets = parse_usize("TICKETWATCH_MAX_CONCURRENT_TARGETS", "1")?;
    let render_max_retries = parse_u32("TICKETWATCH_RENDER_MAX_RETRIES", "0")?;
    let render_backoff_base_ms = parse_u64("TICKETWATCH_RENDER_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        webhook_url,
        webhook_auth,
        webhook_timeout_secs,
        chat_id,
        browserless_url,
        browserless_token,
        targets_path,
        state_path,
        shots_dir,
        log_level,
        nav_timeout_secs,
        settle_delay_ms,
        user_agent,
        locale,
        features,
        max_concurrent_targets,
        render_max_retries,
        render_backoff_base_ms,
    })
}

/// Parse the usual spellings of a boolean env var. Returns `None` for
/// anything unrecognised.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn check_range(var: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("must be between {min} and {max}, got {value}"),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
