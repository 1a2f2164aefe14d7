use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One monitored page. `url` is the key into the state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub url: String,
    #[serde(default)]
    label: Option<String>,
}

impl Target {
    #[must_use]
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: Some(label.into()),
        }
    }

    /// Human-readable label, falling back to the URL when none was configured.
    #[must_use]
    pub fn label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ => &self.url,
        }
    }
}

/// Load and validate the target list.
///
/// The file is a sequence of `{url, label}` records. It is parsed with
/// `serde_yaml`, so both `urls.json` and a YAML equivalent are accepted.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_targets(path: &Path) -> Result<Vec<Target>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TargetsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_targets(&content)
}

/// Parse and validate a target list from its textual form.
///
/// # Errors
///
/// Returns `ConfigError` if the content cannot be parsed or fails validation.
pub fn parse_targets(content: &str) -> Result<Vec<Target>, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let targets: Vec<Target> = serde_yaml::from_str(content)?;
    validate_targets(&targets)?;
    Ok(targets)
}

fn validate_targets(targets: &[Target]) -> Result<(), ConfigError> {
    let mut seen_urls = HashSet::new();

    for target in targets {
        let url = target.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation(
                "target url must be non-empty".to_string(),
            ));
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "target '{}' has unsupported url '{url}'; only http and https are allowed",
                target.label()
            )));
        }

        if !seen_urls.insert(url.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate target url: '{url}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "targets_test.rs"]
mod tests;
