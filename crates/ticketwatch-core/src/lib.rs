pub mod app_config;
pub mod config;
pub mod signals;
pub mod targets;

pub use app_config::{AppConfig, FeatureFlags};
pub use config::{load_app_config, load_app_config_from_env};
pub use signals::{SignalConfig, SignalSet};
pub use targets::{load_targets, Target};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read targets file {path}: {source}")]
    TargetsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse targets file: {0}")]
    TargetsFileParse(#[from] serde_yaml::Error),

    #[error("invalid pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}
