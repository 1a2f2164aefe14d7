use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error talking to browser engine: {0}")]
    Http(#[from] reqwest::Error),

    #[error("navigation to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("browser engine returned HTTP {status} for {url}: {body}")]
    Engine {
        status: u16,
        url: String,
        body: String,
    },

    #[error("malformed browser engine response for {url}: {source}")]
    Deserialize {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("screenshot for {url} is not valid base64: {source}")]
    Screenshot {
        url: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("invalid target url \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid browser engine base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl RenderError {
    /// `true` when the failure is the navigation deadline being exceeded,
    /// which is an expected outcome for slow or unreachable pages.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            RenderError::Timeout { .. } => true,
            RenderError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
