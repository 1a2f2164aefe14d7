use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook POST failed with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid webhook URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
