//! Delivery of change notifications to the downstream webhook.

pub mod client;
pub mod error;
pub mod payload;

pub use client::WebhookNotifier;
pub use error::DeliveryError;
pub use payload::{Heuristics, Payload, TEXT_EXCERPT_CHARS};

use async_trait::async_trait;

/// Delivers one payload. Exactly one attempt per call; the caller decides
/// what a failure means for the run.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, payload: &Payload) -> Result<(), DeliveryError>;
}
