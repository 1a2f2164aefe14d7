//! HTTP client for the notification webhook.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use ticketwatch_core::AppConfig;

use crate::error::DeliveryError;
use crate::payload::Payload;
use crate::Notifier;

/// Header carrying the optional static webhook secret.
pub const AUTH_HEADER: &str = "X-Auth";

/// Posts payloads as JSON to a fixed webhook URL.
///
/// Any non-2xx response is a [`DeliveryError::Status`] carrying the status and
/// response body. There is no retry: a failed delivery is surfaced to the
/// caller, which leaves the target's state untouched so the next run reports
/// it again.
pub struct WebhookNotifier {
    client: Client,
    url: Url,
    auth: Option<String>,
}

impl WebhookNotifier {
    /// # Errors
    ///
    /// Returns [`DeliveryError::InvalidUrl`] if `url` does not parse, or
    /// [`DeliveryError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(url: &str, auth: Option<&str>, timeout_secs: u64) -> Result<Self, DeliveryError> {
        let parsed = Url::parse(url).map_err(|e| DeliveryError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ticketwatch/0.1 (page-monitor)")
            .build()?;

        Ok(Self {
            client,
            url: parsed,
            auth: auth.filter(|a| !a.is_empty()).map(str::to_owned),
        })
    }

    /// # Errors
    ///
    /// See [`WebhookNotifier::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, DeliveryError> {
        Self::new(
            &config.webhook_url,
            config.webhook_auth.as_deref(),
            config.webhook_timeout_secs,
        )
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, payload: &Payload) -> Result<(), DeliveryError> {
        let mut request = self.client.post(self.url.clone()).json(payload);
        if let Some(auth) = &self.auth {
            request = request.header(AUTH_HEADER, auth);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(
            url = %payload.url,
            label = %payload.label,
            status = status.as_u16(),
            "posted"
        );
        Ok(())
    }
}
