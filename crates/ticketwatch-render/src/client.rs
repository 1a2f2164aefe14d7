//! HTTP client for a Browserless-compatible `/function` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use ticketwatch_core::AppConfig;

use crate::error::RenderError;
use crate::policy::NavigationPolicy;
use crate::retry::retry_with_backoff;
use crate::script::{FunctionContext, RENDER_FUNCTION};
use crate::types::RenderResult;
use crate::PageRenderer;

/// Body returned by [`RENDER_FUNCTION`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionResponse {
    html: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    screenshot: Option<String>,
    #[serde(default)]
    consent_dismissed: bool,
}

/// Renders pages by running a small puppeteer program inside a remote
/// headless browser.
///
/// Each [`render`](PageRenderer::render) call is one `POST /function`
/// request; the engine opens a fresh browsing context for it and closes that
/// context when the request ends, including when the client gives up on it.
pub struct BrowserlessRenderer {
    client: Client,
    endpoint: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl BrowserlessRenderer {
    /// Creates a renderer with retries disabled.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidBaseUrl`] if `base_url` is not a valid
    /// URL, or [`RenderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, RenderError> {
        Self::with_retries(base_url, token, 0, 0)
    }

    /// Creates a renderer that retries transient engine failures up to
    /// `max_retries` times.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidBaseUrl`] if `base_url` is not a valid
    /// URL, or [`RenderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_retries(
        base_url: &str,
        token: Option<&str>,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, RenderError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ticketwatch/0.1 (page-monitor)")
            .build()?;

        Ok(Self {
            client,
            endpoint: Self::function_url(base_url, token)?,
            max_retries,
            backoff_base_ms,
        })
    }

    /// # Errors
    ///
    /// See [`BrowserlessRenderer::with_retries`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, RenderError> {
        Self::with_retries(
            &config.browserless_url,
            config.browserless_token.as_deref(),
            config.render_max_retries,
            config.render_backoff_base_ms,
        )
    }

    fn function_url(base_url: &str, token: Option<&str>) -> Result<Url, RenderError> {
        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised).map_err(|e| RenderError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let mut url = base
            .join("function")
            .map_err(|e| RenderError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        if let Some(token) = token {
            url.query_pairs_mut().append_pair("token", token);
        }

        Ok(url)
    }

    async fn render_once(
        &self,
        url: &str,
        policy: &NavigationPolicy,
    ) -> Result<RenderResult, RenderError> {
        let timeout_secs = policy.timeout.as_secs();
        let as_timeout = |e: reqwest::Error| {
            if e.is_timeout() {
                RenderError::Timeout {
                    url: url.to_owned(),
                    timeout_secs,
                }
            } else {
                RenderError::Http(e)
            }
        };

        let body = serde_json::json!({
            "code": RENDER_FUNCTION,
            "context": FunctionContext::new(url, policy),
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .timeout(policy.overall_deadline())
            .json(&body)
            .send()
            .await
            .map_err(as_timeout)?;

        let status = response.status();
        if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
            return Err(RenderError::Timeout {
                url: url.to_owned(),
                timeout_secs,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Engine {
                status: status.as_u16(),
                url: url.to_owned(),
                body,
            });
        }

        let raw = response.text().await.map_err(as_timeout)?;
        let parsed: FunctionResponse =
            serde_json::from_str(&raw).map_err(|e| RenderError::Deserialize {
                url: url.to_owned(),
                source: e,
            })?;

        let screenshot = parsed
            .screenshot
            .filter(|s| !s.is_empty())
            .map(|encoded| {
                base64::engine::general_purpose::STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|e| RenderError::Screenshot {
                        url: url.to_owned(),
                        source: e,
                    })
            })
            .transpose()?;

        Ok(RenderResult {
            html: parsed.html,
            text: parsed.text,
            screenshot,
            consent_dismissed: parsed.consent_dismissed,
        })
    }
}

#[async_trait]
impl PageRenderer for BrowserlessRenderer {
    async fn render(
        &self,
        url: &str,
        policy: &NavigationPolicy,
    ) -> Result<RenderResult, RenderError> {
        validate_target_url(url)?;

        let result = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.render_once(url, policy)
        })
        .await?;

        tracing::debug!(
            url,
            renderer = self.name(),
            html_bytes = result.html.len(),
            text_bytes = result.text.len(),
            screenshot = result.screenshot.is_some(),
            consent_dismissed = result.consent_dismissed,
            "page rendered"
        );
        Ok(result)
    }

    fn name(&self) -> &str {
        "browserless"
    }
}

fn validate_target_url(url: &str) -> Result<(), RenderError> {
    let parsed = Url::parse(url).map_err(|e| RenderError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(RenderError::InvalidUrl {
            url: url.to_owned(),
            reason: format!("only http/https URLs are allowed, got {}", parsed.scheme()),
        });
    }
    Ok(())
}
