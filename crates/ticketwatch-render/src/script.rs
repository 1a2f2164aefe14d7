//! Browser-side program executed by the engine's `/function` endpoint.
//!
//! The engine runs it in a fresh incognito context per request and tears the
//! context down when the function settles. Parameters arrive through
//! `context` (see [`FunctionContext`]).

use std::time::Duration;

use serde::Serialize;

use crate::policy::{NavigationPolicy, Viewport, WaitUntil};

pub(crate) const RENDER_FUNCTION: &str = r#"export default async function ({ page, context }) {
  try {
    await page.setUserAgent(context.userAgent);
    await page.setViewport(context.viewport);
    await page.setExtraHTTPHeaders({ "Accept-Language": context.acceptLanguage });
    await page.goto(context.url, { waitUntil: context.waitUntil, timeout: context.timeoutMs });

    let consentDismissed = false;
    for (const selector of context.consentSelectors) {
      try {
        const el = await page.$(selector);
        if (el) {
          await Promise.race([
            el.click(),
            new Promise((resolve) => setTimeout(resolve, context.consentClickTimeoutMs)),
          ]);
          consentDismissed = true;
          break;
        }
      } catch (e) {}
    }

    await page.evaluate(
      (fraction) => window.scrollTo(0, (document.body ? document.body.scrollHeight : 0) * fraction),
      context.scrollFraction,
    );
    await new Promise((resolve) => setTimeout(resolve, context.settleDelayMs));

    const html = await page.content();
    const text = context.extractText
      ? await page.evaluate(() => (document.body ? document.body.innerText || "" : ""))
      : "";
    const screenshot = context.captureScreenshot
      ? await page.screenshot({ fullPage: true, encoding: "base64" })
      : null;

    return {
      data: { html, text, screenshot, consentDismissed },
      type: "application/json",
    };
  } finally {
    await page.close().catch(() => {});
  }
}
"#;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FunctionContext<'a> {
    pub url: &'a str,
    pub user_agent: &'a str,
    pub accept_language: String,
    pub viewport: Viewport,
    pub wait_until: WaitUntil,
    pub timeout_ms: u64,
    pub consent_selectors: &'a [String],
    pub consent_click_timeout_ms: u64,
    pub scroll_fraction: f64,
    pub settle_delay_ms: u64,
    pub capture_screenshot: bool,
    pub extract_text: bool,
}

impl<'a> FunctionContext<'a> {
    pub(crate) fn new(url: &'a str, policy: &'a NavigationPolicy) -> Self {
        Self {
            url,
            user_agent: &policy.user_agent,
            accept_language: policy.accept_language(),
            viewport: policy.viewport,
            wait_until: policy.wait_until,
            timeout_ms: millis(policy.timeout),
            consent_selectors: &policy.consent_selectors,
            consent_click_timeout_ms: millis(policy.consent_click_timeout),
            scroll_fraction: policy.scroll_fraction,
            settle_delay_ms: millis(policy.settle_delay),
            capture_screenshot: policy.capture_screenshot,
            extract_text: policy.extract_text,
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
