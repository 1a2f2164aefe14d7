//! Page rendering through a headless browser engine.
//!
//! The engine itself is an external collaborator. [`PageRenderer`] is the
//! seam the monitor depends on; [`BrowserlessRenderer`] is the production
//! implementation that drives a Browserless-compatible `/function` endpoint.

pub mod client;
pub mod error;
pub mod policy;
mod retry;
mod script;
pub mod types;

pub use client::BrowserlessRenderer;
pub use error::RenderError;
pub use policy::{NavigationPolicy, Viewport, WaitUntil};
pub use types::RenderResult;

use async_trait::async_trait;

/// Capability: render a URL and return its DOM content, visible text and
/// optionally a screenshot.
///
/// Every call must run in its own isolated browsing context (no cookies or
/// navigation state shared with other calls) and release that context before
/// returning, whether rendering succeeded or not.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str, policy: &NavigationPolicy)
        -> Result<RenderResult, RenderError>;

    fn name(&self) -> &str;
}
