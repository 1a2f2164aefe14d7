//! Configuration and target-list validation without touching the network.

use ticketwatch_core::{load_targets, AppConfig, SignalConfig};
use ticketwatch_monitor::SignalExtractor;
use ticketwatch_notify::WebhookNotifier;
use ticketwatch_render::BrowserlessRenderer;

/// Validate everything a run needs before it starts rendering.
///
/// # Errors
///
/// Returns the first problem found: unreadable or invalid target list, a
/// signal pattern that does not compile, or an unusable webhook or browser
/// engine URL.
pub(crate) fn check(config: &AppConfig) -> anyhow::Result<()> {
    let targets = load_targets(&config.targets_path)?;
    SignalExtractor::new(SignalConfig::default())?;
    BrowserlessRenderer::from_app_config(config)?;
    WebhookNotifier::from_app_config(config)?;

    println!("config ok: {} target(s) in {}", targets.len(), config.targets_path.display());
    for target in &targets {
        println!("  {}  {}", target.label(), target.url);
    }
    println!("state file: {}", config.state_path.display());
    println!("browser engine: {}", config.browserless_url);
    Ok(())
}
