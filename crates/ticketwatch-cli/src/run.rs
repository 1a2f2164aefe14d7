//! One full pass over the target list.
//!
//! State is loaded once before the pass and written once after it. The
//! renderer and notifier are built per run and dropped when it ends.

use std::process::ExitCode;
use std::sync::Arc;

use ticketwatch_core::{load_targets, AppConfig, SignalConfig};
use ticketwatch_monitor::{RunOutcome, Runner, RunnerConfig, SignalExtractor, StateStore};
use ticketwatch_notify::WebhookNotifier;
use ticketwatch_render::{BrowserlessRenderer, PageRenderer};

/// Evaluate every configured target once.
///
/// With `dry_run` nothing is posted and the state file is left untouched.
///
/// # Errors
///
/// Returns an error if the target list or state file cannot be read, a
/// client cannot be constructed, or the new state cannot be written.
/// Per-target render and delivery failures are not errors here; they are
/// recorded in the returned [`RunOutcome`].
pub(crate) async fn run_once(config: &AppConfig, dry_run: bool) -> anyhow::Result<RunOutcome> {
    let targets = load_targets(&config.targets_path)?;
    let store = StateStore::new(&config.state_path);
    let prior = store.load()?;

    let renderer = BrowserlessRenderer::from_app_config(config)?;
    let notifier = WebhookNotifier::from_app_config(config)?;
    let extractor = SignalExtractor::new(SignalConfig::default())?;

    tracing::info!(
        targets = targets.len(),
        known = prior.len(),
        renderer = renderer.name(),
        dry_run,
        "starting run"
    );

    let runner = Runner::new(
        Arc::new(renderer),
        Arc::new(notifier),
        extractor,
        RunnerConfig {
            dry_run,
            ..RunnerConfig::from_app_config(config)
        },
    );
    let (state, outcome) = runner.run(&targets, prior).await;

    if dry_run {
        tracing::info!("dry-run: state file not written");
    } else {
        store.save(&state)?;
    }

    Ok(outcome)
}

/// 0 when every target was skipped or reported, 1 otherwise.
pub(crate) fn exit_code(outcome: &RunOutcome) -> ExitCode {
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

pub(crate) fn print_summary(outcome: &RunOutcome) {
    for line in summary_lines(outcome) {
        println!("{line}");
    }
}

#[allow(clippy::cast_precision_loss)]
fn summary_lines(outcome: &RunOutcome) -> Vec<String> {
    let mut lines: Vec<String> = outcome
        .targets
        .iter()
        .map(|t| match &t.error {
            Some(err) => format!("{:<28} {}  {}: {err}", t.decision.to_string(), t.label, t.url),
            None => format!("{:<28} {}  {}", t.decision.to_string(), t.label, t.url),
        })
        .collect();

    let elapsed = outcome.finished_at - outcome.started_at;
    lines.push(format!(
        "run {}: {} reported, {} skipped, {} failed in {:.1}s",
        outcome.run_id,
        outcome.reported(),
        outcome.skipped(),
        outcome.failed(),
        elapsed.num_milliseconds() as f64 / 1000.0,
    ));
    lines
}
