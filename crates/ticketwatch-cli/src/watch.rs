//! Scheduled runs.
//!
//! Each cron tick is a full run with its own state load and save. A tick that
//! fires while the previous run is still in flight is skipped so two runs
//! never write the state file at once.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use ticketwatch_core::AppConfig;

use crate::run::run_once;

/// How one scheduled tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickResult {
    /// The previous run still held the lock; nothing was done.
    Skipped,
    Completed { failed: usize },
    /// The run could not start or its state could not be saved.
    Aborted,
}

/// One scheduled run, unless another is still in flight.
pub(crate) async fn run_tick(config: &AppConfig, in_flight: &Mutex<()>) -> TickResult {
    let Ok(_guard) = in_flight.try_lock() else {
        tracing::warn!("scheduler: previous run still in progress; skipping tick");
        return TickResult::Skipped;
    };

    match run_once(config, false).await {
        Ok(outcome) if outcome.is_success() => {
            tracing::info!(run_id = %outcome.run_id, "scheduler: run complete");
            TickResult::Completed { failed: 0 }
        }
        Ok(outcome) => {
            tracing::warn!(
                run_id = %outcome.run_id,
                failed = outcome.failed(),
                "scheduler: run finished with failed targets"
            );
            TickResult::Completed {
                failed: outcome.failed(),
            }
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "scheduler: run aborted");
            TickResult::Aborted
        }
    }
}

/// Run on `cron` until ctrl-c.
///
/// # Errors
///
/// Returns an error if the cron expression is invalid or the scheduler
/// cannot be started or stopped. Failed runs are logged, not returned.
pub(crate) async fn watch(config: Arc<AppConfig>, cron: &str) -> anyhow::Result<()> {
    let mut scheduler = JobScheduler::new().await?;
    let in_flight = Arc::new(Mutex::new(()));

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let config = Arc::clone(&config);
        let in_flight = Arc::clone(&in_flight);

        Box::pin(async move {
            run_tick(&config, &in_flight).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(cron, "watching; press ctrl-c to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("received shutdown signal, stopping scheduler");
    scheduler.shutdown().await?;
    Ok(())
}
