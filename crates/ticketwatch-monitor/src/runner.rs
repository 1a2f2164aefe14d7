//! Per-target orchestration: render → fingerprint → extract → decide → notify.
//!
//! Targets are independent. A render or delivery failure is logged and
//! recorded against its own target only; the remaining targets are still
//! evaluated and their state updates kept.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::Instrument;
use ticketwatch_core::{AppConfig, FeatureFlags, SignalSet, Target};
use ticketwatch_notify::{Notifier, Payload};
use ticketwatch_render::{NavigationPolicy, PageRenderer, RenderError, RenderResult};
use uuid::Uuid;

use crate::decision::{decide, Decision, Reason};
use crate::fingerprint::{fingerprint, Fingerprint};
use crate::outcome::{RunOutcome, TargetReport};
use crate::shots;
use crate::signals::SignalExtractor;
use crate::state::{StateMap, StateRecord};

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub policy: NavigationPolicy,
    pub features: FeatureFlags,
    pub chat_id: Option<i64>,
    pub shots_dir: Option<PathBuf>,
    pub max_concurrent_targets: usize,
    /// Upper bound on one target's render, retries included.
    pub render_deadline: Duration,
    /// Render and decide, but neither deliver nor update state.
    pub dry_run: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let policy = NavigationPolicy::default();
        Self {
            render_deadline: policy.overall_deadline(),
            policy,
            features: FeatureFlags::default(),
            chat_id: None,
            shots_dir: None,
            max_concurrent_targets: 1,
            dry_run: false,
        }
    }
}

impl RunnerConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        let policy = NavigationPolicy::from_app_config(config);
        Self {
            render_deadline: render_deadline(&policy, config.render_max_retries),
            policy,
            features: config.features,
            chat_id: config.chat_id,
            shots_dir: config.shots_dir.clone(),
            max_concurrent_targets: config.max_concurrent_targets,
            dry_run: false,
        }
    }
}

/// Every attempt gets the full per-render deadline, plus the longest
/// back-off the renderer may sleep between attempts.
fn render_deadline(policy: &NavigationPolicy, max_retries: u32) -> Duration {
    const MAX_BACKOFF: Duration = Duration::from_secs(30);
    let attempts = max_retries.saturating_add(1);
    policy
        .overall_deadline()
        .saturating_add(MAX_BACKOFF)
        .saturating_mul(attempts)
        .saturating_sub(MAX_BACKOFF)
}

/// Result of evaluating one target: the report plus the state record to
/// store for it, if any.
struct Evaluation {
    report: TargetReport,
    record: Option<StateRecord>,
}

pub struct Runner {
    renderer: Arc<dyn PageRenderer>,
    notifier: Arc<dyn Notifier>,
    extractor: SignalExtractor,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        notifier: Arc<dyn Notifier>,
        extractor: SignalExtractor,
        config: RunnerConfig,
    ) -> Self {
        Self {
            renderer,
            notifier,
            extractor,
            config,
        }
    }

    /// Evaluate every target and return the updated state with the run outcome.
    ///
    /// `prior` is consumed and returned with updates merged in after all
    /// targets have finished. Records for targets no longer configured are
    /// kept as-is.
    pub async fn run(&self, targets: &[Target], prior: StateMap) -> (StateMap, RunOutcome) {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = tracing::info_span!("run", %run_id);

        let max_concurrent = self.config.max_concurrent_targets.max(1);
        let prior_ref = &prior;

        let pending: Vec<_> = targets
            .iter()
            .map(|target| {
                let previous = prior_ref.get(&target.url).cloned();
                let target_span = tracing::info_span!("target", url = %target.url);
                self.evaluate(target, previous).instrument(target_span)
            })
            .collect();

        let evaluations: Vec<Evaluation> = stream::iter(pending)
            .buffered(max_concurrent)
            .collect()
            .instrument(span.clone())
            .await;

        let mut state = prior;
        let mut reports = Vec::with_capacity(evaluations.len());
        for evaluation in evaluations {
            if let Some(record) = evaluation.record {
                state.insert(evaluation.report.url.clone(), record);
            }
            reports.push(evaluation.report);
        }

        let outcome = RunOutcome {
            run_id,
            started_at,
            finished_at: Utc::now(),
            targets: reports,
        };

        span.in_scope(|| {
            if outcome.failed() > 0 {
                tracing::warn!(
                    failed_targets = outcome.failed(),
                    total_targets = targets.len(),
                    "some targets failed during run"
                );
            }
            tracing::info!(
                reported = outcome.reported(),
                skipped = outcome.skipped(),
                failed = outcome.failed(),
                "run complete"
            );
        });

        (state, outcome)
    }

    async fn evaluate(&self, target: &Target, previous: Option<StateRecord>) -> Evaluation {
        let page = match self.render(target).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(url = %target.url, label = target.label(), error = %e, "render failed");
                return Evaluation {
                    report: failed(target, Reason::RenderFailed, &e),
                    record: None,
                };
            }
        };

        let current = fingerprint(&page.html);
        let signals = self.extractor.extract(&page.text, &page.html);
        let decision = decide(previous.as_ref().map(|r| &r.fingerprint), &current, &signals);

        tracing::debug!(
            url = %target.url,
            fingerprint = %current,
            ?signals,
            consent_dismissed = page.consent_dismissed,
            %decision,
            "target evaluated"
        );

        // `decide` only yields Skip or Report; ReportError is assigned below
        // when rendering or delivery fails.
        if let Decision::Skip(_) = decision {
            tracing::info!(url = %target.url, "no change & no signal");
            let record = previous.map(|prev| StateRecord {
                fingerprint: current,
                last_posted_at: prev.last_posted_at,
            });
            return Evaluation {
                report: report(target, decision, None),
                record: if self.config.dry_run { None } else { record },
            };
        }

        self.deliver(target, page, current, signals, decision.reason())
            .await
    }

    /// Render with an outer deadline on top of the renderer's own navigation
    /// timeout, so a hung engine call cannot stall the run.
    async fn render(&self, target: &Target) -> Result<RenderResult, RenderError> {
        let policy = &self.config.policy;
        match tokio::time::timeout(
            self.config.render_deadline,
            self.renderer.render(&target.url, policy),
        )
        .await
        {
            Ok(result) => result,
            Err(_elapsed) => Err(RenderError::Timeout {
                url: target.url.clone(),
                timeout_secs: self.config.render_deadline.as_secs(),
            }),
        }
    }

    async fn deliver(
        &self,
        target: &Target,
        page: RenderResult,
        current: Fingerprint,
        signals: SignalSet,
        reason: Reason,
    ) -> Evaluation {
        let screenshot_path = match (&self.config.shots_dir, &page.screenshot) {
            (Some(dir), Some(png)) if self.config.features.capture_screenshot => {
                match shots::save_screenshot(dir, target.label(), png).await {
                    Ok(path) => Some(path),
                    Err(e) => {
                        tracing::warn!(url = %target.url, error = %e, "could not save screenshot");
                        None
                    }
                }
            }
            _ => None,
        };

        let payload = self.build_payload(target, page, signals, reason);

        if self.config.dry_run {
            tracing::info!(url = %target.url, %reason, "dry-run: would post");
            return Evaluation {
                report: TargetReport {
                    screenshot_path,
                    ..report(target, Decision::Report(reason), None)
                },
                record: None,
            };
        }

        match self.notifier.notify(&payload).await {
            Ok(()) => {
                tracing::info!(url = %target.url, label = target.label(), %reason, "posted");
                Evaluation {
                    report: TargetReport {
                        screenshot_path,
                        ..report(target, Decision::Report(reason), None)
                    },
                    record: Some(StateRecord {
                        fingerprint: current,
                        last_posted_at: Utc::now(),
                    }),
                }
            }
            Err(e) => {
                tracing::error!(url = %target.url, label = target.label(), error = %e, "webhook delivery failed");
                Evaluation {
                    report: TargetReport {
                        screenshot_path,
                        ..failed(target, Reason::DeliveryFailed, &e)
                    },
                    record: None,
                }
            }
        }
    }

    fn build_payload(
        &self,
        target: &Target,
        page: RenderResult,
        signals: SignalSet,
        reason: Reason,
    ) -> Payload {
        let features = self.config.features;
        let mut payload = Payload::new(target, page.html, reason.as_str())
            .with_chat_id(self.config.chat_id)
            .with_signals(signals);

        if features.extract_text {
            payload = payload.with_text(&page.text);
        }
        if features.capture_screenshot {
            if let Some(png) = &page.screenshot {
                payload = payload.with_screenshot(png);
            }
        }
        if features.include_heuristics {
            payload = payload.with_heuristics(self.extractor.config());
        }
        payload
    }
}

fn report(target: &Target, decision: Decision, error: Option<String>) -> TargetReport {
    TargetReport {
        url: target.url.clone(),
        label: target.label().to_string(),
        decision,
        error,
        screenshot_path: None,
    }
}

fn failed(target: &Target, reason: Reason, error: &dyn std::fmt::Display) -> TargetReport {
    report(target, Decision::ReportError(reason), Some(error.to_string()))
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
