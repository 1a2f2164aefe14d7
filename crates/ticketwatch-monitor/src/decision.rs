//! Change decision: should this evaluation be reported?

use serde::Serialize;
use ticketwatch_core::SignalSet;

use crate::fingerprint::Fingerprint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    FirstSeen,
    NoChangeNoSignal,
    ContentChanged,
    SignalPresent,
    RenderFailed,
    DeliveryFailed,
}

impl Reason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::FirstSeen => "first-seen",
            Reason::NoChangeNoSignal => "no-change-no-signal",
            Reason::ContentChanged => "content-changed",
            Reason::SignalPresent => "signal-present",
            Reason::RenderFailed => "render-failed",
            Reason::DeliveryFailed => "delivery-failed",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip(Reason),
    Report(Reason),
    ReportError(Reason),
}

impl Decision {
    #[must_use]
    pub fn reason(self) -> Reason {
        match self {
            Decision::Skip(r) | Decision::Report(r) | Decision::ReportError(r) => r,
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, Decision::ReportError(_))
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Skip(r) => write!(f, "skip ({r})"),
            Decision::Report(r) => write!(f, "report ({r})"),
            Decision::ReportError(r) => write!(f, "error ({r})"),
        }
    }
}

/// Decide whether a freshly evaluated page is reported.
///
/// - No previous fingerprint: report, first time this target is seen.
/// - Unchanged and no sector or positive-availability signal: skip. Unchanged
///   pages without interesting keywords are assumed uninteresting, trading
///   some recall for fewer notifications.
/// - Anything else: report.
///
/// `is_likely_blocked` never changes the outcome; it travels with the
/// payload as metadata. Never returns [`Decision::ReportError`]; the runner
/// assigns that when rendering or delivery fails.
#[must_use]
pub fn decide(previous: Option<&Fingerprint>, current: &Fingerprint, signals: &SignalSet) -> Decision {
    match previous {
        None => Decision::Report(Reason::FirstSeen),
        Some(prev) if prev != current => Decision::Report(Reason::ContentChanged),
        Some(_) if signals.is_interesting() => Decision::Report(Reason::SignalPresent),
        Some(_) => Decision::Skip(Reason::NoChangeNoSignal),
    }
}
