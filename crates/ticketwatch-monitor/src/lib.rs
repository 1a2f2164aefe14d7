//! Change detection and signal extraction for monitored ticket pages.
//!
//! Per target the pipeline is render → fingerprint → extract signals →
//! decide → notify. State (last fingerprint per URL) is loaded once before a
//! run and written back once after it.

pub mod decision;
pub mod error;
pub mod fingerprint;
pub mod outcome;
pub mod runner;
mod shots;
pub mod signals;
pub mod state;

pub use decision::{decide, Decision, Reason};
pub use error::StateError;
pub use fingerprint::{fingerprint, Fingerprint};
pub use outcome::{RunOutcome, TargetReport};
pub use runner::{Runner, RunnerConfig};
pub use signals::SignalExtractor;
pub use state::{StateMap, StateRecord, StateStore};
