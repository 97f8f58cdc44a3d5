//! Classifies the authentication outcome by polling the supplicant log.

use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

use crate::poll::wait_until;

/// Marker the supplicant writes on completion; matched case-sensitively.
const SUCCESS_MARKER: &str = "EAP authentication completed";
/// Failure marker; matched case-insensitively, the daemon's casing varies.
const FAILURE_MARKER: &str = "authentication failed";

const LOG_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Terminal classification of one authentication attempt. Failed and
/// TimedOut are expected outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthOutcome {
	Success,
	Failed,
	TimedOut,
}

fn classify(log: &str) -> Option<AuthOutcome> {
	if log.contains(SUCCESS_MARKER) {
		return Some(AuthOutcome::Success);
	}
	if log.to_lowercase().contains(FAILURE_MARKER) {
		return Some(AuthOutcome::Failed);
	}
	None
}

/// Polls `log_path` at 1 s cadence until a marker appears or `timeout`
/// elapses. The whole file is re-read every iteration; the supplicant
/// appends and no offset is tracked. A missing or partially written log
/// reads as empty; invalid byte sequences are replaced, never an error.
pub async fn await_outcome(log_path: &Path, timeout: Duration) -> AuthOutcome {
	let deadline = Instant::now() + timeout;
	let matched = wait_until(deadline, LOG_POLL_INTERVAL, || {
		let bytes = std::fs::read(log_path).unwrap_or_default();
		classify(&String::from_utf8_lossy(&bytes))
	})
	.await;

	let outcome = matched.unwrap_or(AuthOutcome::TimedOut);
	debug!(target = "dot1x.watcher", outcome = ?outcome, "authentication outcome");
	outcome
}
