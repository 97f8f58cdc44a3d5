//! Bounded polling used wherever the external processes offer no blocking
//! wait primitive: the handshake-file wait and the log watch.

use std::time::Duration;

use tokio::time::{Instant, sleep};

/// Polls `check` at a fixed `interval` until it yields `Some` or `deadline`
/// passes. Always runs at least one check, even with an already-expired
/// deadline, so callers classify current state rather than racing the clock.
pub async fn wait_until<T, F>(deadline: Instant, interval: Duration, mut check: F) -> Option<T>
where
	F: FnMut() -> Option<T>,
{
	loop {
		if let Some(value) = check() {
			return Some(value);
		}
		if Instant::now() >= deadline {
			return None;
		}
		sleep(interval).await;
	}
}
