//! Reachability checks against the gateway and well-known hosts.

use std::process::Stdio;

use serde::Serialize;
use tokio::process::Command;
use tracing::debug;

const PING_COUNT: &str = "3";

/// Hosts probed in addition to the discovered gateway.
pub const DEFAULT_TARGETS: [&str; 2] = ["8.8.8.8", "www.google.com"];

/// Result of one reachability check.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
	pub target: String,
	pub reachable: bool,
}

/// Pings each present target in order; absent targets are skipped and one
/// failure never aborts the remaining checks.
pub async fn probe<I>(targets: I) -> Vec<ProbeResult>
where
	I: IntoIterator<Item = Option<String>>,
{
	let mut results = Vec::new();
	for target in targets.into_iter().flatten() {
		let reachable = ping(&target).await;
		debug!(target = "dot1x.probe", host = %target, reachable, "probe finished");
		results.push(ProbeResult { target, reachable });
	}
	results
}

async fn ping(target: &str) -> bool {
	Command::new("ping")
		.args(["-c", PING_COUNT, target])
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.status()
		.await
		.map(|status| status.success())
		.unwrap_or(false)
}
