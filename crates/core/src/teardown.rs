//! Teardown planning and best-effort execution.
//!
//! Step selection is a pure function of the mode and the supervised-process
//! handle, so the per-mode step set is unit-testable without side effects.
//! The executor runs the selected steps in order and never lets one step's
//! failure stop the rest; every sub-step tolerates repetition, so a teardown
//! interrupted midway can simply be run again.

use std::fs;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::SessionPaths;
use crate::supervisor;

/// Settle after the logoff so the authenticator observes it.
const LOGOFF_SETTLE: Duration = Duration::from_secs(1);
/// Settle between link down and up so the upstream switch drops the port
/// back to an unauthenticated state.
const BOUNCE_SETTLE: Duration = Duration::from_secs(10);

/// Operator's end-of-session choice. Every failure or interrupt path uses
/// [`TeardownMode::Reset`]; [`TeardownMode::Leave`] is reachable only from a
/// successfully authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownMode {
	Reset,
	Leave,
}

/// One step of the teardown sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
	/// EAPOL logoff via the supplicant's control interface.
	Logoff,
	/// SIGTERM to the supervised supplicant.
	KillSupplicant(i32),
	/// Terminate any DHCP client bound to the interface.
	KillDhcpClient,
	/// Link down, settle, link up, flush residual addresses.
	BounceInterface,
	/// Delete the config, log, and handshake artifacts.
	RemoveArtifacts,
}

/// Selects the teardown steps for `mode`. The kill step appears only when a
/// PID was ever obtained; artifact removal is always last and always present.
pub fn plan(mode: TeardownMode, pid: Option<i32>) -> Vec<Step> {
	match mode {
		TeardownMode::Reset => {
			let mut steps = vec![Step::Logoff];
			if let Some(pid) = pid {
				steps.push(Step::KillSupplicant(pid));
			}
			steps.extend([Step::KillDhcpClient, Step::BounceInterface, Step::RemoveArtifacts]);
			steps
		}
		// Leave keeps the authenticated session and its DHCP lease alive;
		// only the secret-bearing artifacts must go.
		TeardownMode::Leave => vec![Step::RemoveArtifacts],
	}
}

/// Executes `steps` in order. Failures are logged and swallowed; teardown
/// must finish from any partial-progress state.
pub async fn execute(steps: &[Step], interface: &str, paths: &SessionPaths) {
	for step in steps {
		debug!(target = "dot1x.teardown", step = ?step, "running teardown step");
		match step {
			Step::Logoff => {
				if run_quiet("wpa_cli", &["-i", interface, "logoff"]).await {
					sleep(LOGOFF_SETTLE).await;
				} else {
					warn!(target = "dot1x.teardown", "could not send EAPOL logoff");
				}
			}
			Step::KillSupplicant(pid) => {
				if let Err(err) = supervisor::terminate(*pid) {
					warn!(target = "dot1x.teardown", pid, error = %err, "could not terminate supplicant");
				}
			}
			Step::KillDhcpClient => {
				// pkill exits non-zero when nothing matched; that is fine.
				run_quiet("pkill", &["-f", &format!("dhclient.*{interface}")]).await;
			}
			Step::BounceInterface => {
				if !run_quiet("ip", &["link", "set", "dev", interface, "down"]).await {
					warn!(target = "dot1x.teardown", interface, "could not bring interface down");
				}
				sleep(BOUNCE_SETTLE).await;
				if !run_quiet("ip", &["link", "set", "dev", interface, "up"]).await {
					warn!(target = "dot1x.teardown", interface, "could not bring interface up");
				}
				run_quiet("ip", &["addr", "flush", "dev", interface]).await;
			}
			Step::RemoveArtifacts => {
				for path in [&paths.config, &paths.log, &paths.pid] {
					remove_artifact(path);
				}
			}
		}
	}
}

fn remove_artifact(path: &Path) {
	match fs::remove_file(path) {
		Ok(()) => debug!(target = "dot1x.teardown", path = %path.display(), "removed artifact"),
		Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
		Err(err) => warn!(target = "dot1x.teardown", path = %path.display(), error = %err, "could not remove artifact"),
	}
}

async fn run_quiet(program: &str, args: &[&str]) -> bool {
	Command::new(program)
		.args(args)
		.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.status()
		.await
		.map(|status| status.success())
		.unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;

	#[test]
	fn reset_plan_always_attempts_logoff_and_bounce() {
		let steps = plan(TeardownMode::Reset, Some(4242));
		assert_eq!(
			steps,
			vec![
				Step::Logoff,
				Step::KillSupplicant(4242),
				Step::KillDhcpClient,
				Step::BounceInterface,
				Step::RemoveArtifacts,
			]
		);
	}

	#[test]
	fn reset_plan_without_pid_skips_the_kill() {
		let steps = plan(TeardownMode::Reset, None);
		assert!(!steps.iter().any(|s| matches!(s, Step::KillSupplicant(_))));
		assert!(steps.contains(&Step::Logoff));
		assert!(steps.contains(&Step::BounceInterface));
		assert_eq!(steps.last(), Some(&Step::RemoveArtifacts));
	}

	#[test]
	fn leave_plan_never_logs_off_or_bounces() {
		let steps = plan(TeardownMode::Leave, Some(4242));
		assert_eq!(steps, vec![Step::RemoveArtifacts]);
	}

	#[tokio::test]
	async fn artifact_removal_is_idempotent() {
		let tmp = TempDir::new().unwrap();
		let paths = SessionPaths::under(tmp.path());
		fs::write(&paths.config, "network={}").unwrap();
		fs::write(&paths.log, "log").unwrap();
		// No pid file: absence must not be an error.

		let steps = plan(TeardownMode::Leave, None);
		execute(&steps, "lo", &paths).await;
		assert!(!paths.config.exists());
		assert!(!paths.log.exists());

		// Simulates a mid-teardown interrupt followed by a second teardown.
		execute(&steps, "lo", &paths).await;
		assert!(!paths.config.exists());
		assert!(!paths.log.exists());
		assert!(!paths.pid.exists());
	}
}
