//! Launches the external supplicant daemon and owns its termination.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::{SessionConfig, SessionPaths};
use crate::error::{Dot1xError, Result};
use crate::poll::wait_until;

const PID_WAIT_ATTEMPTS: u32 = 5;
const PID_WAIT_INTERVAL: Duration = Duration::from_secs(1);

/// Launch options for the external supplicant.
#[derive(Debug, Clone)]
pub struct SupervisorOptions {
	/// Binary name or path; resolved on PATH before spawning.
	pub program: String,
}

impl Default for SupervisorOptions {
	fn default() -> Self {
		Self {
			program: "wpa_supplicant".to_string(),
		}
	}
}

/// Handle for the daemonized supplicant, obtained from the handshake file.
/// The pid references a live process only between a successful [`start`] and
/// the teardown kill step; lookups after that must tolerate ESRCH.
#[derive(Debug, Clone)]
pub struct SupplicantProcess {
	pub pid: i32,
	pub log_path: PathBuf,
	pub pid_path: PathBuf,
}

/// Starts the supplicant in daemonized mode against the wired driver and
/// waits for it to write its PID to the handshake file.
pub async fn start(config: &SessionConfig, paths: &SessionPaths, options: &SupervisorOptions) -> Result<SupplicantProcess> {
	// A stale handshake file from a previous run would satisfy the wait below.
	if let Err(err) = fs::remove_file(&paths.pid) {
		if err.kind() != std::io::ErrorKind::NotFound {
			warn!(target = "dot1x.supervisor", error = %err, "could not remove stale pid file");
		}
	}

	let program = which::which(&options.program).map_err(|_| {
		Dot1xError::Launch(format!(
			"{} not found on PATH; install it or pass --supplicant",
			options.program
		))
	})?;

	let output = Command::new(&program)
		.args(["-D", "wired"])
		.args(["-i", &config.interface])
		.arg("-c")
		.arg(&paths.config)
		.arg("-f")
		.arg(&paths.log)
		.arg("-B")
		.arg("-P")
		.arg(&paths.pid)
		.stdin(Stdio::null())
		.output()
		.await
		.map_err(|e| Dot1xError::Launch(format!("failed to spawn {}: {e}", program.display())))?;

	if !output.status.success() {
		let stderr = String::from_utf8_lossy(&output.stderr);
		return Err(Dot1xError::Launch(format!(
			"{} exited with {} before daemonizing: {}",
			options.program,
			output.status,
			stderr.trim()
		)));
	}

	let deadline = Instant::now() + PID_WAIT_INTERVAL * PID_WAIT_ATTEMPTS;
	let handshake = wait_until(deadline, PID_WAIT_INTERVAL, || paths.pid.exists().then_some(())).await;
	if handshake.is_none() {
		return Err(Dot1xError::Launch(format!(
			"{} did not write {} in time",
			options.program,
			paths.pid.display()
		)));
	}

	let pid = read_pid_file(&paths.pid)?;
	debug!(target = "dot1x.supervisor", pid, "supplicant daemonized");
	Ok(SupplicantProcess {
		pid,
		log_path: paths.log.clone(),
		pid_path: paths.pid.clone(),
	})
}

fn read_pid_file(path: &Path) -> Result<i32> {
	let content = fs::read_to_string(path)?;
	content.trim().parse().map_err(|_| {
		Dot1xError::Launch(format!(
			"handshake file {} did not contain a PID: {:?}",
			path.display(),
			content.trim()
		))
	})
}

/// Returns `true` when a process with `pid` appears alive.
pub fn pid_is_alive(pid: i32) -> bool {
	if pid <= 0 {
		return false;
	}
	if Path::new("/proc").join(pid.to_string()).exists() {
		return true;
	}
	unsafe { libc::kill(pid, 0) == 0 }
}

/// Sends SIGTERM to `pid`. A process that no longer exists counts as
/// terminated, not as an error.
pub fn terminate(pid: i32) -> Result<()> {
	if unsafe { libc::kill(pid, libc::SIGTERM) } == 0 {
		return Ok(());
	}
	let err = std::io::Error::last_os_error();
	if err.raw_os_error() == Some(libc::ESRCH) {
		debug!(target = "dot1x.supervisor", pid, "process already gone");
		return Ok(());
	}
	Err(err.into())
}
