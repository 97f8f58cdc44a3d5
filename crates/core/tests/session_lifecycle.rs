use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dot1x::{AuthOutcome, SessionConfig, SessionController, SessionPaths, SessionState, SupervisorOptions, TeardownMode};
use tempfile::TempDir;

/// Stub supplicant. Argument order matches the real invocation
/// (`-D wired -i IFACE -c CONF -f LOG -B -P PIDFILE`): the handshake file is
/// the last argument, the log destination the eighth.
fn write_stub(dir: &Path, log_line: Option<&str>) -> PathBuf {
	let log_write = match log_line {
		Some(line) => format!("echo '{line}' > \"$8\""),
		None => ": > \"$8\"".to_string(),
	};
	let body = format!(
		"#!/bin/sh\nfor a; do last=\"$a\"; done\n{log_write}\necho $$ > \"$last\"\n"
	);
	let path = dir.join("stub-supplicant");
	fs::write(&path, body).unwrap();
	fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
	path
}

fn controller(tmp: &TempDir, stub: &Path, timeout: Duration) -> (SessionController, SessionPaths) {
	let paths = SessionPaths::under(tmp.path());
	let session = SessionController::new(
		SessionConfig {
			interface: "lo".to_string(),
			username: "alice".to_string(),
			password: "pw".to_string(),
		},
		paths.clone(),
		SupervisorOptions {
			program: stub.to_string_lossy().into_owned(),
		},
		timeout,
	);
	(session, paths)
}

#[tokio::test]
async fn successful_authentication_reaches_authenticated() {
	let tmp = TempDir::new().unwrap();
	let stub = write_stub(tmp.path(), Some("EAP authentication completed"));
	let (mut session, paths) = controller(&tmp, &stub, Duration::from_secs(30));

	let outcome = session.authenticate().await.unwrap();
	assert_eq!(outcome, AuthOutcome::Success);
	assert_eq!(session.state(), SessionState::Authenticated);
	assert!(session.supplicant_pid().is_some());
	assert!(paths.config.exists());

	session.teardown(TeardownMode::Leave).await;
	assert_eq!(session.state(), SessionState::LeftAuthenticated);
	assert!(!paths.config.exists());
	assert!(!paths.log.exists());
	assert!(!paths.pid.exists());
}

#[tokio::test]
async fn failed_authentication_is_an_outcome_not_an_error() {
	let tmp = TempDir::new().unwrap();
	let stub = write_stub(tmp.path(), Some("eth0: Authentication FAILED"));
	let (mut session, _paths) = controller(&tmp, &stub, Duration::from_secs(30));

	let outcome = session.authenticate().await.unwrap();
	assert_eq!(outcome, AuthOutcome::Failed);
	assert_eq!(session.state(), SessionState::AuthFailed);
}

#[tokio::test(start_paused = true)]
async fn silent_supplicant_times_out() {
	let tmp = TempDir::new().unwrap();
	let stub = write_stub(tmp.path(), None);
	let (mut session, _paths) = controller(&tmp, &stub, Duration::from_secs(30));

	let outcome = session.authenticate().await.unwrap();
	assert_eq!(outcome, AuthOutcome::TimedOut);
	assert_eq!(session.state(), SessionState::AuthFailed);
}

#[tokio::test]
async fn config_artifact_is_owner_only_during_the_session() {
	let tmp = TempDir::new().unwrap();
	let stub = write_stub(tmp.path(), Some("EAP authentication completed"));
	let (mut session, paths) = controller(&tmp, &stub, Duration::from_secs(30));

	session.authenticate().await.unwrap();
	let mode = fs::metadata(&paths.config).unwrap().permissions().mode();
	assert_eq!(mode & 0o777, 0o600);

	session.teardown(TeardownMode::Leave).await;
}

#[tokio::test]
async fn teardown_after_failed_start_tolerates_missing_artifacts() {
	let tmp = TempDir::new().unwrap();
	let paths = SessionPaths::under(tmp.path());
	let mut session = SessionController::new(
		SessionConfig {
			interface: "lo".to_string(),
			username: "alice".to_string(),
			password: "pw".to_string(),
		},
		paths.clone(),
		SupervisorOptions {
			program: "definitely-not-a-supplicant".to_string(),
		},
		Duration::from_secs(30),
	);

	let err = session.authenticate().await.unwrap_err();
	assert!(err.to_string().contains("not found on PATH"));
	assert_eq!(session.supplicant_pid(), None);

	// No process was ever obtained; teardown must not signal anything and
	// must clean whatever artifacts were materialized.
	session.teardown(TeardownMode::Leave).await;
	assert!(!paths.config.exists());
	assert!(!paths.pid.exists());
}
