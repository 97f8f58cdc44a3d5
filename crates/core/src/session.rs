//! End-to-end session orchestration and the lifecycle state machine.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{self, SessionConfig, SessionPaths};
use crate::error::Result;
use crate::net::{self, NetworkState};
use crate::probe::{self, ProbeResult};
use crate::supervisor::{self, SupervisorOptions, SupplicantProcess};
use crate::teardown::{self, TeardownMode};
use crate::watcher::{self, AuthOutcome};

/// Lifecycle phases of one session. Transitions are automatic except the
/// operator's post-success leave-or-reset choice; Aborting is reachable from
/// any phase on interrupt or unhandled error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
	Init,
	Configuring,
	Supervising,
	Authenticating,
	Authenticated,
	AuthFailed,
	NetworkUp,
	Tested,
	ResetDone,
	LeftAuthenticated,
	Aborting,
}

/// Everything observed during one session, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
	pub interface: String,
	pub outcome: AuthOutcome,
	pub network: NetworkState,
	pub probes: Vec<ProbeResult>,
}

/// Drives the session phases in order and owns the supervised-process
/// handle. Exactly one teardown executes per session, from whichever exit
/// path reaches it first; later invocations are no-ops.
pub struct SessionController {
	config: SessionConfig,
	paths: SessionPaths,
	options: SupervisorOptions,
	auth_timeout: Duration,
	state: SessionState,
	process: Option<SupplicantProcess>,
	torn_down: bool,
}

impl SessionController {
	pub fn new(config: SessionConfig, paths: SessionPaths, options: SupervisorOptions, auth_timeout: Duration) -> Self {
		Self {
			config,
			paths,
			options,
			auth_timeout,
			state: SessionState::Init,
			process: None,
			torn_down: false,
		}
	}

	pub fn state(&self) -> SessionState {
		self.state
	}

	pub fn interface(&self) -> &str {
		&self.config.interface
	}

	/// PID of the supervised supplicant, once the handshake completed.
	pub fn supplicant_pid(&self) -> Option<i32> {
		self.process.as_ref().map(|p| p.pid)
	}

	fn transition(&mut self, next: SessionState) {
		debug!(target = "dot1x.session", from = ?self.state, to = ?next, "state transition");
		self.state = next;
	}

	/// Configures, launches, and watches the supplicant through to an
	/// authentication outcome. Fatal setup and supervision errors bubble;
	/// Failed and TimedOut are returned as ordinary outcomes.
	pub async fn authenticate(&mut self) -> Result<AuthOutcome> {
		self.transition(SessionState::Configuring);
		self.config.validate()?;
		config::write_supplicant_config(&self.config, &self.paths)?;

		self.transition(SessionState::Supervising);
		let process = supervisor::start(&self.config, &self.paths, &self.options).await?;
		info!(
			target = "dot1x.session",
			pid = process.pid,
			interface = %self.config.interface,
			"supplicant started"
		);
		self.process = Some(process);

		self.transition(SessionState::Authenticating);
		let outcome = watcher::await_outcome(&self.paths.log, self.auth_timeout).await;
		self.transition(match outcome {
			AuthOutcome::Success => SessionState::Authenticated,
			AuthOutcome::Failed | AuthOutcome::TimedOut => SessionState::AuthFailed,
		});
		Ok(outcome)
	}

	/// Attempts DHCP bring-up and gateway discovery. Partial results are
	/// fine; the session continues with whatever was obtained.
	pub async fn bring_up(&mut self) -> NetworkState {
		let address = net::acquire_address(&self.config.interface).await;
		let gateway = net::current_gateway().await;
		self.transition(SessionState::NetworkUp);
		NetworkState { address, gateway }
	}

	/// Probes the gateway plus the well-known targets, in order.
	pub async fn run_probes(&mut self, network: &NetworkState) -> Vec<ProbeResult> {
		let targets = std::iter::once(network.gateway.clone())
			.chain(probe::DEFAULT_TARGETS.iter().map(|t| Some((*t).to_string())));
		let results = probe::probe(targets).await;
		self.transition(SessionState::Tested);
		results
	}

	/// Runs the teardown sequence for `mode`. Safe to invoke from any
	/// partial-progress state; a second invocation after a completed
	/// teardown is a no-op, and a re-run after an interrupted one simply
	/// repeats the (repetition-tolerant) steps.
	pub async fn teardown(&mut self, mode: TeardownMode) {
		if self.torn_down {
			debug!(target = "dot1x.session", "teardown already completed; skipping");
			return;
		}
		let steps = teardown::plan(mode, self.supplicant_pid());
		teardown::execute(&steps, &self.config.interface, &self.paths).await;
		self.torn_down = true;
		self.process = None;
		self.transition(match mode {
			TeardownMode::Reset => SessionState::ResetDone,
			TeardownMode::Leave => SessionState::LeftAuthenticated,
		});
	}

	/// Routes an interrupt or unhandled error to a Reset-mode teardown.
	pub async fn abort(&mut self) {
		if self.torn_down {
			return;
		}
		self.transition(SessionState::Aborting);
		self.teardown(TeardownMode::Reset).await;
	}
}
