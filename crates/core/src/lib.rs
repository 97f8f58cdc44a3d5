//! Wired 802.1X session lifecycle controller.
//!
//! Materializes a credential-bearing supplicant configuration, launches and
//! supervises the external supplicant daemon, classifies the authentication
//! outcome by polling its log, brings up IP connectivity over DHCP, and
//! restores the interface to a known state on every exit path.

/// Session inputs, artifact paths, and supplicant config rendering.
pub mod config;
/// Error taxonomy shared across the crate.
pub mod error;
/// DHCP bring-up and interface/routing state inspection.
pub mod net;
/// Bounded deadline polling shared by the handshake and log waits.
pub mod poll;
/// Reachability checks against the gateway and well-known hosts.
pub mod probe;
/// Session orchestration and the lifecycle state machine.
pub mod session;
/// Supplicant process launch, handshake, and termination.
pub mod supervisor;
/// Teardown planning and best-effort execution.
pub mod teardown;
/// Authentication outcome detection over the supplicant log.
pub mod watcher;

/// Session inputs and artifact locations.
pub use config::{SessionConfig, SessionPaths};
/// Crate error type and result alias.
pub use error::{Dot1xError, Result};
/// Observed address state after bring-up.
pub use net::NetworkState;
/// Per-target reachability result.
pub use probe::ProbeResult;
/// Session controller and lifecycle types.
pub use session::{SessionController, SessionState, SessionSummary};
/// Supplicant launch options and process handle.
pub use supervisor::{SupervisorOptions, SupplicantProcess};
/// Operator's end-of-session choice.
pub use teardown::TeardownMode;
/// Terminal classification of one authentication attempt.
pub use watcher::AuthOutcome;
