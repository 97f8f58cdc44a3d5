//! DHCP bring-up and interface/routing state inspection. Everything here is
//! non-fatal: absence of an address or gateway is reported, not thrown.

use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use tokio::process::Command;
use tokio::time::sleep;
use tracing::{debug, warn};

/// The DHCP client is fire-and-forget; assignment is observed by inspecting
/// the interface after this settle period.
const DHCP_SETTLE: Duration = Duration::from_secs(3);

/// Address state observed after bring-up. Both fields may be absent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkState {
	pub address: Option<String>,
	pub gateway: Option<String>,
}

/// Invokes the DHCP client against `interface`, waits for the lease to
/// settle, and reports the interface's first IPv4 address.
pub async fn acquire_address(interface: &str) -> Option<String> {
	let status = Command::new("dhclient")
		.arg(interface)
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.status()
		.await;
	if let Err(err) = status {
		warn!(target = "dot1x.net", error = %err, "dhclient invocation failed");
	}
	sleep(DHCP_SETTLE).await;
	interface_address(interface).await
}

/// Reads the first IPv4 address currently assigned to `interface`.
pub async fn interface_address(interface: &str) -> Option<String> {
	let output = Command::new("ip")
		.args(["-4", "addr", "show", interface])
		.output()
		.await
		.ok()?;
	let address = parse_inet_address(&String::from_utf8_lossy(&output.stdout));
	debug!(target = "dot1x.net", interface, address = ?address, "interface address");
	address
}

/// Reads the current default gateway, if any.
pub async fn current_gateway() -> Option<String> {
	let output = Command::new("ip").args(["route", "show", "default"]).output().await.ok()?;
	parse_default_gateway(&String::from_utf8_lossy(&output.stdout))
}

fn parse_inet_address(output: &str) -> Option<String> {
	output.lines().find_map(|line| {
		line.trim_start()
			.strip_prefix("inet ")?
			.split_whitespace()
			.next()
			.map(str::to_string)
	})
}

// "default via 192.0.2.1 dev eth0 proto dhcp ..."
fn parse_default_gateway(output: &str) -> Option<String> {
	let mut parts = output.split_whitespace();
	if parts.next()? != "default" || parts.next()? != "via" {
		return None;
	}
	parts.next().map(str::to_string)
}
