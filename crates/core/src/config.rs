//! Session inputs and the credential-bearing supplicant configuration.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Dot1xError, Result};

/// Operator-supplied inputs for one authentication session. Immutable after
/// construction; the password is never logged.
#[derive(Clone)]
pub struct SessionConfig {
	pub interface: String,
	pub username: String,
	pub password: String,
}

impl std::fmt::Debug for SessionConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SessionConfig")
			.field("interface", &self.interface)
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

impl SessionConfig {
	/// Checks the interface exists and the credentials survive quoting.
	pub fn validate(&self) -> Result<()> {
		if self.interface.is_empty() {
			return Err(Dot1xError::Config("interface name is empty".into()));
		}
		if !Path::new("/sys/class/net").join(&self.interface).exists() {
			return Err(Dot1xError::Config(format!("no such network interface: {}", self.interface)));
		}
		for (field, value) in [("username", &self.username), ("password", &self.password)] {
			if value.chars().any(char::is_control) {
				return Err(Dot1xError::Config(format!("{field} contains control characters")));
			}
		}
		Ok(())
	}
}

/// Filesystem locations of the session's three artifacts. All are deleted
/// during teardown.
#[derive(Debug, Clone)]
pub struct SessionPaths {
	pub config: PathBuf,
	pub log: PathBuf,
	pub pid: PathBuf,
}

impl Default for SessionPaths {
	fn default() -> Self {
		Self {
			config: PathBuf::from("/tmp/8021x_wpa.conf"),
			log: PathBuf::from("/tmp/wpa_supplicant.log"),
			pid: PathBuf::from("/tmp/wpa_supplicant.pid"),
		}
	}
}

impl SessionPaths {
	/// Places all three artifacts under `dir`.
	pub fn under(dir: &Path) -> Self {
		Self {
			config: dir.join("8021x_wpa.conf"),
			log: dir.join("wpa_supplicant.log"),
			pid: dir.join("wpa_supplicant.pid"),
		}
	}
}

/// Escapes a value for wpa_supplicant's double-quoted string syntax.
fn escape_quoted(value: &str) -> String {
	let mut out = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'\\' => out.push_str("\\\\"),
			'"' => out.push_str("\\\""),
			_ => out.push(c),
		}
	}
	out
}

/// Renders the wired-802.1X network block: PEAP with MSCHAPv2 phase 2,
/// EAPOL key negotiation disabled, scanning off. The `ctrl_interface`
/// directive is what lets `wpa_cli logoff` reach the daemon at teardown.
pub fn render_supplicant_config(config: &SessionConfig) -> String {
	format!(
		"ctrl_interface=DIR=/var/run/wpa_supplicant GROUP=netdev\n\
		 ap_scan=0\n\
		 \n\
		 network={{\n\
		 \tkey_mgmt=IEEE8021X\n\
		 \teap=PEAP\n\
		 \tidentity=\"{}\"\n\
		 \tpassword=\"{}\"\n\
		 \tphase2=\"auth=MSCHAPV2\"\n\
		 \teapol_flags=0\n\
		 }}\n",
		escape_quoted(&config.username),
		escape_quoted(&config.password),
	)
}

/// Writes the configuration artifact and restricts it to owner read/write
/// immediately; it embeds a plaintext secret.
pub fn write_supplicant_config(config: &SessionConfig, paths: &SessionPaths) -> Result<()> {
	fs::write(&paths.config, render_supplicant_config(config))?;
	fs::set_permissions(&paths.config, fs::Permissions::from_mode(0o600))?;
	debug!(
		target = "dot1x.config",
		path = %paths.config.display(),
		"wrote supplicant configuration"
	);
	Ok(())
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;

	fn config(username: &str, password: &str) -> SessionConfig {
		SessionConfig {
			interface: "lo".to_string(),
			username: username.to_string(),
			password: password.to_string(),
		}
	}

	#[test]
	fn artifact_is_owner_only() {
		let tmp = TempDir::new().unwrap();
		let paths = SessionPaths::under(tmp.path());
		write_supplicant_config(&config("alice", "hunter2"), &paths).unwrap();

		let mode = fs::metadata(&paths.config).unwrap().permissions().mode();
		assert_eq!(mode & 0o777, 0o600);
	}

	#[test]
	fn credentials_round_trip_through_the_artifact() {
		let tmp = TempDir::new().unwrap();
		let paths = SessionPaths::under(tmp.path());
		write_supplicant_config(&config("alice@example.org", "s3cr3t pass"), &paths).unwrap();

		let content = fs::read_to_string(&paths.config).unwrap();
		assert!(content.contains("identity=\"alice@example.org\""));
		assert!(content.contains("password=\"s3cr3t pass\""));
		assert!(content.contains("key_mgmt=IEEE8021X"));
		assert!(content.contains("phase2=\"auth=MSCHAPV2\""));
		assert!(content.contains("eapol_flags=0"));
	}

	#[test]
	fn quotes_and_backslashes_are_escaped() {
		let rendered = render_supplicant_config(&config("o\"brien", "a\\b\"c"));
		assert!(rendered.contains("identity=\"o\\\"brien\""));
		assert!(rendered.contains("password=\"a\\\\b\\\"c\""));
	}

	#[test]
	fn control_characters_are_rejected() {
		let err = config("alice", "pass\nword").validate().unwrap_err();
		assert!(matches!(err, Dot1xError::Config(_)));
	}

	#[test]
	fn empty_interface_is_rejected() {
		let mut cfg = config("alice", "pw");
		cfg.interface.clear();
		assert!(cfg.validate().is_err());
	}

	#[test]
	fn unknown_interface_is_rejected() {
		let mut cfg = config("alice", "pw");
		cfg.interface = "definitely-not-a-nic0".to_string();
		assert!(cfg.validate().is_err());
	}

	#[test]
	fn loopback_interface_validates() {
		assert!(config("alice", "pw").validate().is_ok());
	}

	#[test]
	fn debug_output_redacts_the_password() {
		let rendered = format!("{:?}", config("alice", "hunter2"));
		assert!(!rendered.contains("hunter2"));
	}
}
