use thiserror::Error;

pub type Result<T> = std::result::Result<T, Dot1xError>;

/// Fatal session errors. Authentication failure and timeout are ordinary
/// outcomes, not errors; see [`crate::watcher::AuthOutcome`].
#[derive(Debug, Error)]
pub enum Dot1xError {
	/// Session inputs or the configuration artifact could not be prepared.
	#[error("configuration error: {0}")]
	Config(String),

	/// The supplicant could not be launched or never finished initializing.
	#[error("supplicant launch error: {0}")]
	Launch(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
