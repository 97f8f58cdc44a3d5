use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "dot1x")]
#[command(about = "Drive a wired 802.1X authentication session end-to-end")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Network interface to authenticate (prompted when omitted)
    #[arg(short, long)]
    pub interface: Option<String>,

    /// 802.1X identity (prompted when omitted)
    #[arg(short, long)]
    pub username: Option<String>,

    /// 802.1X password; the masked prompt is preferred over this flag
    #[arg(long, value_name = "SECRET")]
    pub password: Option<String>,

    /// Seconds to wait for an authentication outcome
    #[arg(short, long, default_value = "30")]
    pub timeout: u64,

    /// What to do with the interface after a successful session
    #[arg(long, value_enum, default_value = "ask")]
    pub on_exit: ExitChoice,

    /// Supplicant binary to launch
    #[arg(long, default_value = "wpa_supplicant")]
    pub supplicant: String,

    /// Print a machine-readable session summary on completion
    #[arg(long)]
    pub json: bool,
}

/// Post-session interface disposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum ExitChoice {
    /// Prompt on the success path
    #[default]
    Ask,
    /// Always restore the pre-authentication state
    Reset,
    /// Keep the authenticated session
    Leave,
}
