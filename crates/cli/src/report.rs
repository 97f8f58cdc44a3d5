//! Operator-facing console output, kept separate from tracing diagnostics.

use colored::Colorize;
use dot1x::{AuthOutcome, NetworkState, ProbeResult};

pub fn waiting_for_auth(interface: &str) {
    println!("{} Waiting for 802.1X authentication on {interface}…", "[*]".blue());
}

pub fn auth_outcome(outcome: AuthOutcome) {
    match outcome {
        AuthOutcome::Success => println!("{} 802.1X authentication succeeded", "[+]".green()),
        AuthOutcome::Failed => println!("{} 802.1X authentication failed", "[-]".red()),
        AuthOutcome::TimedOut => println!("{} 802.1X authentication timed out", "[-]".red()),
    }
}

pub fn network(state: &NetworkState) {
    match &state.address {
        Some(address) => println!("{} IP address acquired: {address}", "[+]".green()),
        None => println!("{} no IP address assigned", "[-]".red()),
    }
    if let Some(gateway) = &state.gateway {
        println!("{} default gateway: {gateway}", "[*]".blue());
    }
}

pub fn probes(results: &[ProbeResult]) {
    println!("{} Reachability:", "[*]".blue());
    for result in results {
        let verdict = if result.reachable { "OK".green() } else { "FAIL".red() };
        println!("    {} … {verdict}", result.target);
    }
}

pub fn interrupted() {
    println!("\n{} Interrupted; restoring interface state…", "[!]".yellow());
}

pub fn reset_done() {
    println!("{} Interface reset to pre-authentication state", "[*]".blue());
}

pub fn left_authenticated(state: &NetworkState) {
    match &state.address {
        Some(address) => println!("{} Leaving interface authenticated with {address}", "[*]".blue()),
        None => println!("{} Leaving interface authenticated", "[*]".blue()),
    }
}
