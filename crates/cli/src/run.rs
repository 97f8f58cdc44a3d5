//! Top-level session flow: input resolution, phase driving, and routing of
//! every exit path (completion, auth failure, interrupt, unexpected error)
//! through exactly one teardown.

use std::time::Duration;

use dot1x::{
    AuthOutcome, NetworkState, SessionController, SessionPaths, SessionSummary, SupervisorOptions,
    TeardownMode,
};

use crate::cli::{Cli, ExitChoice};
use crate::{prompt, report};

pub async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = prompt::resolve_session_config(&cli)?;
    let mut controller = SessionController::new(
        config,
        SessionPaths::default(),
        SupervisorOptions {
            program: cli.supplicant.clone(),
        },
        Duration::from_secs(cli.timeout),
    );

    let driven = tokio::select! {
        result = drive(&mut controller, &cli) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match driven {
        Some(Ok(code)) => Ok(code),
        Some(Err(err)) => {
            controller.abort().await;
            Err(err)
        }
        // Interrupt: restore state, then exit cleanly.
        None => {
            report::interrupted();
            controller.abort().await;
            Ok(0)
        }
    }
}

async fn drive(controller: &mut SessionController, cli: &Cli) -> anyhow::Result<i32> {
    report::waiting_for_auth(controller.interface());
    let outcome = controller.authenticate().await?;
    report::auth_outcome(outcome);

    // Failed and TimedOut are clean, expected ends: full reset, exit 0,
    // no bring-up or probing attempted.
    if outcome != AuthOutcome::Success {
        emit_json(
            cli,
            &SessionSummary {
                interface: controller.interface().to_string(),
                outcome,
                network: NetworkState::default(),
                probes: Vec::new(),
            },
        )?;
        controller.teardown(TeardownMode::Reset).await;
        report::reset_done();
        return Ok(0);
    }

    let network = controller.bring_up().await;
    report::network(&network);
    let probes = controller.run_probes(&network).await;
    report::probes(&probes);

    emit_json(
        cli,
        &SessionSummary {
            interface: controller.interface().to_string(),
            outcome,
            network: network.clone(),
            probes,
        },
    )?;

    let mode = match cli.on_exit {
        ExitChoice::Reset => TeardownMode::Reset,
        ExitChoice::Leave => TeardownMode::Leave,
        ExitChoice::Ask => tokio::task::spawn_blocking(prompt::choose_exit_mode).await??,
    };
    controller.teardown(mode).await;
    match mode {
        TeardownMode::Reset => report::reset_done(),
        TeardownMode::Leave => report::left_authenticated(&network),
    }
    Ok(0)
}

fn emit_json(cli: &Cli, summary: &SessionSummary) -> anyhow::Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }
    Ok(())
}
