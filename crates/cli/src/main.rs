use clap::Parser;
use dot1x_cli::{cli::Cli, logging, run};
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run::run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            error!(target = "dot1x", error = %err, "session failed");
            std::process::exit(1);
        }
    }
}
