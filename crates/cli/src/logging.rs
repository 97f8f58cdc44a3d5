use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber. `RUST_LOG` wins over the `-v` count.
pub fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "dot1x=info,dot1x_cli=info",
        _ => "dot1x=debug,dot1x_cli=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
