use clap::Parser;
use myday::cli::commands::Cli;
use myday::cli::handlers;
use myday::io::config_io;

fn main() {
    let cli = Cli::parse();

    let config = match config_io::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log.level);

    if let Err(e) = handlers::dispatch(cli, &config) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for `--json` consumers.
/// `RUST_LOG` overrides the configured level.
fn init_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
