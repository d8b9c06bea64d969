use clap::Parser;
use ruff::common::config::{load_config, CliArgs, SessionConfig};
use ruff::server;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "ruff=info,tower_http=warn";

#[tokio::main]
async fn main() {
    // Logs on stderr, share URL and QR on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = CliArgs::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: CliArgs) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let session_config = SessionConfig::resolve(&config, &cli)?;
    server::start_session(&session_config).await
}
