//! Parley REST API entry point.
//!
//! Binary name: `parleyd`.
//!
//! Parses CLI arguments, loads configuration, initializes tracing and the
//! database, wires services, and serves the API.

mod http;
mod settings;
mod state;

use clap::Parser;
use tokio::sync::broadcast;

use state::AppState;

/// Conversation backend serving the Parley REST API.
#[derive(Parser)]
#[command(name = "parleyd", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "parley.toml")]
    config: std::path::PathBuf,

    /// Override the listen address, e.g. 127.0.0.1:3000.
    #[arg(long)]
    listen: Option<String>,

    /// Answer with the canned static client instead of the HTTP backend.
    #[arg(long)]
    static_inference: bool,

    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = settings::load(&cli.config)?;

    let default_filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    parley_observe::tracing_setup::init_tracing(&config.telemetry, default_filter)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init(&config, cli.static_inference).await?;

    // Drain the event bus into the log so domain events are observable
    // without an external subscriber attached.
    let mut events = state.events.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(envelope) => {
                    tracing::debug!(kind = envelope.kind(), id = %envelope.id, "domain event");
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event log subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let addr = cli.listen.unwrap_or_else(|| config.server.bind_addr());
    let app = http::router::build_router(state);

    tracing::info!(%addr, "parley listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    parley_observe::tracing_setup::shutdown_tracing();
    Ok(())
}
