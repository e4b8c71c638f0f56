use clap::Parser;
use tracing_subscriber::EnvFilter;

use http_failure::{config, is_production, server, services::UserService};

#[derive(Parser)]
#[command(name = "http-failure", about = "Reference REST API for HTTP failure signals")]
struct Args {
    /// Address to bind (overrides API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides API_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up APP_ENV, API_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = config::config();
    tracing::info!("Starting http-failure in {:?} mode", config.environment);
    if is_production!() && config.api.expose_internal_errors {
        tracing::warn!("Internal error details are exposed to clients in production");
    }

    let mut api = config.api.clone();
    if let Some(host) = args.host {
        api.host = host;
    }
    if let Some(port) = args.port {
        api.port = port;
    }

    server::serve(UserService::in_memory(), &api).await
}
