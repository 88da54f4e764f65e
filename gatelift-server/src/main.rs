use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatelift_server::{api, config::GateliftConfig};

#[derive(Parser)]
#[command(name = "gatelift")]
#[command(about = "A/B test decision dashboard for mobile game experiments")]
#[command(version)]
struct Cli {
    /// Port for the dashboard (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a gatelift.toml config file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Enable debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "gatelift=debug,tower_http=debug"
    } else {
        "gatelift=info"
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => GateliftConfig::load(path)?,
        None => GateliftConfig::discover().unwrap_or_default(),
    };

    let port = cli.port.unwrap_or(config.server.port);
    let app = api::create_router(config);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    tracing::info!("gatelift dashboard listening on http://127.0.0.1:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
