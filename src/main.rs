use anyhow::{Context, Result};
use clap::Parser;
use linkshort::config::{self, Config};
use linkshort::server;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// URL shortener HTTP service.
#[derive(Parser)]
#[command(name = "linkshort")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read environment variables from this file instead of `.env`
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to read env file {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    let config = config::load_from_env().context("Invalid configuration")?;

    init_tracing(&config);
    config.print_summary();

    server::run(config).await
}
