mod cli;
mod error;
mod exposition;
mod server;

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use omada_config::Config;
use omada_core::Collector;

use crate::cli::Cli;
use crate::error::ExporterError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run(cli: Cli) -> Result<(), ExporterError> {
    let config = Config::load(cli.config.as_deref())?;
    let controller_config = config.to_controller_config()?;

    // Startup authentication failure is fatal.
    let session = omada_core::connect(&controller_config).await?;
    info!(
        url = %controller_config.url,
        "collecting wireless station metrics"
    );

    let collector = Arc::new(Collector::new(session));
    server::serve(cli.http, server::router(collector)).await
}
