use anyhow::Context;
use clap::Parser;
use intake::{Dispatcher, Server};
use intake_core::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "intake", about = "Desi Arms request intake — form submission handler")]
struct Cli {
    /// TOML file layered over the built-in defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address, overriding `server.bind`.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Log at debug level regardless of RUST_LOG and `log.filter`.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    intake::logging::init(&config.log, cli.debug)?;
    tracing::info!(store = %config.store.name, "intake starting");

    let dispatcher = Dispatcher::from_config(&config)?;
    Server::new(config, dispatcher).serve().await
}
