//! Webtainer server binary.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use webtainer::cli::{cmd_routes, cmd_serve, Cli, Commands};
use webtainer::Config;
use webtainer_core::ServletFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from(cli.server);
    let factory = ServletFactory::with_builtins();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd_serve(config, factory, ctrl_c()).await,
        Commands::Routes { json } => {
            let mut stdout = std::io::stdout().lock();
            cmd_routes(&config.servlet_config, &factory, json, &mut stdout).map(|_| ())
        }
    }
}

/// Logs go to stderr; `LOG_FORMAT=json` selects the JSON formatter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(err) => {
            tracing::error!(error = %err, "failed to listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
