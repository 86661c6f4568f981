mod cmd;
mod config;
mod error;
mod input;

use clap::Parser;
use config::{Cli, Commands};

#[tokio::main]
async fn main() {
    // stdout занят выводом filter'а, логи только в stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Table(args) => cmd::table::run(args).await,
        Commands::Filter(args) => cmd::filter::run(args).await,
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
