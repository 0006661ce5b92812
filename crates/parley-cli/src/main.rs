use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::run::RunArgs;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Hold one conversation between the Expert and the Researcher
    Run(RunArgs),
    /// Print the version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stderr, so logs never interleave with the rendered conversation
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => commands::run::execute(args).await,
        Command::Version => commands::version::execute(),
    }
}
