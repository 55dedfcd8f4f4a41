use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

pub mod chat;
pub mod serve;

use crate::api::init_tracing;
use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Run the web UI
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Start a support session in the terminal
    Chat {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    run_with(Cli::parse()).await
}

pub async fn run_with(args: Cli) -> Result<()> {
    let Some(command) = args.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    dotenvy::dotenv().ok();

    // Keep the terminal chat quiet unless something goes wrong
    let log_level = match command {
        Command::Chat {} => "warn",
        Command::Serve { .. } => "debug",
    };
    init_tracing(log_level);

    // Fail before doing anything else if the API key is missing
    let config = AppConfig::from_env()?;

    // Handle each sub command
    match command {
        Command::Serve { host, port } => {
            serve::run(host, port, config).await?;
        }
        Command::Chat {} => {
            chat::run(config).await?;
        }
    }

    Ok(())
}
