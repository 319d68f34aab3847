//! biosketch - Biosketch CLI
//!
//! Runs the sketch pipeline locally, without the server.

use anyhow::Result;
use biosketch_core::config::EnvVars;
use biosketch_core::ServiceConfig;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("biosketch=warn".parse()?))
        .init();

    let cli = Cli::parse();

    // Read the environment once; commands get what they need from it
    let env = EnvVars::load();

    match cli.command {
        Commands::Generate { url, json } => {
            let config = ServiceConfig::from_env(&env)?;
            commands::generate::execute(&url, json, &config).await
        }
        Commands::Models { generate_only } => {
            let config = ServiceConfig::from_env(&env)?;
            commands::models::execute(generate_only, &config).await
        }
        Commands::Doctor { online } => commands::doctor::execute(online, &env).await,
        Commands::Version => {
            println!("biosketch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
