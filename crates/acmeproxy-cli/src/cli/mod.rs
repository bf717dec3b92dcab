//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let ctx = commands::Context {
        output_format: cli.output.unwrap_or(OutputFormat::Pretty),
    };

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(ctx, args).await,
        Commands::Check(args) => commands::check::execute(&ctx, &args),
        Commands::Present(args) => commands::challenge::present(ctx, args).await,
        Commands::Cleanup(args) => commands::challenge::cleanup(ctx, args).await,
        Commands::Providers => commands::providers::execute(&ctx),
    }
}
