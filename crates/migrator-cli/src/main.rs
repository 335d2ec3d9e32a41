//! Migrator CLI Application
//!
//! Command-line interface for planning, executing and rolling back
//! repository migrations.

mod args;
mod cli;
mod renderer;

use std::process::ExitCode;

use anyhow::Result;
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::{info, warn};
use renderer::TerminalRenderer;
use tokio_util::sync::CancellationToken;
use Commands::*;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::init();

    let Args { no_color, command } = Args::parse();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let cli = Cli::new(TerminalRenderer::new(!no_color), cancel);

    info!("Migrator started");

    let success = match command {
        Plan { command } => cli.handle_plan_command(command).await?,
        Run(args) => cli.run(args).await?,
        Rollback(args) => cli.rollback(args).await?,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
