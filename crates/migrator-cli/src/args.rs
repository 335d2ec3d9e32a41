use clap::{Parser, Subcommand};

use crate::cli::{PlanCommands, RollbackArgs, RunArgs};

/// Plan, validate, execute and roll back repository migrations
///
/// A migration plan is a JSON file holding an ordered list of steps (moving
/// files and folders, renaming namespaces, editing project references and
/// properties). Build the plan with `plan` subcommands, check it with
/// `plan validate`, preview it with `run --dry-run`, apply it with `run`, and
/// undo the reversible part with `rollback`.
#[derive(Parser)]
#[command(version, about, name = "migrator")]
pub struct Args {
    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the migrator CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Create and edit plan files
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Validate and execute a plan
    #[command(alias = "r")]
    Run(RunArgs),
    /// Reverse the completed steps of an executed plan
    Rollback(RollbackArgs),
}
