//! Command argument definitions and their handlers.
//!
//! Each subcommand has a clap `Args` struct; conversions into core types
//! (`Step`, builder settings) live next to the struct, so the core stays free
//! of clap attributes.
//!
//! ```text
//! User Input → CLI Args (clap) → Core types → Planner / Executor → markdown
//! ```
//!
//! Plan files are read and written as JSON. Commands that edit or display a
//! plan read it as-is; `run` and `plan validate` go through the planner's
//! import, which resets the plan to a fresh Draft with pending steps.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use log::{info, warn};
use migrator_core::{
    models::{Action, Plan, PlanStatus, Step},
    ExecutorBuilder, OperationStatus, Planner, PlannerBuilder, Progress,
};
use tokio_util::sync::CancellationToken;

use crate::renderer::TerminalRenderer;

/// Parses a `KEY=VALUE` metadata pair.
fn parse_metadata(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

/// Create a new, empty plan file
#[derive(Args)]
pub struct NewPlanArgs {
    /// Plan file to create
    pub file: PathBuf,
    /// Human-readable plan name
    pub name: String,
    #[arg(short, long, help = "Optional description of what the plan migrates")]
    pub description: Option<String>,
    #[arg(long, help = "Overwrite the plan file if it already exists")]
    pub force: bool,
}

/// Append a step to a plan
///
/// Actions: move_file, move_folder, copy_file, copy_folder, rename_namespace,
/// add_project_reference, remove_project_reference, update_project_property,
/// create_project, delete_project. `rename_namespace` needs
/// `--meta OldNamespace=<ns>`; `update_project_property` needs
/// `--meta PropertyName=<name>`.
#[derive(Args)]
pub struct AddStepArgs {
    /// Plan file to edit
    pub file: PathBuf,
    /// Action to perform
    pub action: Action,
    /// Source path (empty for create_project)
    pub source: String,
    /// Target path, namespace or value (omit for delete_project)
    #[arg(default_value = "")]
    pub target: String,
    #[arg(
        short,
        long = "meta",
        value_name = "KEY=VALUE",
        value_parser = parse_metadata,
        help = "Step metadata, may be repeated"
    )]
    pub metadata: Vec<(String, String)>,
}

impl From<AddStepArgs> for Step {
    fn from(val: AddStepArgs) -> Self {
        val.metadata
            .into_iter()
            .fold(Step::new(val.action, val.source, val.target), |step, (k, v)| {
                step.with_metadata(k, v)
            })
    }
}

/// Remove a step from a plan
#[derive(Args)]
pub struct RemoveStepArgs {
    /// Plan file to edit
    pub file: PathBuf,
    #[arg(help = "Zero-based position of the step to remove")]
    pub position: usize,
}

/// Show a plan file
#[derive(Args)]
pub struct ShowPlanArgs {
    /// Plan file to display
    pub file: PathBuf,
}

/// Validate a plan without executing it
#[derive(Args)]
pub struct ValidatePlanArgs {
    /// Plan file to validate
    pub file: PathBuf,
    #[arg(short, long, help = "Directory relative step paths are resolved against")]
    pub workspace: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a new, empty plan file
    #[command(alias = "n")]
    New(NewPlanArgs),
    /// Append a step to a plan
    #[command(alias = "a")]
    Add(AddStepArgs),
    /// Remove a step from a plan
    #[command(alias = "rm")]
    Remove(RemoveStepArgs),
    /// Show a plan
    #[command(alias = "s")]
    Show(ShowPlanArgs),
    /// Validate a plan
    #[command(alias = "v")]
    Validate(ValidatePlanArgs),
}

/// Validate and execute a plan
#[derive(Args)]
pub struct RunArgs {
    /// Plan file to execute
    pub file: PathBuf,
    #[arg(short, long, help = "Directory relative step paths are resolved against")]
    pub workspace: Option<PathBuf>,
    #[arg(long, help = "Report what each step would do without changing anything")]
    pub dry_run: bool,
    #[arg(short, long, help = "Write the executed plan with step outcomes to this file")]
    pub out: Option<PathBuf>,
    #[arg(long, help = "Glob matching project files", default_value = "*.csproj")]
    pub project_pattern: String,
}

/// Reverse the completed steps of an executed plan
#[derive(Args)]
pub struct RollbackArgs {
    /// Executed plan file, as written by `run --out`
    pub file: PathBuf,
    #[arg(short, long, help = "Directory relative step paths are resolved against")]
    pub workspace: Option<PathBuf>,
    #[arg(long, help = "Report what each step would do without changing anything")]
    pub dry_run: bool,
    #[arg(short, long, help = "Write the executed rollback plan to this file")]
    pub out: Option<PathBuf>,
}

/// Command handlers. Every handler returns whether the command succeeded,
/// which becomes the process exit status.
pub struct Cli {
    renderer: TerminalRenderer,
    cancel: CancellationToken,
}

impl Cli {
    pub fn new(renderer: TerminalRenderer, cancel: CancellationToken) -> Self {
        Self { renderer, cancel }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<bool> {
        match command {
            PlanCommands::New(args) => self.new_plan(args).await,
            PlanCommands::Add(args) => self.add_step(args).await,
            PlanCommands::Remove(args) => self.remove_step(args).await,
            PlanCommands::Show(args) => self.show_plan(&args.file).await,
            PlanCommands::Validate(args) => self.validate_plan(args).await,
        }
    }

    async fn new_plan(&self, args: NewPlanArgs) -> Result<bool> {
        if !args.force && tokio::fs::try_exists(&args.file).await.unwrap_or(false) {
            bail!(
                "Plan file already exists: {} (use --force to overwrite)",
                args.file.display()
            );
        }

        let planner = planner(None).await?;
        let mut plan = planner.create_plan(&args.name);
        if let Some(description) = args.description {
            plan = plan.with_description(description);
        }
        save_plan(&planner, &plan, &args.file).await?;

        self.renderer.render(&format!(
            "{}\n{plan}",
            OperationStatus::success(format!("Created {}", args.file.display()))
        ))?;
        Ok(true)
    }

    async fn add_step(&self, args: AddStepArgs) -> Result<bool> {
        let file = args.file.clone();
        let planner = planner(None).await?;
        let plan = load_plan(&file).await?;
        let plan = planner
            .add_step(&plan, Step::from(args))
            .context("Failed to add step")?;
        save_plan(&planner, &plan, &file).await?;

        let status = OperationStatus::success(format!(
            "Added step {} to {}",
            plan.steps.len(),
            file.display()
        ));
        let step = plan.steps.last().map(ToString::to_string).unwrap_or_default();
        self.renderer.render(&format!("{status}\n{step}"))?;
        Ok(true)
    }

    async fn remove_step(&self, args: RemoveStepArgs) -> Result<bool> {
        let planner = planner(None).await?;
        let plan = load_plan(&args.file).await?;
        let plan = planner
            .remove_step(&plan, args.position)
            .context("Failed to remove step")?;
        save_plan(&planner, &plan, &args.file).await?;

        self.renderer.render(&format!(
            "{}\n{plan}",
            OperationStatus::success(format!(
                "Removed step at position {} from {}",
                args.position,
                args.file.display()
            ))
        ))?;
        Ok(true)
    }

    async fn show_plan(&self, file: &Path) -> Result<bool> {
        let plan = load_plan(file).await?;
        self.renderer.render(&plan.to_string())?;
        Ok(true)
    }

    async fn validate_plan(&self, args: ValidatePlanArgs) -> Result<bool> {
        let planner = planner(args.workspace.as_deref()).await?;
        let plan = import_plan(&planner, &args.file).await?;
        let validation = planner.validate_plan(&plan, &self.cancel).await?;

        self.renderer.render(&validation.to_string())?;
        Ok(validation.is_valid)
    }

    /// Validates, marks ready and executes a plan.
    pub async fn run(&self, args: RunArgs) -> Result<bool> {
        let planner = planner(args.workspace.as_deref()).await?;
        let plan = import_plan(&planner, &args.file).await?;

        let validation = planner.validate_plan(&plan, &self.cancel).await?;
        if !validation.is_valid {
            self.renderer.render(&validation.to_string())?;
            return Ok(false);
        }
        for warning in &validation.warnings {
            warn!("{}", warning.message);
        }

        let plan = planner.mark_ready(&plan)?;
        let executor = ExecutorBuilder::new()
            .with_workspace_root(args.workspace.as_deref())
            .dry_run(args.dry_run)
            .with_project_pattern(args.project_pattern)
            .build()
            .await
            .context("Failed to initialize executor")?;

        let result = executor
            .execute(&plan, Some(&report_progress), &self.cancel)
            .await
            .context("Execution was cancelled")?;

        if let Some(out) = &args.out {
            save_plan(&planner, &result.plan, out).await?;
            info!("Wrote executed plan to {}", out.display());
        }
        self.renderer.render(&result.to_string())?;
        Ok(result.success)
    }

    /// Rolls back the completed steps of an executed plan file.
    pub async fn rollback(&self, args: RollbackArgs) -> Result<bool> {
        let plan = load_plan(&args.file).await?;
        if plan.status == PlanStatus::Draft || plan.status == PlanStatus::Ready {
            bail!(
                "Plan in {} has not been executed; pass the file written by `run --out`",
                args.file.display()
            );
        }

        let executor = ExecutorBuilder::new()
            .with_workspace_root(args.workspace.as_deref())
            .dry_run(args.dry_run)
            .build()
            .await
            .context("Failed to initialize executor")?;

        let result = executor
            .rollback(&plan, Some(&report_progress), &self.cancel)
            .await
            .context("Rollback was cancelled")?;

        if let Some(out) = &args.out {
            let planner = planner(None).await?;
            save_plan(&planner, &result.plan, out).await?;
        }
        self.renderer.render(&result.to_string())?;
        Ok(result.success)
    }
}

fn report_progress(progress: &Progress) {
    eprintln!("[{:>3.0}%] {}", progress.percent_complete, progress.message);
}

async fn planner(workspace: Option<&Path>) -> Result<Planner> {
    PlannerBuilder::new()
        .with_workspace_root(workspace)
        .build()
        .await
        .context("Failed to initialize planner")
}

async fn read_plan_file(file: &Path) -> Result<String> {
    tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read plan file {}", file.display()))
}

/// Reads a plan file exactly as stored, statuses included.
async fn load_plan(file: &Path) -> Result<Plan> {
    let text = read_plan_file(file).await?;
    serde_json::from_str(&text).with_context(|| format!("Invalid plan file {}", file.display()))
}

/// Reads a plan file through the planner's import (fresh Draft, pending steps).
async fn import_plan(planner: &Planner, file: &Path) -> Result<Plan> {
    let text = read_plan_file(file).await?;
    planner
        .import_plan(&text)
        .with_context(|| format!("Invalid plan file {}", file.display()))
}

async fn save_plan(planner: &Planner, plan: &Plan, file: &Path) -> Result<()> {
    let text = planner.export_plan(plan)?;
    tokio::fs::write(file, text)
        .await
        .with_context(|| format!("Failed to write plan file {}", file.display()))
}
