//! Core library for the migrator repository-refactoring engine.
//!
//! A migration is described by a [`Plan`]: an ordered list of [`Step`]s such
//! as moving a folder, renaming a namespace or editing a project reference.
//! The [`Planner`] builds, validates and exchanges plans; the [`Executor`]
//! runs them step by step, previews them in dry-run mode and rolls back the
//! reversible part of a finished run.
//!
//! All storage access goes through the [`fs::FileSystem`] trait and every
//! long-running call takes a [`tokio_util::sync::CancellationToken`].
//!
//! # Display Architecture
//!
//! Domain models implement [`std::fmt::Display`] as markdown (see
//! [`display`]), which the CLI renders in the terminal.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use migrator_core::{
//!     models::{Action, Step},
//!     ExecutorBuilder, PlannerBuilder,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workspace = Some("/work/repo");
//! let cancel = CancellationToken::new();
//!
//! let planner = PlannerBuilder::new().with_workspace_root(workspace).build().await?;
//! let plan = planner.create_plan("Move tests");
//! let plan = planner.add_step(
//!     &plan,
//!     Step::new(Action::MoveFolder, "tests/Api", "tests/Unit/Api"),
//! )?;
//!
//! let validation = planner.validate_plan(&plan, &cancel).await?;
//! if !validation.is_valid {
//!     println!("{validation}");
//!     return Ok(());
//! }
//!
//! let executor = ExecutorBuilder::new().with_workspace_root(workspace).build().await?;
//! let result = executor
//!     .execute(&planner.mark_ready(&plan)?, None, &cancel)
//!     .await?;
//! println!("{result}");
//!
//! if !result.success {
//!     let undo = executor.rollback(&result.plan, None, &cancel).await?;
//!     println!("{undo}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod display;
pub mod error;
pub mod executor;
pub mod fs;
pub mod models;
pub mod paths;
pub mod planner;
pub mod project_file;
pub mod rewrite;

// Re-export commonly used types
pub use display::{LocalDateTime, OperationStatus};
pub use error::{MigrationError, Result};
pub use executor::{Executor, ExecutorBuilder, ExecutorConfig, Progress, ProgressSink};
pub use fs::{FileSystem, LocalFileSystem};
pub use models::{
    Action, IssueCode, MigrationResult, Plan, PlanStatus, Step, StepResult, StepStatus,
    ValidationIssue, ValidationResult,
};
pub use planner::{Planner, PlannerBuilder};
pub use rewrite::{NamespaceRewriter, RegexNamespaceRewriter};
