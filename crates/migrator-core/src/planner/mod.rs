//! Planner API for building, validating and exchanging migration plans.
//!
//! The planner never edits a plan in place. Every mutation takes the current
//! [`Plan`](crate::models::Plan) by reference and returns the next snapshot,
//! with steps re-indexed `1..=N` and a strictly newer `modified_at`.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    plan_ops     │    │   validation    │    │     export      │
//! │ (create, add,   │    │ (rule tables,   │    │ (JSON export /  │
//! │  remove, ready) │    │  existence)     │    │  import)        │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!       pure                 FileSystem            serde_json
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Planner`] instances with configuration
//! - [`plan_ops`]: Plan and step mutations
//! - [`validation`]: Plan validation rules
//! - [`export`]: Lossless export and import of plan documents
//!
//! # Usage Examples
//!
//! ```rust
//! use migrator_core::{
//!     models::{Action, Step},
//!     PlannerBuilder,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().build().await?;
//!
//! let plan = planner.create_plan("Reorganise tests");
//! let plan = planner.add_step(
//!     &plan,
//!     Step::new(Action::MoveFolder, "test/Api.Tests", "test/Unit/Api.Tests"),
//! )?;
//!
//! let validation = planner
//!     .validate_plan(&plan, &CancellationToken::new())
//!     .await?;
//! if validation.is_valid {
//!     let text = planner.export_plan(&plan)?;
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc};

use crate::fs::FileSystem;

pub mod builder;
pub mod export;
pub mod plan_ops;
pub mod validation;


pub use builder::PlannerBuilder;

/// Main planner interface for creating and validating plans.
pub struct Planner {
    pub(crate) file_system: Arc<dyn FileSystem>,
    pub(crate) workspace_root: Option<PathBuf>,
}

impl Planner {
    /// Creates a planner over the given file system.
    pub(crate) fn new(file_system: Arc<dyn FileSystem>, workspace_root: Option<PathBuf>) -> Self {
        Self {
            file_system,
            workspace_root,
        }
    }
}
