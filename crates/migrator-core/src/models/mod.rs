//! Data models for plans, steps and their outcomes.
//!
//! All models are plain values. Planner and executor operations never edit a
//! `Plan` or `Step` in place; they return a new snapshot, so a plan handed to
//! the executor is still intact afterwards and can be compared with the
//! executed copy carried by [`MigrationResult`]. Display implementations for
//! these models live in [`crate::display::models`].
//!
//! # Lifecycle
//!
//! ```text
//!  Plan:  Draft ──▶ Ready ──▶ Completed
//!                        └──▶ Failed
//!  Step:  Pending ──▶ Completed | Failed | Skipped
//! ```
//!
//! # Examples
//!
//! ```rust
//! use migrator_core::models::{Action, Plan, Step, metadata};
//!
//! let step = Step::new(Action::RenameNamespace, "src/Widget.cs", "Acme.Widgets")
//!     .with_metadata(metadata::OLD_NAMESPACE, "Legacy.Widgets");
//! let plan = Plan::new("Rename widgets").with_steps(vec![step]);
//!
//! assert_eq!(plan.steps[0].index, 1);
//! assert_eq!(
//!     plan.steps[0].metadata_value(metadata::OLD_NAMESPACE),
//!     Some("Legacy.Widgets")
//! );
//! ```

pub mod action;
pub mod plan;
pub mod results;
pub mod status;
pub mod step;
pub mod validation;


pub use action::Action;
pub use plan::Plan;
pub use results::{MigrationResult, StepResult};
pub use status::{PlanStatus, StepStatus};
pub use step::{metadata, Step};
pub use validation::{IssueCode, ValidationIssue, ValidationResult};
