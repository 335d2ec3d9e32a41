//! Display formatting for plans, validation reports and execution results.
//!
//! Every domain type implements [`std::fmt::Display`] as markdown, which the
//! CLI feeds to its terminal renderer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │  Display impls  │    │   Formatted     │
//! │ (Plan, results) │───▶│  & wrappers     │───▶│    markdown     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`models`]: Plans, steps, statuses and actions
//! - [`results`]: Validation reports, step results and migration results
//! - [`status`]: One-line confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//!
//! ## Usage Examples
//!
//! ```rust
//! use migrator_core::{
//!     display::OperationStatus,
//!     models::{Action, Plan, Step},
//! };
//!
//! let plan = Plan::new("Split tests")
//!     .with_steps(vec![Step::new(Action::MoveFolder, "test/Api", "test/Unit/Api")]);
//! let output = plan.to_string();
//! assert!(output.contains("### 1. move_folder"));
//!
//! let saved = OperationStatus::success("Saved plan.json".to_string());
//! assert_eq!(saved.to_string(), "Success: Saved plan.json\n");
//! ```

pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use datetime::LocalDateTime;
pub use results::Elapsed;
pub use status::OperationStatus;
