//! Plan export and import.
//!
//! Plans are exchanged as pretty-printed JSON carrying every field:
//!
//! ```json
//! {
//!   "id": "7d1c…",
//!   "name": "Reorganise tests",
//!   "description": null,
//!   "createdAt": "2026-01-05T10:00:00Z",
//!   "modifiedAt": "2026-01-05T10:02:00Z",
//!   "status": "draft",
//!   "steps": [
//!     {
//!       "index": 1,
//!       "action": "move_folder",
//!       "source": "test/Api.Tests",
//!       "target": "test/Unit/Api.Tests",
//!       "metadata": {},
//!       "status": "pending",
//!       "errorMessage": null,
//!       "executedAt": null
//!     }
//!   ]
//! }
//! ```

use super::Planner;
use crate::{
    error::Result,
    models::{Plan, PlanStatus, Step, StepStatus},
};

impl Planner {
    /// Serializes every field of `plan`.
    pub fn export_plan(&self, plan: &Plan) -> Result<String> {
        Ok(serde_json::to_string_pretty(plan)?)
    }

    /// Restores a plan from exported text.
    ///
    /// All fields round-trip except the plan status, which is reset to
    /// `Draft`, and every step status, which is reset to `Pending`. Steps are
    /// re-indexed in document order and `modified_at` is refreshed.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::Serialization` for malformed text or unknown
    /// actions and statuses.
    pub fn import_plan(&self, text: &str) -> Result<Plan> {
        let plan: Plan = serde_json::from_str(text)?;
        let steps = plan
            .steps
            .iter()
            .map(|step| Step {
                status: StepStatus::Pending,
                ..step.clone()
            })
            .collect();
        Ok(plan.with_steps(steps).with_status(PlanStatus::Draft))
    }
}
