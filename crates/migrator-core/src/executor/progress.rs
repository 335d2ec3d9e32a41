//! Progress notifications emitted while a plan runs.

use crate::models::Step;

/// Emitted once immediately before each step runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// 1-based number of the step about to run
    pub step_number: usize,
    pub total_steps: usize,
    pub message: String,
    /// Share of steps already finished, 0.0 to 100.0
    pub percent_complete: f64,
}

impl Progress {
    pub(crate) fn before_step(step_number: usize, total_steps: usize, step: &Step) -> Self {
        let finished = step_number.saturating_sub(1);
        let percent_complete = if total_steps == 0 {
            100.0
        } else {
            finished as f64 / total_steps as f64 * 100.0
        };
        let message = if step.target.is_empty() {
            format!(
                "Step {step_number}/{total_steps}: {} {}",
                step.action.as_str(),
                step.source
            )
        } else {
            format!(
                "Step {step_number}/{total_steps}: {} {} -> {}",
                step.action.as_str(),
                step.source,
                step.target
            )
        };

        Self {
            step_number,
            total_steps,
            message,
            percent_complete,
        }
    }
}

/// Observer for [`Progress`] notifications.
///
/// Reporting is fire-and-forget: a sink cannot fail or influence execution,
/// so implementations should return quickly.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: &Progress);
}

impl<F> ProgressSink for F
where
    F: Fn(&Progress) + Send + Sync,
{
    fn report(&self, progress: &Progress) {
        self(progress)
    }
}
