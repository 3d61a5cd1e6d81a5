//! Progress notification port
//!
//! Defines the interface for reporting progress while a chat request runs.

use roundtable_domain::{Mode, Role, TaskCategory};

/// Callback for progress updates during a chat run
///
/// Implementations live in the presentation layer (console spinners) and
/// can ignore whatever they do not display.
pub trait ProgressNotifier: Send + Sync {
    /// Called once routing has settled on a role set
    fn on_routed(&self, category: TaskCategory, mode: Mode, roles: &[Role]);

    /// Called when an attempt starts dispatching responders
    fn on_dispatch_start(&self, attempt: u8, roles: &[Role]);

    /// Called as each responder settles
    fn on_role_complete(&self, role: Role, duration_ms: u64, degraded: bool);

    /// Called after an attempt has been scored and decided
    fn on_attempt_complete(&self, _attempt: u8, _confidence: f64, _retry: bool) {}

    /// Called when the planner or synthesizer is invoked
    fn on_master_call(&self, _stage: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_routed(&self, _category: TaskCategory, _mode: Mode, _roles: &[Role]) {}
    fn on_dispatch_start(&self, _attempt: u8, _roles: &[Role]) {}
    fn on_role_complete(&self, _role: Role, _duration_ms: u64, _degraded: bool) {}
}
