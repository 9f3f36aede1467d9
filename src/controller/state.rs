/// State of the regeneration loop.
///
/// The at-most-one-in-flight invariant is structural: launching is only
/// reachable from [`RunState::Idle`], and completion is the only transition
/// back. There is no nullable process handle to forget to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RunState {
    /// No generator process running; the timer is counting down.
    Idle,

    /// One generator process in flight; the timer is paused and new run
    /// requests are dropped (not queued).
    Running,
}

impl RunState {
    pub fn is_idle(self) -> bool {
        matches!(self, RunState::Idle)
    }

    pub fn is_running(self) -> bool {
        matches!(self, RunState::Running)
    }
}
