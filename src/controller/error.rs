use thiserror::Error;

/// Error returned by [`ControllerHandle`](crate::ControllerHandle) submissions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Command queue is full (try again later or use the async variant).
    #[error("command queue full")]
    Full,

    /// Controller channel is closed (controller loop exited).
    #[error("controller channel closed")]
    Closed,
}
