//! # Generator execution seam.
//!
//! [`Generate`] is the trait boundary between the controller's state machine
//! and the OS process that actually produces artifacts. The production
//! implementation is [`ProcessSupervisor`](crate::process::ProcessSupervisor);
//! tests substitute in-memory fakes to drive the controller deterministically.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProcessError;
use crate::process::request::RunRequest;
use crate::protocol::RunResult;

/// # One generator invocation, start to finish.
///
/// Implementations run the request to completion and return the decoded
/// result. Strictly sequential use: the controller never issues a new `run`
/// while a previous one is outstanding.
#[async_trait]
pub trait Generate: Send + Sync + 'static {
    /// Executes one run and decodes its output.
    async fn run(&self, request: &RunRequest) -> Result<RunResult, ProcessError>;
}

/// Shared handle to a generator implementation (`Arc<dyn Generate>`).
pub type GeneratorRef = Arc<dyn Generate>;
