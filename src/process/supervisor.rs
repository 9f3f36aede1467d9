//! # Process supervisor: owns the lifecycle of one child process per run.
//!
//! [`ProcessSupervisor`] launches the generator with the request's argument
//! vector, marks the environment so the generator knows it is being previewed,
//! captures both output streams to completion, and feeds standard output
//! through the protocol parser.
//!
//! ## Flow
//! ```text
//! run(request)
//!   ├─ spawn: program + args, env SKV_VIEWER=1, stdout/stderr piped
//!   │     └─ spawn error ───────────────► Err(LaunchFailed)      (immediate)
//!   ├─ await exit, collect both streams
//!   ├─ status != 0 ────────────────────► Err(NonZeroExit{code, stderr})
//!   └─ status == 0 ──► parse(stdout) ──► Ok(RunResult{.., stderr})
//! ```
//!
//! ## Rules
//! - Strictly sequential: the caller (controller) never overlaps runs.
//! - No timeout and no cancellation: a launched generator runs to completion
//!   or external termination. An unbounded hang blocks all future
//!   regeneration until manual intervention — a known limitation carried over
//!   from the original viewer, not silently "fixed" here.
//! - Standard error is always surfaced: attached to the result on success,
//!   carried inside the error on failure.

use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::ProcessError;
use crate::process::generate::Generate;
use crate::process::request::RunRequest;
use crate::protocol::{self, RunResult};

/// Environment variable signalling interactive-preview mode to the generator.
///
/// Generators check it before emitting control lines, so batch runs stay
/// protocol-free.
pub const ENV_MARKER: &str = "SKV_VIEWER";

/// Launches one generator process per run and decodes its output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessSupervisor;

impl ProcessSupervisor {
    /// Creates a supervisor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Generate for ProcessSupervisor {
    async fn run(&self, request: &RunRequest) -> Result<RunResult, ProcessError> {
        let program = request.program().ok_or_else(|| ProcessError::LaunchFailed {
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty base command"),
        })?;

        let output = Command::new(program)
            .args(request.args())
            .env(ENV_MARKER, "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ProcessError::LaunchFailed { source })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ProcessError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        let mut result = protocol::parse(&output.stdout);
        result.stderr = stderr;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ParamValue, ValueSet};

    fn sh(script: &str) -> RunRequest {
        RunRequest::new(
            vec!["sh".into(), "-c".into(), script.into()],
            ValueSet::new(),
        )
    }

    #[tokio::test]
    async fn test_successful_run_parses_protocol() {
        let req = sh(concat!(
            "echo plain log; ",
            r##"echo '#SKV_VIEWER_COMMAND MANIFEST={"n": {"type": "int", "default": 1, "min": 0, "max": 5}}'; "##,
            "echo '#SKV_VIEWER_COMMAND SVG=/tmp/s.svg'; ",
            "echo oops >&2",
        ));

        let result = ProcessSupervisor::new().run(&req).await.unwrap();
        assert!(result.manifest.is_some());
        assert_eq!(result.artifact_path.as_deref(), Some("/tmp/s.svg"));
        assert_eq!(result.log_lines, vec!["plain log"]);
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_env_marker_is_set() {
        let req = sh("echo \"marker=$SKV_VIEWER\"");
        let result = ProcessSupervisor::new().run(&req).await.unwrap();
        assert_eq!(result.log_lines, vec!["marker=1"]);
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr_and_skips_parsing() {
        let req = sh("echo '#SKV_VIEWER_COMMAND SVG=/tmp/s.svg'; echo broken >&2; exit 3");
        let err = ProcessSupervisor::new().run(&req).await.unwrap_err();
        match err {
            ProcessError::NonZeroExit { code, stderr } => {
                assert_eq!(code, 3);
                assert_eq!(stderr.trim(), "broken");
            }
            other => panic!("expected NonZeroExit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_executable_is_launch_failed() {
        let req = RunRequest::new(
            vec!["/nonexistent/generator-binary".into()],
            ValueSet::new(),
        );
        let err = ProcessSupervisor::new().run(&req).await.unwrap_err();
        assert!(matches!(err, ProcessError::LaunchFailed { .. }));
    }

    #[tokio::test]
    async fn test_empty_command_is_launch_failed() {
        let req = RunRequest::new(vec![], ValueSet::new());
        let err = ProcessSupervisor::new().run(&req).await.unwrap_err();
        assert!(matches!(err, ProcessError::LaunchFailed { .. }));
    }

    #[tokio::test]
    async fn test_parameter_values_reach_the_child() {
        let mut values = ValueSet::new();
        values.insert("count".into(), ParamValue::Int(7));
        let req = RunRequest::new(
            vec!["sh".into(), "-c".into(), "echo \"$1 $2\"".into(), "argv0".into()],
            values,
        );

        let result = ProcessSupervisor::new().run(&req).await.unwrap();
        assert_eq!(result.log_lines, vec!["--count 7"]);
    }
}
