//! Error types used by the skvisor runtime.
//!
//! This module defines the error taxonomy of the regeneration loop:
//!
//! - [`ProcessError`] — a single generator run failed to launch or signalled failure.
//! - [`ProtocolError`] — a single control line in generator output could not be honored.
//! - [`ValidationError`] — a caller supplied a parameter value incompatible with the
//!   current manifest.
//!
//! None of these is fatal to the controller: process and protocol errors are
//! surfaced as diagnostic events and the prior manifest/artifact are kept,
//! validation errors leave the value set untouched.
//!
//! All types provide helper methods (`as_label`, `as_message`) for logging and
//! diagnostics sinks.

use std::io;

use thiserror::Error;

/// # Errors produced by one generator invocation.
///
/// These cover the run as a whole; the run's output is discarded and the
/// previously held manifest, values, and artifact path stay in place.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The generator executable could not be spawned at all
    /// (missing binary, permission denied, ...).
    #[error("failed to launch generator: {source}")]
    LaunchFailed {
        /// The underlying OS error.
        source: io::Error,
    },

    /// The generator ran but exited with a non-zero status.
    ///
    /// Protocol lines from such a run are **not** honored; captured standard
    /// error is carried here as diagnostic text.
    #[error("generator exited with status {code}")]
    NonZeroExit {
        /// Exit code (`-1` if the process was terminated by a signal).
        code: i32,
        /// Captured standard error, decoded lossily as UTF-8.
        stderr: String,
    },
}

impl ProcessError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProcessError::LaunchFailed { .. } => "process_launch_failed",
            ProcessError::NonZeroExit { .. } => "process_non_zero_exit",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ProcessError::LaunchFailed { source } => {
                format!("launch failed: {source}")
            }
            ProcessError::NonZeroExit { code, stderr } => {
                if stderr.is_empty() {
                    format!("generator exited with status {code}")
                } else {
                    format!("generator exited with status {code}: {}", stderr.trim_end())
                }
            }
        }
    }
}

/// # Errors produced while decoding a single control line.
///
/// Protocol errors are per-line and non-fatal: the offending line is ignored,
/// parsing of the remaining output continues, and the prior manifest is
/// retained when a new one fails to decode.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A `MANIFEST=` line carried a payload that did not decode into a manifest.
    #[error("malformed manifest: {detail}")]
    MalformedManifest {
        /// Decoder error text.
        detail: String,
    },

    /// A control line carried a directive this viewer core does not know.
    #[error("unknown directive: {directive}")]
    UnknownDirective {
        /// The unrecognized key (or the whole remainder when no `=` was found).
        directive: String,
    },
}

impl ProtocolError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProtocolError::MalformedManifest { .. } => "protocol_malformed_manifest",
            ProtocolError::UnknownDirective { .. } => "protocol_unknown_directive",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ProtocolError::MalformedManifest { detail } => {
                format!("malformed manifest: {detail}")
            }
            ProtocolError::UnknownDirective { directive } => {
                format!("unknown directive: {directive}")
            }
        }
    }
}

/// # Errors produced by parameter edits.
///
/// Returned by [`ParameterStore::set_value`](crate::params::ParameterStore::set_value)
/// when an edit does not fit the current manifest. The value set is left
/// unchanged on error.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The edited name is not declared by the current manifest.
    #[error("unknown parameter: {name}")]
    UnknownParameter {
        /// The parameter name as supplied by the caller.
        name: String,
    },

    /// The supplied value's shape does not match the declared kind.
    #[error("parameter {name} expects {expected}, got {got}")]
    KindMismatch {
        /// The parameter name.
        name: String,
        /// Kind declared by the manifest.
        expected: &'static str,
        /// Kind of the supplied value.
        got: &'static str,
    },
}

impl ValidationError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ValidationError::UnknownParameter { .. } => "validation_unknown_parameter",
            ValidationError::KindMismatch { .. } => "validation_kind_mismatch",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ValidationError::UnknownParameter { name } => {
                format!("unknown parameter: {name}")
            }
            ValidationError::KindMismatch {
                name,
                expected,
                got,
            } => {
                format!("parameter {name}: expected {expected}, got {got}")
            }
        }
    }
}
