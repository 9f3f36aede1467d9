//! # Decoded result of one generator run.

use crate::error::ProtocolError;
use crate::params::Manifest;

/// Everything one generator run produced, decoded from its output streams.
///
/// Ephemeral: created per invocation, consumed by the controller, discarded.
///
/// `manifest` / `artifact_path` are `None` when the corresponding control line
/// was absent from the output — distinct from an explicit empty value.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Freshly declared parameter schema, if a well-formed `MANIFEST=` line was seen.
    pub manifest: Option<Manifest>,

    /// Path to the produced artifact, if an `SVG=` line was seen.
    pub artifact_path: Option<String>,

    /// Passthrough (non-control) standard-output lines, in order, unmodified.
    pub log_lines: Vec<String>,

    /// Per-line protocol errors encountered while decoding control lines.
    ///
    /// Non-empty `errors` does not invalidate the rest of the result: a
    /// misbehaving generator still surfaces partial results and diagnostics.
    pub errors: Vec<ProtocolError>,

    /// Captured standard error, decoded lossily. Filled in by the process
    /// supervisor (the parser only sees standard output).
    pub stderr: String,
}
