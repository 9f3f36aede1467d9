//! # Line-oriented viewer protocol parser.
//!
//! Decodes a generator's raw standard-output stream into a [`RunResult`].
//! Stateless: a pure function of the bytes.
//!
//! ## Wire protocol
//! ```text
//! plain log line                                  → passthrough, kept verbatim
//! #SKV_VIEWER_COMMAND MANIFEST=<json object>      → parameter schema
//! #SKV_VIEWER_COMMAND SVG=<path>                  → artifact path
//! #SKV_VIEWER_COMMAND <anything else>             → unknown directive (reported, skipped)
//! ```
//!
//! Parsing is line-granular and tolerant: a malformed control line yields a
//! [`ProtocolError`](crate::ProtocolError) in the result and never aborts the
//! remaining lines, so a misbehaving generator still surfaces partial results.

use crate::error::ProtocolError;
use crate::params::Manifest;
use crate::protocol::result::RunResult;

/// Prefix marking a control line. The trailing space is part of the tag.
pub const CONTROL_PREFIX: &str = "#SKV_VIEWER_COMMAND ";

/// Directive carrying the parameter schema.
const KEY_MANIFEST: &str = "MANIFEST";
/// Directive carrying the artifact path.
const KEY_SVG: &str = "SVG";

/// Decodes captured standard output into a [`RunResult`].
///
/// Splits on `\n`; a single trailing newline does not produce an empty
/// passthrough line. When multiple `MANIFEST=` or `SVG=` lines appear, the
/// last well-formed one wins.
pub fn parse(stdout: &[u8]) -> RunResult {
    let stdout = stdout.strip_suffix(b"\n").unwrap_or(stdout);

    let mut result = RunResult::default();
    if stdout.is_empty() {
        return result;
    }

    for raw in stdout.split(|b| *b == b'\n') {
        let line = String::from_utf8_lossy(raw);

        let Some(rest) = line.strip_prefix(CONTROL_PREFIX) else {
            result.log_lines.push(line.into_owned());
            continue;
        };

        let Some((key, value)) = rest.split_once('=') else {
            result.errors.push(ProtocolError::UnknownDirective {
                directive: rest.to_string(),
            });
            continue;
        };

        match key {
            KEY_MANIFEST => match serde_json::from_str::<Manifest>(value) {
                Ok(manifest) => result.manifest = Some(manifest),
                Err(err) => result.errors.push(ProtocolError::MalformedManifest {
                    detail: err.to_string(),
                }),
            },
            KEY_SVG => result.artifact_path = Some(value.to_string()),
            other => result.errors.push(ProtocolError::UnknownDirective {
                directive: other.to_string(),
            }),
        }
    }

    result
}
