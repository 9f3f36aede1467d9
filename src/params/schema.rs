//! # Parameter schemas declared by the generator.
//!
//! A generator declares its tunables by printing a manifest control line; each
//! entry decodes into a [`ParamSchema`]. The wire format is a JSON object keyed
//! by parameter name:
//!
//! ```json
//! {
//!   "title":  {"type": "string", "default": "untitled"},
//!   "count":  {"type": "int",    "default": 12,  "min": 1,   "max": 500},
//!   "spread": {"type": "double", "default": 0.4, "min": 0.0, "max": 1.0},
//!   "debug":  {"type": "bool",   "default": false}
//! }
//! ```
//!
//! The kind set is a closed enum: adding a kind is a compile-time exhaustiveness
//! failure wherever kind-specific behavior (validation, clamping, widget choice)
//! is implemented, not a runtime "unsupported type" log line.
//!
//! Integer bounds are kept as `i128` because generators commonly declare the
//! full range of their native type (`u64::MAX` overflows `i64`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::params::values::ParamValue;

/// Ordered mapping from parameter name to its schema.
///
/// Produced fresh on every successful run. Equality (via [`IndexMap`]) is
/// order-independent — two manifests with the same entries in a different
/// order compare equal — while iteration preserves insertion order for display.
pub type Manifest = IndexMap<String, ParamSchema>;

/// Schema of a single tunable parameter: kind, bounds, and default.
///
/// Invariant (holds for well-formed generators): `min <= default <= max`
/// for the numeric kinds. The store does not re-validate this; degenerate
/// bounds are tolerated at clamp time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParamSchema {
    /// Free-form text.
    String {
        /// Initial value.
        default: String,
    },

    /// Integer with inclusive bounds.
    Int {
        /// Initial value.
        default: i128,
        /// Lower bound (inclusive).
        min: i128,
        /// Upper bound (inclusive).
        max: i128,
    },

    /// Floating-point with inclusive bounds.
    Double {
        /// Initial value.
        default: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// On/off flag.
    Bool {
        /// Initial value.
        default: bool,
    },
}

impl ParamSchema {
    /// Short kind name for diagnostics (`"string"`, `"int"`, `"double"`, `"bool"`).
    pub fn kind_label(&self) -> &'static str {
        match self {
            ParamSchema::String { .. } => "string",
            ParamSchema::Int { .. } => "int",
            ParamSchema::Double { .. } => "double",
            ParamSchema::Bool { .. } => "bool",
        }
    }

    /// Returns whether `value`'s shape matches this schema's kind.
    ///
    /// Bounds are not checked here; carrying an out-of-bounds value across a
    /// reconciliation is allowed (edits clamp, carries do not).
    pub fn accepts(&self, value: &ParamValue) -> bool {
        matches!(
            (self, value),
            (ParamSchema::String { .. }, ParamValue::String(_))
                | (ParamSchema::Int { .. }, ParamValue::Int(_))
                | (ParamSchema::Double { .. }, ParamValue::Double(_))
                | (ParamSchema::Bool { .. }, ParamValue::Bool(_))
        )
    }

    /// Materializes the schema default as a value.
    ///
    /// Integer defaults wider than `i64` are clamped to the representable range.
    pub fn default_value(&self) -> ParamValue {
        match self {
            ParamSchema::String { default } => ParamValue::String(default.clone()),
            ParamSchema::Int { default, .. } => {
                let d = (*default).clamp(i128::from(i64::MIN), i128::from(i64::MAX));
                ParamValue::Int(d as i64)
            }
            ParamSchema::Double { default, .. } => ParamValue::Double(*default),
            ParamSchema::Bool { default } => ParamValue::Bool(*default),
        }
    }
}
