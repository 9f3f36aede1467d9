//! # Current parameter values.
//!
//! [`ParamValue`] is the runtime counterpart of a
//! [`ParamSchema`](crate::params::ParamSchema): one concrete value per declared
//! kind. [`ValueSet`] maps parameter names to their current values and, after
//! reconciliation, always has exactly the manifest's key set.
//!
//! Values serialize untagged as plain JSON scalars — this is the exact text
//! handed to the generator on its command line (`--count 12`, `--title "x"`),
//! so strings keep their JSON quoting.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from parameter name to its current value.
///
/// Iteration order follows the manifest that produced it (insertion order);
/// command-line serialization walks this order.
pub type ValueSet = IndexMap<String, ParamValue>;

/// One concrete parameter value.
///
/// The variant set mirrors [`ParamSchema`](crate::params::ParamSchema)
/// exhaustively; kind-specific behavior is a `match`, never a type-tag lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// On/off flag.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Double(f64),
    /// Free-form text.
    String(String),
}

impl ParamValue {
    /// Short kind name for diagnostics (`"string"`, `"int"`, `"double"`, `"bool"`).
    pub fn kind_label(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Double(_) => "double",
            ParamValue::String(_) => "string",
        }
    }

    /// Encodes the value as the JSON text passed to the generator.
    ///
    /// Strings come out quoted (`"title"` → `"\"title\""`), matching what the
    /// generator-side option parser strips back off.
    pub fn to_json(&self) -> String {
        // Scalar serialization cannot fail; non-finite doubles encode as null.
        serde_json::to_string(self).unwrap_or_else(|_| "null".to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Double(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::String(v)
    }
}
