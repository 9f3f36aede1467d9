//! # Parameter store: owned schema/value state and reconciliation.
//!
//! The [`ParameterStore`] is the single owner of the current [`Manifest`] and
//! [`ValueSet`]. Both are replaced, never mutated in place: a successful run
//! goes through [`ParameterStore::apply_manifest`], a user edit through
//! [`ParameterStore::set_value`]. UI callbacks never alias this state — they
//! send intents through the controller, and the store applies them.
//!
//! ## Reconciliation
//! When a fresh manifest arrives, previously held values are adapted to it:
//!
//! ```text
//! reconcile(new_manifest, old_values):
//!   for each (name, schema) in new_manifest (in order):
//!     ├─ old value present and kind-compatible ──► carried over verbatim
//!     └─ otherwise                             ──► schema default
//!   names absent from new_manifest are dropped
//! ```
//!
//! The result's key set always equals the manifest's key set, in manifest order.

use crate::error::ValidationError;
use crate::params::schema::{Manifest, ParamSchema};
use crate::params::values::{ParamValue, ValueSet};

/// Structural manifest equality, ignoring key order.
///
/// Used to suppress redundant schema-changed notifications when a run emits
/// the same manifest again (possibly with reordered keys).
pub fn manifest_equals(a: &Manifest, b: &Manifest) -> bool {
    // IndexMap equality is already order-independent.
    a == b
}

/// Adapts a prior value assignment to a newly received manifest.
///
/// Pure and deterministic. For every name in `manifest`, the old value is
/// carried over if present and kind-compatible, else the schema default is
/// used. Carried values are **not** re-clamped against the new bounds.
pub fn reconcile(manifest: &Manifest, old: &ValueSet) -> ValueSet {
    manifest
        .iter()
        .map(|(name, schema)| {
            let value = old
                .get(name)
                .filter(|v| schema.accepts(v))
                .cloned()
                .unwrap_or_else(|| schema.default_value());
            (name.clone(), value)
        })
        .collect()
}

/// Owner of the current manifest and value assignment.
///
/// Lives for the lifetime of the controller; starts empty and is populated by
/// the first successful run.
#[derive(Debug, Default, Clone)]
pub struct ParameterStore {
    manifest: Manifest,
    values: ValueSet,
}

impl ParameterStore {
    /// Creates an empty store (no manifest seen yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently held manifest (empty before the first successful run).
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The current value assignment.
    pub fn values(&self) -> &ValueSet {
        &self.values
    }

    /// Replaces the manifest and reconciles values against it.
    ///
    /// Returns `true` if the new manifest differs structurally from the held
    /// one (the caller should notify schema-dependent collaborators), `false`
    /// if it is the same schema and nothing was replaced.
    pub fn apply_manifest(&mut self, manifest: Manifest) -> bool {
        if manifest_equals(&self.manifest, &manifest) {
            return false;
        }
        self.values = reconcile(&manifest, &self.values);
        self.manifest = manifest;
        true
    }

    /// Validates and applies a single edit, returning the value actually stored.
    ///
    /// Numeric kinds are clamped rather than rejected:
    /// - `Double` clamps to `[min, max]`;
    /// - `Int` clamps to `[min, max]` intersected with the 32-bit signed window,
    ///   guarding against generators that declare the full range of a wide
    ///   native type.
    ///
    /// Fails with [`ValidationError`] if `name` is unknown or the value's shape
    /// mismatches the declared kind; the value set is unchanged on error.
    pub fn set_value(
        &mut self,
        name: &str,
        value: ParamValue,
    ) -> Result<ParamValue, ValidationError> {
        let schema = self
            .manifest
            .get(name)
            .ok_or_else(|| ValidationError::UnknownParameter {
                name: name.to_string(),
            })?;

        if !schema.accepts(&value) {
            return Err(ValidationError::KindMismatch {
                name: name.to_string(),
                expected: schema.kind_label(),
                got: value.kind_label(),
            });
        }

        let stored = clamp_to_schema(schema, value);
        self.values.insert(name.to_string(), stored.clone());
        Ok(stored)
    }
}

/// Clamps a kind-checked value into the schema's effective bounds.
fn clamp_to_schema(schema: &ParamSchema, value: ParamValue) -> ParamValue {
    match (schema, value) {
        (ParamSchema::Int { min, max, .. }, ParamValue::Int(v)) => {
            let lo = (*min).max(i128::from(i32::MIN));
            let hi = (*max).min(i128::from(i32::MAX));
            // Degenerate window (bounds entirely outside i32): fall back to
            // the raw schema bounds.
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (*min, *max) };
            let v = i128::from(v)
                .clamp(lo.min(hi), hi.max(lo))
                .clamp(i128::from(i64::MIN), i128::from(i64::MAX));
            ParamValue::Int(v as i64)
        }
        (ParamSchema::Double { min, max, .. }, ParamValue::Double(v)) => {
            if min <= max {
                ParamValue::Double(v.clamp(*min, *max))
            } else {
                ParamValue::Double(v)
            }
        }
        (_, value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(entries: &[(&str, ParamSchema)]) -> Manifest {
        entries
            .iter()
            .map(|(n, s)| (n.to_string(), s.clone()))
            .collect()
    }

    fn int_schema(default: i128, min: i128, max: i128) -> ParamSchema {
        ParamSchema::Int { default, min, max }
    }

    #[test]
    fn test_reconcile_keeps_intersection() {
        let m1 = manifest(&[
            ("a", int_schema(1, 0, 100)),
            ("b", ParamSchema::Bool { default: false }),
        ]);
        let old = reconcile(&m1, &ValueSet::new());

        let m2 = manifest(&[
            ("b", ParamSchema::Bool { default: true }),
            (
                "c",
                ParamSchema::String {
                    default: "x".into(),
                },
            ),
        ]);
        let new = reconcile(&m2, &old);

        let keys: Vec<_> = new.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "c"]);
        // "b" existed in both with compatible kind: carried over, not re-defaulted.
        assert_eq!(new["b"], ParamValue::Bool(false));
        // "c" is new: filled from its default.
        assert_eq!(new["c"], ParamValue::String("x".into()));
        // "a" was dropped.
        assert!(!new.contains_key("a"));
    }

    #[test]
    fn test_reconcile_fills_defaults_for_missing_names() {
        let m = manifest(&[
            ("n", int_schema(42, 0, 100)),
            ("d", ParamSchema::Double { default: 0.25, min: 0.0, max: 1.0 }),
        ]);
        let values = reconcile(&m, &ValueSet::new());
        assert_eq!(values["n"], ParamValue::Int(42));
        assert_eq!(values["d"], ParamValue::Double(0.25));
    }

    #[test]
    fn test_reconcile_replaces_on_kind_change() {
        let m1 = manifest(&[("x", int_schema(5, 0, 10))]);
        let old = reconcile(&m1, &ValueSet::new());

        let m2 = manifest(&[(
            "x",
            ParamSchema::Double {
                default: 0.5,
                min: 0.0,
                max: 1.0,
            },
        )]);
        let new = reconcile(&m2, &old);
        assert_eq!(new["x"], ParamValue::Double(0.5));
    }

    #[test]
    fn test_set_value_clamps_int_to_schema_min() {
        let mut store = ParameterStore::new();
        store.apply_manifest(manifest(&[("n", int_schema(0, -5, 10))]));

        let stored = store.set_value("n", ParamValue::Int(-100)).unwrap();
        assert_eq!(stored, ParamValue::Int(-5));
        assert_eq!(store.values()["n"], ParamValue::Int(-5));
    }

    #[test]
    fn test_set_value_clamps_int_to_i32_window() {
        // Schema declares the full u64 range; edits are confined to i32.
        let mut store = ParameterStore::new();
        store.apply_manifest(manifest(&[("n", int_schema(7, 0, u64::MAX as i128))]));

        let stored = store
            .set_value("n", ParamValue::Int(i64::from(i32::MAX) + 1))
            .unwrap();
        assert_eq!(stored, ParamValue::Int(i64::from(i32::MAX)));
    }

    #[test]
    fn test_set_value_clamps_double() {
        let mut store = ParameterStore::new();
        store.apply_manifest(manifest(&[(
            "d",
            ParamSchema::Double {
                default: 0.5,
                min: 0.0,
                max: 1.0,
            },
        )]));

        assert_eq!(
            store.set_value("d", ParamValue::Double(7.5)).unwrap(),
            ParamValue::Double(1.0)
        );
    }

    #[test]
    fn test_set_value_rejects_unknown_name() {
        let mut store = ParameterStore::new();
        store.apply_manifest(manifest(&[("n", int_schema(0, 0, 10))]));

        let err = store.set_value("nope", ParamValue::Int(1)).unwrap_err();
        assert_eq!(err.as_label(), "validation_unknown_parameter");
        assert_eq!(store.values()["n"], ParamValue::Int(0));
    }

    #[test]
    fn test_set_value_rejects_kind_mismatch() {
        let mut store = ParameterStore::new();
        store.apply_manifest(manifest(&[("n", int_schema(0, 0, 10))]));

        let err = store.set_value("n", ParamValue::Bool(true)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::KindMismatch {
                expected: "int",
                got: "bool",
                ..
            }
        ));
        // Store untouched.
        assert_eq!(store.values()["n"], ParamValue::Int(0));
    }

    #[test]
    fn test_manifest_equality_ignores_order() {
        let a = manifest(&[
            ("x", int_schema(1, 0, 10)),
            ("y", ParamSchema::Bool { default: true }),
        ]);
        let b = manifest(&[
            ("y", ParamSchema::Bool { default: true }),
            ("x", int_schema(1, 0, 10)),
        ]);
        assert!(manifest_equals(&a, &b));

        let mut store = ParameterStore::new();
        assert!(store.apply_manifest(a));
        // Reordered but structurally identical: no replacement reported.
        assert!(!store.apply_manifest(b));
    }

    #[test]
    fn test_apply_manifest_reports_real_change() {
        let mut store = ParameterStore::new();
        assert!(store.apply_manifest(manifest(&[("x", int_schema(1, 0, 10))])));
        assert!(store.apply_manifest(manifest(&[("x", int_schema(1, 0, 20))])));
    }
}
