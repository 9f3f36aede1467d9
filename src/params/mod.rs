//! # Parameter model: schemas, values, and the owning store.
//!
//! This module provides the data model the regeneration loop maintains:
//! - [`ParamSchema`] / [`Manifest`] — generator-declared tunables
//! - [`ParamValue`] / [`ValueSet`] — the current value assignment
//! - [`ParameterStore`] — the single owner, with [`reconcile`] / `set_value`
//!
//! Manifests and value sets are replaced wholesale on each successful run and
//! on each edit; nothing outside this module mutates them.

mod schema;
mod store;
mod values;

pub use schema::{Manifest, ParamSchema};
pub use store::{manifest_equals, reconcile, ParameterStore};
pub use values::{ParamValue, ValueSet};
