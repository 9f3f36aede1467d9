//! # Generator process execution.
//!
//! This module contains everything between "the controller wants a run" and
//! "decoded output is back":
//! - [`RunRequest`] — base command + serialized parameter values;
//! - [`Generate`] / [`GeneratorRef`] — the execution seam (trait object);
//! - [`ProcessSupervisor`] — the production implementation over
//!   [`tokio::process`], one child per run, both streams captured.

mod generate;
mod request;
mod supervisor;

pub use generate::{Generate, GeneratorRef};
pub use request::RunRequest;
pub use supervisor::{ProcessSupervisor, ENV_MARKER};
