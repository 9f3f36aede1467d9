//! # skvisor
//!
//! **Skvisor** is the live-regeneration core of a sketch-preview harness.
//!
//! It supervises one external generator process (a program that prints an
//! image artifact path and a parameter manifest over a tagged stdout
//! protocol), keeps the declared parameters reconciled with the values a user
//! holds, and reruns the generator on a timer or whenever a value is edited.
//! The crate is the headless engine; windows, widgets, and key bindings
//! belong to the embedding application.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!      ControllerHandle              ControllerHandle
//!   (set_value / rerun /          (switch_interval / ...)
//!    artifact_path)                        │
//!           └──────────────┬───────────────┘
//!                          ▼  mpsc commands
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Controller (single select! loop)                                 │
//! │  - RunState {Idle, Running}: at most one generator in flight      │
//! │  - repeating timer (slow/fast interval, paused while Running)     │
//! │  - ParameterStore (manifest + reconciled ValueSet)                │
//! │  - last artifact path                                             │
//! └──────┬──────────────────────────────────────────────────┬─────────┘
//!        │ RunRequest                                       │ publishes
//!        ▼                                                  ▼
//! ┌─────────────────────────────┐               ┌───────────────────────┐
//! │ Generate seam               │               │ Bus (broadcast)       │
//! │ └─ ProcessSupervisor        │               └─────────┬─────────────┘
//! │    - SKV_VIEWER=1           │                         ▼
//! │    - one child per run      │                 fan-out listener
//! │    - captures stdout/stderr │                         │
//! └──────────┬──────────────────┘                         ▼
//!            │ exit 0                              SubscriberSet
//!            ▼                                 (per-subscriber queues,
//!    protocol::parse(stdout)                    panic/overflow isolation)
//!    ├─ "#SKV_VIEWER_COMMAND MANIFEST=…"        ┌─────────┼──────────┐
//!    ├─ "#SKV_VIEWER_COMMAND SVG=…"             ▼         ▼          ▼
//!    └─ passthrough log lines                viewer   form builder  log sink
//! ```
//!
//! ### One run, end to end
//! ```text
//! tick / edit / rerun (while Idle)
//!   ├─► timer paused, state = Running
//!   ├─► RunStarted
//!   ├─► spawn generator: base command + "--<name> <json>" per value
//!   └─► completion comes back as a message:
//!         ├─ Err(launch/exit) ──► one Diagnostic, nothing else changes
//!         └─ Ok(RunResult)
//!              ├─ log lines / protocol errors / stderr ──► Diagnostic
//!              ├─ manifest structurally changed ──► store reconciled,
//!              │                                    SchemaChanged
//!              └─ SVG path present ─► ArtifactReady │ absent ─► ArtifactCleared
//!   then: RunFinished, state = Idle, timer restarts from the full interval
//! ```
//!
//! ## Features
//! | Area            | Description                                                      | Key types / traits                      |
//! |-----------------|------------------------------------------------------------------|-----------------------------------------|
//! | **Protocol**    | Tolerant, line-granular decoding of generator stdout.            | [`parse`], [`RunResult`]                |
//! | **Parameters**  | Closed schema kinds, order-preserving maps, reconciliation.      | [`ParamSchema`], [`ParameterStore`]     |
//! | **Process**     | One child per run, env-marked, both streams captured.            | [`Generate`], [`ProcessSupervisor`]     |
//! | **Controller**  | Timer + edits + at-most-one-in-flight regeneration loop.         | [`Controller`], [`ControllerHandle`]    |
//! | **Events**      | Broadcast bus with isolated per-subscriber delivery.             | [`Event`], [`Bus`], [`Subscribe`]       |
//! | **Export**      | Save-liked / PNG-export helpers over the current artifact.       | [`export::save_liked`], [`export::export_png`] |
//! | **Errors**      | Typed, non-fatal errors surfaced as diagnostics.                 | [`ProcessError`], [`ProtocolError`], [`ValidationError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use skvisor::{Config, Controller, EventKind, IntervalMode};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!     let command = vec!["./my-sketch".to_string()];
//!
//!     let controller = Controller::new(cfg, command, Vec::new());
//!     let handle = controller.handle();
//!     let mut events = controller.bus().subscribe();
//!
//!     let token = CancellationToken::new();
//!     tokio::spawn(controller.run(token.clone()));
//!
//!     // Tweak a parameter; the controller reruns the generator when idle.
//!     handle.set_value("count", 12i64).await?;
//!     handle.switch_interval(IntervalMode::Fast).await?;
//!
//!     while let Ok(ev) = events.recv().await {
//!         if ev.kind == EventKind::ArtifactReady {
//!             println!("new artifact: {}", ev.path.as_deref().unwrap_or(""));
//!             break;
//!         }
//!     }
//!
//!     token.cancel();
//!     Ok(())
//! }
//! ```
mod config;
mod controller;
mod error;
mod events;
mod params;
mod process;
mod protocol;
mod subscribers;

pub mod export;

// ---- Public re-exports ----

pub use config::{Config, IntervalMode};
pub use controller::{Controller, ControllerHandle, SubmitError};
pub use error::{ProcessError, ProtocolError, ValidationError};
pub use events::{Bus, Event, EventKind};
pub use params::{
    manifest_equals, reconcile, Manifest, ParamSchema, ParamValue, ParameterStore, ValueSet,
};
pub use process::{Generate, GeneratorRef, ProcessSupervisor, RunRequest, ENV_MARKER};
pub use protocol::{parse, RunResult, CONTROL_PREFIX};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
