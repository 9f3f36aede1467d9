//! # Inbound control surface.
//!
//! [`ControllerHandle`] is the cheap, cloneable way for the outer application
//! (form builder, keyboard shortcuts, export helpers) to talk to the
//! controller loop. Every call is turned into a [`Command`] and serialized
//! onto the loop's single execution context — callers never touch controller
//! state directly.

use tokio::sync::{mpsc, oneshot};

use crate::config::IntervalMode;
use crate::controller::error::SubmitError;
use crate::params::ParamValue;

/// Commands consumed by the controller loop.
#[derive(Debug)]
pub(super) enum Command {
    /// A user edited a parameter (the form builder's "value changed" event).
    SetValue { name: String, value: ParamValue },

    /// Switch between the slow and fast regeneration cadences.
    SwitchInterval(IntervalMode),

    /// One-shot manual rerun (ignored while a run is in flight).
    Rerun,

    /// Query the path of the most recent artifact (for export/save utilities).
    ArtifactPath {
        reply: oneshot::Sender<Option<String>>,
    },
}

/// Handle for sending commands to a running [`Controller`](crate::Controller).
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    pub(super) tx: mpsc::Sender<Command>,
}

impl ControllerHandle {
    /// Submits a parameter edit.
    ///
    /// The edit is validated and clamped against the current manifest inside
    /// the loop; a rejected edit surfaces as a `Diagnostic` event. An accepted
    /// edit updates the value set immediately and triggers a regeneration if
    /// the controller is idle.
    pub async fn set_value(
        &self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Result<(), SubmitError> {
        self.send(Command::SetValue {
            name: name.into(),
            value: value.into(),
        })
        .await
    }

    /// Like [`set_value`](Self::set_value) but fails instead of waiting when
    /// the command queue is full.
    pub fn try_set_value(
        &self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Result<(), SubmitError> {
        self.tx
            .try_send(Command::SetValue {
                name: name.into(),
                value: value.into(),
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => SubmitError::Full,
                mpsc::error::TrySendError::Closed(_) => SubmitError::Closed,
            })
    }

    /// Switches the regeneration interval.
    ///
    /// Takes effect on the timer's next restart: immediately when idle,
    /// after the in-flight run completes otherwise.
    pub async fn switch_interval(&self, mode: IntervalMode) -> Result<(), SubmitError> {
        self.send(Command::SwitchInterval(mode)).await
    }

    /// Requests a one-shot manual rerun.
    ///
    /// A no-op while a run is already in flight (dropped, not queued).
    pub async fn rerun(&self) -> Result<(), SubmitError> {
        self.send(Command::Rerun).await
    }

    /// Returns the path of the most recent artifact, if any.
    ///
    /// `None` when no run has produced an artifact yet or the last successful
    /// run cleared it.
    pub async fn artifact_path(&self) -> Result<Option<String>, SubmitError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::ArtifactPath { reply }).await?;
        rx.await.map_err(|_| SubmitError::Closed)
    }

    async fn send(&self, cmd: Command) -> Result<(), SubmitError> {
        self.tx.send(cmd).await.map_err(|_| SubmitError::Closed)
    }
}
