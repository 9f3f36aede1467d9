//! # Runtime events emitted by the regeneration loop.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Run lifecycle**: a generation run started or finished.
//! - **Collaborator notifications**: schema changed (form builder), artifact
//!   ready/cleared (viewer), diagnostics (log sink).
//! - **Delivery events**: a subscriber queue overflowed or a subscriber panicked.
//!
//! The [`Event`] struct carries the kind plus optional payload fields set per
//! kind (artifact path, diagnostic text, manifest and values, interval).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore exact order when events are observed
//! out of order across subscribers.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::params::{Manifest, ValueSet};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Run lifecycle ===
    /// A generation run was launched.
    ///
    /// Sets: `at`, `seq`.
    RunStarted,

    /// A generation run finished (success or failure); the controller is idle
    /// again and the timer countdown has restarted.
    ///
    /// Sets: `at`, `seq`.
    RunFinished,

    // === Collaborator notifications ===
    /// The generator declared a structurally different manifest.
    ///
    /// Sets:
    /// - `manifest`: the new schema
    /// - `values`: the reconciled value assignment
    /// - `at`, `seq`
    ///
    /// Not emitted when a run re-declares the same schema (even reordered).
    SchemaChanged,

    /// A run produced an artifact; the viewer should (re)load it.
    ///
    /// Sets:
    /// - `path`: artifact path as printed by the generator
    /// - `at`, `seq`
    ArtifactReady,

    /// A successful run declared no artifact; the previous one is stale.
    /// Display policy is left to the viewer.
    ///
    /// Sets: `at`, `seq`.
    ArtifactCleared,

    /// Passthrough generator output, protocol error, process error, or
    /// rejected edit — anything the diagnostics sink should show.
    ///
    /// Sets:
    /// - `message`: the diagnostic text
    /// - `at`, `seq`
    Diagnostic,

    /// The regeneration interval was switched.
    ///
    /// Sets:
    /// - `interval`: the newly selected interval
    /// - `at`, `seq`
    IntervalSwitched,

    // === Delivery events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `message`: subscriber name and reason
    /// - `at`, `seq`
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `message`: subscriber name and panic info
    /// - `at`, `seq`
    SubscriberPanicked,
}

/// Runtime event with optional payload.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - remaining fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Artifact path (`ArtifactReady`).
    pub path: Option<Arc<str>>,
    /// Diagnostic or delivery-failure text.
    pub message: Option<Arc<str>>,
    /// New manifest (`SchemaChanged`).
    pub manifest: Option<Manifest>,
    /// Reconciled values (`SchemaChanged`).
    pub values: Option<ValueSet>,
    /// Selected interval (`IntervalSwitched`).
    pub interval: Option<Duration>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            path: None,
            message: None,
            manifest: None,
            values: None,
            interval: None,
        }
    }

    /// Attaches an artifact path.
    #[inline]
    pub fn with_path(mut self, path: impl Into<Arc<str>>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attaches diagnostic text.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Arc<str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches the new manifest.
    #[inline]
    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Attaches the reconciled values.
    #[inline]
    pub fn with_values(mut self, values: ValueSet) -> Self {
        self.values = Some(values);
        self
    }

    /// Attaches the selected interval.
    #[inline]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Creates a diagnostic event carrying the given text.
    #[inline]
    pub fn diagnostic(message: impl Into<Arc<str>>) -> Self {
        Event::new(EventKind::Diagnostic).with_message(message)
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_message(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_message(format!("subscriber={subscriber} panic={info}"))
    }

    /// Returns whether this is a diagnostic-category event.
    #[inline]
    pub fn is_diagnostic(&self) -> bool {
        matches!(self.kind, EventKind::Diagnostic)
    }
}
