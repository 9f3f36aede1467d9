//! # Core subscriber trait.
//!
//! `Subscribe` is the extension point for plugging collaborators into the
//! regeneration loop: the viewer reacts to `ArtifactReady`/`ArtifactCleared`,
//! the form builder to `SchemaChanged`, a diagnostics sink to `Diagnostic`.
//! Each subscriber is driven by a dedicated worker loop fed by a bounded queue
//! owned by the [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, rendering, batching) — they do **not**
//!   block the controller nor other subscribers.
//! - Each subscriber **declares** its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. If a queue overflows, events for that
//!   subscriber are **dropped** and a `SubscriberOverflow` event is published.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should
/// avoid blocking the async runtime (prefer async I/O and cooperative waits).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use skvisor::{Event, EventKind, Subscribe};
///
/// struct Viewer;
///
/// #[async_trait]
/// impl Subscribe for Viewer {
///     async fn on_event(&self, ev: &Event) {
///         match ev.kind {
///             EventKind::ArtifactReady => { /* load ev.path */ }
///             EventKind::ArtifactCleared => { /* mark display stale */ }
///             _ => {}
///         }
///     }
///     fn name(&self) -> &'static str { "viewer" }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for delivery diagnostics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    ///
    /// On overflow, events for this subscriber are dropped.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
