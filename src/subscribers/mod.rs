//! # Event subscribers: how collaborators hear about the loop.
//!
//! The viewer, form builder, and diagnostics sink of an outer application all
//! plug in the same way: implement [`Subscribe`], match on the
//! [`EventKind`](crate::events::EventKind)s you care about, and hand the
//! subscriber to the controller.
//!
//! ## Architecture
//! ```text
//! Controller ── publish(Event) ──► Bus ──► fan-out listener ──► SubscriberSet
//!                                                 │
//!                                            ┌────┴─────┬───────────┐
//!                                            ▼          ▼           ▼
//!                                         viewer   form builder  diagnostics
//!                               (ArtifactReady/  (SchemaChanged) (Diagnostic)
//!                                ArtifactCleared)
//! ```
//!
//! Delivery is queued and isolated per subscriber; see
//! [`SubscriberSet`] for the exact rules.

mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
mod log;

pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;

#[cfg(feature = "logging")]
pub use log::LogWriter;
