//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the regeneration controller and the
//! subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — event classification and payload
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Controller` (lifecycle, collaborator notifications,
//!   diagnostics), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the controller's fan-out listener (feeds `SubscriberSet`)
//!   and any ad-hoc `Bus::subscribe()` receiver.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
