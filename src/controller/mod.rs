//! # Controller: the regeneration loop and its control surface.
//!
//! - [`Controller`] — owns the timer, parameter store, and generator seam.
//! - [`ControllerHandle`] — cloneable command submitter for the outer app.
//! - [`SubmitError`] — submission failures (queue full, loop gone).

mod core;
mod error;
mod handle;
mod state;

pub use self::core::Controller;
pub use error::SubmitError;
pub use handle::ControllerHandle;
