//! # Global runtime configuration.
//!
//! Provides [`Config`], centralized settings for the regeneration controller.
//!
//! ## Field semantics
//! - `slow_interval` / `fast_interval`: the two named regeneration intervals;
//!   the controller starts on `slow_interval` and switches on command.
//! - `bus_capacity`: event bus ring buffer size (min 1; clamped by the bus).
//! - `command_capacity`: depth of the controller's inbound command queue.

use std::time::Duration;

/// The two named regeneration intervals.
///
/// Selected via [`ControllerHandle::switch_interval`](crate::ControllerHandle::switch_interval);
/// the switch takes effect on the timer's next restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalMode {
    /// The default, relaxed cadence.
    Slow,
    /// A tighter cadence for active tweaking sessions.
    Fast,
}

/// Global configuration for the regeneration controller.
///
/// Defines:
/// - **Timer cadence**: slow/fast regeneration intervals
/// - **Event system**: bus capacity for event delivery
/// - **Control surface**: command queue depth
#[derive(Clone, Debug)]
pub struct Config {
    /// Regeneration interval in [`IntervalMode::Slow`] mode.
    pub slow_interval: Duration,

    /// Regeneration interval in [`IntervalMode::Fast`] mode.
    pub fast_interval: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items. Minimum value is 1 (enforced by the bus).
    pub bus_capacity: usize,

    /// Capacity of the controller's inbound command queue.
    ///
    /// When full, `ControllerHandle` submissions wait (async) or fail (`try_` variants).
    pub command_capacity: usize,
}

impl Config {
    /// Returns the interval configured for the given mode.
    #[inline]
    pub fn interval(&self, mode: IntervalMode) -> Duration {
        match mode {
            IntervalMode::Slow => self.slow_interval,
            IntervalMode::Fast => self.fast_interval,
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns a command queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn command_capacity_clamped(&self) -> usize {
        self.command_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `slow_interval = 5s`, `fast_interval = 1.5s` (the classic viewer cadences)
    /// - `bus_capacity = 1024`
    /// - `command_capacity = 64`
    fn default() -> Self {
        Self {
            slow_interval: Duration::from_millis(5000),
            fast_interval: Duration::from_millis(1500),
            bus_capacity: 1024,
            command_capacity: 64,
        }
    }
}
