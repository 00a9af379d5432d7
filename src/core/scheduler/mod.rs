//! Scheduler loop
//!
//! The controller runs as a single cooperative loop with no fixed period.
//! Each tick performs, in order:
//!
//! 1. Phase timer evaluation of the active lane
//! 2. Detector poll of every lane (may block for one debounce bound)
//! 3. Telemetry entry, when the log deadline has passed
//! 4. At most one operator command byte
//!
//! Tick timing and event counters are kept in [`TickStats`].

pub mod intersection;

pub use intersection::{Intersection, TickReport};
pub use traffic_signal_core::scheduler::TickStats;
