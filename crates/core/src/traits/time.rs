//! Time abstraction traits for platform-agnostic timing operations.
//!
//! This module provides the `TimeSource` and `Delay` traits that abstract
//! over different time providers (hardware timer, simulated, mock) so that every
//! phase timer can be tested on host without embedded dependencies.

use core::cell::Cell;

/// Platform-agnostic monotonic clock.
///
/// This trait abstracts over different time providers:
/// - `Rp2350Clock` (in the root crate) for the RP2350 hardware timer
/// - `SitlTimeSource` (in the sitl crate) for simulation
/// - `MockTime` for host testing with controllable time
///
/// Readings must be monotonically non-decreasing. All phase timers compare
/// absolute readings, so a variable tick rate does not skew them.
///
/// # Example
///
/// ```
/// use traffic_signal_core::traits::{TimeSource, MockTime};
///
/// fn phase_expired<T: TimeSource>(time: &T, started_ms: u64, budget_ms: u32) -> bool {
///     time.now_ms().saturating_sub(started_ms) >= budget_ms as u64
/// }
///
/// let time = MockTime::new();
/// assert!(!phase_expired(&time, 0, 4000));
/// time.advance_ms(4000);
/// assert!(phase_expired(&time, 0, 4000));
/// ```
pub trait TimeSource: Clone + Send + Sync {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Returns current time in microseconds since system start.
    fn now_us(&self) -> u64;

    /// Returns elapsed time in milliseconds since a reference point.
    ///
    /// Uses saturating subtraction to handle a reference in the future.
    fn elapsed_since(&self, reference_ms: u64) -> u64 {
        self.now_ms().saturating_sub(reference_ms)
    }
}

/// Short blocking suspension used by the detector's debounce wait.
///
/// Implementations must let time advance: after `delay_ms(n)` returns, the
/// paired `TimeSource` must read at least `n` milliseconds later.
pub trait Delay {
    /// Suspend the caller for at least `ms` milliseconds.
    fn delay_ms(&self, ms: u32);
}

impl<T: TimeSource> TimeSource for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

impl<T: Delay + ?Sized> Delay for &T {
    fn delay_ms(&self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source for testing with controllable time advancement.
///
/// `delay_ms` advances the mock clock instead of sleeping, which makes
/// debounce waits deterministic in tests.
///
/// # Example
///
/// ```
/// use traffic_signal_core::traits::{Delay, MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now_ms(), 0);
///
/// time.delay_ms(5);
/// assert_eq!(time.now_ms(), 5);
/// assert_eq!(time.now_us(), 5000);
/// ```
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

// Safety: MockTime is only used in single-threaded test contexts
// where Cell is safe. The Send+Sync bounds on TimeSource trait
// are required for embedded contexts, but MockTime is not used there.
unsafe impl Send for MockTime {}
unsafe impl Sync for MockTime {}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time in milliseconds.
    pub fn with_initial_ms(ms: u64) -> Self {
        Self {
            current_us: Cell::new(ms * 1000),
        }
    }

    /// Sets the current time to an absolute value in milliseconds.
    pub fn set_ms(&self, ms: u64) {
        self.current_us.set(ms * 1000);
    }

    /// Advances the current time by the specified number of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.current_us.set(self.current_us.get() + ms * 1000);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_us.get() / 1000
    }

    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}

impl Delay for MockTime {
    fn delay_ms(&self, ms: u32) {
        self.advance_ms(ms as u64);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
