//! Simulated time source for SITL.
//!
//! Wraps a shared atomic counter for simulation time, allowing the
//! simulation runner and the controller to share a consistent time
//! reference.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use traffic_signal_core::traits::{Delay, TimeSource};

/// Simulated time source backed by a shared atomic counter.
///
/// Multiple clones share the same underlying counter, enabling the runner
/// to advance time while the controller reads it. `delay_ms` advances the
/// counter instead of sleeping, so a debounce wait costs simulated time
/// only.
#[derive(Debug, Clone)]
pub struct SitlTimeSource {
    time_us: Arc<AtomicU64>,
}

impl SitlTimeSource {
    /// Create a new time source starting at zero.
    pub fn new() -> Self {
        Self {
            time_us: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Advance simulation time by the given number of microseconds.
    pub fn advance_us(&self, us: u64) {
        self.time_us.fetch_add(us, Ordering::Relaxed);
    }

    /// Advance simulation time by the given number of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1000);
    }

    /// Set simulation time to an absolute value.
    pub fn set_us(&self, us: u64) {
        self.time_us.store(us, Ordering::Relaxed);
    }
}

impl Default for SitlTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SitlTimeSource {
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    fn now_us(&self) -> u64 {
        self.time_us.load(Ordering::Relaxed)
    }
}

impl Delay for SitlTimeSource {
    fn delay_ms(&self, ms: u32) {
        self.advance_ms(ms as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_starts_at_zero() {
        let ts = SitlTimeSource::new();
        assert_eq!(ts.now_us(), 0);
        assert_eq!(ts.now_ms(), 0);
    }

    #[test]
    fn test_advance_time() {
        let ts = SitlTimeSource::new();
        ts.advance_us(1000);
        assert_eq!(ts.now_us(), 1000);
        assert_eq!(ts.now_ms(), 1);
    }

    #[test]
    fn test_set_time() {
        let ts = SitlTimeSource::new();
        ts.set_us(5_000_000);
        assert_eq!(ts.now_ms(), 5000);
    }

    #[test]
    fn test_delay_advances_time() {
        let ts = SitlTimeSource::new();
        ts.delay_ms(5);
        assert_eq!(ts.now_us(), 5000);
        assert_eq!(ts.elapsed_since(2), 3);
    }

    #[test]
    fn test_shared_time_via_clone() {
        let ts1 = SitlTimeSource::new();
        let ts2 = ts1.clone();
        ts1.advance_us(1000);
        assert_eq!(ts2.now_us(), 1000);
    }
}
