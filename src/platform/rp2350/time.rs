//! RP2350 clock and delay
//!
//! This module provides the `Rp2350Clock` implementation of the
//! `TimeSource` and `Delay` traits using the `rp235x-hal` timer.

use rp235x_hal::timer::{Timer, TimerDevice};
use traffic_signal_core::traits::{Delay, TimeSource};

/// RP2350 clock
///
/// Wraps the `rp235x-hal` timer, a 64-bit microsecond counter that never
/// wraps in practice.
///
/// `delay_ms` busy-waits on the counter; the scheduler loop is synchronous
/// and the debounce wait is its only suspension point.
#[derive(Clone, Copy)]
pub struct Rp2350Clock<D: TimerDevice> {
    timer: Timer<D>,
}

impl<D: TimerDevice> Rp2350Clock<D> {
    /// Create a clock from an initialized HAL timer
    pub fn new(timer: Timer<D>) -> Self {
        Self { timer }
    }
}

impl<D> TimeSource for Rp2350Clock<D>
where
    D: TimerDevice + Clone + Send + Sync,
{
    fn now_ms(&self) -> u64 {
        self.now_us() / 1_000
    }

    fn now_us(&self) -> u64 {
        self.timer.get_counter().ticks()
    }
}

impl<D: TimerDevice> Delay for Rp2350Clock<D> {
    fn delay_ms(&self, ms: u32) {
        let until = self
            .timer
            .get_counter()
            .ticks()
            .saturating_add(ms as u64 * 1_000);
        while self.timer.get_counter().ticks() < until {
            core::hint::spin_loop();
        }
    }
}
