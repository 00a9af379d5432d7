//! Core types for the scheduler loop
//!
//! The loop has no fixed period, so statistics track how long each tick
//! took rather than how regularly ticks arrived.

/// Runtime statistics of the scheduler loop
///
/// Updated once per tick and readable at any time for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickStats {
    /// Total number of ticks executed
    pub tick_count: u64,

    /// Last tick execution time in microseconds
    pub last_tick_us: u32,

    /// Average tick execution time in microseconds (exponential moving average)
    ///
    /// Uses EMA with alpha = 0.1 so a single debounce wait does not
    /// dominate the figure.
    pub avg_tick_us: u32,

    /// Maximum tick execution time observed in microseconds
    pub max_tick_us: u32,

    /// Phase transitions performed
    pub transitions: u32,

    /// Arrivals counted across all lanes
    pub arrivals: u32,

    /// Debounce waits that hit their bound
    pub debounce_stalls: u32,

    /// Lanes forced to STOP by the exclusion check
    pub exclusion_corrections: u32,

    /// Telemetry entries emitted
    pub telemetry_entries: u32,

    /// Command bytes handled
    pub commands: u32,
}

impl TickStats {
    /// Record the execution time of one tick
    pub fn record_tick(&mut self, execution_us: u32) {
        self.last_tick_us = execution_us;
        self.tick_count = self.tick_count.saturating_add(1);

        // EMA formula: avg_new = alpha * value + (1 - alpha) * avg_old
        // Using fixed-point arithmetic: avg_new = (value + 9 * avg_old) / 10
        if self.avg_tick_us == 0 {
            self.avg_tick_us = execution_us;
        } else {
            let avg = (execution_us as u64 + 9 * self.avg_tick_us as u64) / 10;
            self.avg_tick_us = avg as u32;
        }

        if execution_us > self.max_tick_us {
            self.max_tick_us = execution_us;
        }
    }

    /// Reset all statistics to initial state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_seeds_average() {
        let mut stats = TickStats::default();
        stats.record_tick(120);
        assert_eq!(stats.tick_count, 1);
        assert_eq!(stats.last_tick_us, 120);
        assert_eq!(stats.avg_tick_us, 120);
        assert_eq!(stats.max_tick_us, 120);
    }

    #[test]
    fn test_average_moves_slowly() {
        let mut stats = TickStats::default();
        stats.record_tick(100);
        stats.record_tick(200);
        // (200 + 9 * 100) / 10 = 110
        assert_eq!(stats.avg_tick_us, 110);
        assert_eq!(stats.max_tick_us, 200);
        assert_eq!(stats.last_tick_us, 200);
    }

    #[test]
    fn test_large_values_do_not_overflow() {
        let mut stats = TickStats::default();
        stats.record_tick(u32::MAX);
        stats.record_tick(u32::MAX);
        assert_eq!(stats.avg_tick_us, u32::MAX);
    }

    #[test]
    fn test_reset() {
        let mut stats = TickStats::default();
        stats.record_tick(10);
        stats.arrivals = 4;
        stats.reset();
        assert_eq!(stats, TickStats::default());
    }
}
