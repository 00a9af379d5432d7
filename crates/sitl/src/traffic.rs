//! Vehicle arrival generator.
//!
//! Presses a lane's simulated detector pin when an arrival is due. Arrivals
//! due while a press is still in progress wait for the next step. Periodic
//! arrivals missed because the step is longer than the interval are
//! dropped.

use std::collections::VecDeque;

use crate::config::LaneTraffic;
use crate::platform::SitlGpio;

/// Arrival source of one lane.
#[derive(Debug)]
pub struct TrafficGenerator {
    detector: SitlGpio,
    interval_ms: Option<u64>,
    next_periodic_ms: Option<u64>,
    scripted_ms: VecDeque<u64>,
    press_reads: u32,
    presses: u32,
}

impl TrafficGenerator {
    /// Generator pressing `detector`, with periodic arrivals counted from `start_ms`.
    pub fn new(detector: SitlGpio, traffic: &LaneTraffic, start_ms: u64) -> Self {
        let mut scripted: Vec<u64> = traffic.scripted_arrivals_ms.clone();
        scripted.sort_unstable();
        Self {
            detector,
            interval_ms: traffic.arrival_interval_ms,
            next_periodic_ms: traffic.arrival_interval_ms.map(|i| start_ms + i),
            scripted_ms: scripted.into(),
            press_reads: traffic.press_reads.max(1),
            presses: 0,
        }
    }

    /// Press the detector if an arrival is due at `now_ms`.
    ///
    /// Returns whether a press started.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        if self.detector.is_pressed() || !self.due(now_ms) {
            return false;
        }

        if self.scripted_ms.front().is_some_and(|at| *at <= now_ms) {
            // One scripted arrival per press; a backlog drains over the next steps
            self.scripted_ms.pop_front();
        } else if let (Some(next), Some(interval)) = (self.next_periodic_ms, self.interval_ms) {
            let missed = (now_ms - next) / interval + 1;
            self.next_periodic_ms = Some(next + missed * interval);
        }

        self.detector.press(self.press_reads);
        self.presses = self.presses.saturating_add(1);
        true
    }

    fn due(&self, now_ms: u64) -> bool {
        let scripted = self.scripted_ms.front().is_some_and(|at| *at <= now_ms);
        let periodic = self.next_periodic_ms.is_some_and(|at| at <= now_ms);
        scripted || periodic
    }

    /// Presses started so far.
    pub fn presses(&self) -> u32 {
        self.presses
    }

    /// Whether any arrival is still to come.
    pub fn has_pending(&self) -> bool {
        self.next_periodic_ms.is_some() || !self.scripted_ms.is_empty()
    }
}
