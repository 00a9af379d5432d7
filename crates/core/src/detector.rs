//! Vehicle detection with debounce
//!
//! Each lane's detector input is level-triggered. An inactive-to-active
//! change counts as one arrival; the detector then waits for the input to
//! return inactive before the lane can count again. The wait is the only
//! blocking point of a tick and is bounded by `debounce_max_wait_ms`.
//!
//! A lane whose input is still active when the bound expires is *latched*:
//! it is not counted again until it has been seen inactive. A stuck sensor
//! therefore plateaus its lane's demand instead of stalling the intersection.

use crate::lane::LANE_COUNT;
use crate::signal::Controller;
use crate::timing::TimingParams;
use crate::traits::{Delay, DetectorInput, InputLevel, LampOutput, TimeSource};

/// What the detector saw on one lane during a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Detection {
    /// Input inactive
    Idle,
    /// Arrival counted and the input released within the wait bound
    Arrival { count: u32 },
    /// Arrival counted but the input was still active when the bound expired
    Stuck { count: u32 },
    /// Input still active from an earlier stuck press, not counted
    Latched,
}

/// Edge-triggered arrival counter for every lane of a controller
#[derive(Debug, Clone)]
pub struct VehicleDetector<const N: usize = LANE_COUNT> {
    latched: [bool; N],
    stalls: u32,
}

impl<const N: usize> Default for VehicleDetector<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> VehicleDetector<N> {
    pub fn new() -> Self {
        Self {
            latched: [false; N],
            stalls: 0,
        }
    }

    /// Poll every lane's input in lane order
    ///
    /// Arrivals are recorded on the controller's lanes. Lanes are polled
    /// one after another, so a held input delays the next lane's poll by at
    /// most one wait bound.
    pub fn poll<O, I, C>(
        &mut self,
        controller: &mut Controller<O, I, N>,
        clock: &C,
    ) -> [Detection; N]
    where
        O: LampOutput,
        I: DetectorInput,
        C: TimeSource + Delay,
    {
        let params = *controller.params();
        core::array::from_fn(|index| self.poll_lane(index, controller, clock, &params))
    }

    fn poll_lane<O, I, C>(
        &mut self,
        index: usize,
        controller: &mut Controller<O, I, N>,
        clock: &C,
        params: &TimingParams,
    ) -> Detection
    where
        O: LampOutput,
        I: DetectorInput,
        C: TimeSource + Delay,
    {
        let lane = controller.lane_mut(index);

        match lane.detector().level() {
            InputLevel::Inactive => {
                self.latched[index] = false;
                Detection::Idle
            }
            InputLevel::Active if self.latched[index] => Detection::Latched,
            InputLevel::Active => {
                let count = lane.record_arrival();
                let released = wait_for_release(
                    lane.detector(),
                    clock,
                    params.debounce_max_wait_ms,
                    params.debounce_poll_ms,
                );
                if released {
                    Detection::Arrival { count }
                } else {
                    self.latched[index] = true;
                    self.stalls = self.stalls.saturating_add(1);
                    Detection::Stuck { count }
                }
            }
        }
    }

    /// Whether a lane is latched by a stuck input
    pub fn is_latched(&self, index: usize) -> bool {
        self.latched.get(index).copied().unwrap_or(false)
    }

    /// Number of debounce waits that hit the bound
    pub fn stalls(&self) -> u32 {
        self.stalls
    }
}

/// Wait for `input` to return inactive, sampling every `poll_ms`
///
/// A release only counts once it is still inactive one sample later, so
/// contact bounce on release is not mistaken for a new press. Returns
/// `false` if the input is still active after `max_wait_ms`.
pub fn wait_for_release<I, C>(input: &I, clock: &C, max_wait_ms: u32, poll_ms: u32) -> bool
where
    I: DetectorInput,
    C: TimeSource + Delay,
{
    let started_ms = clock.now_ms();
    loop {
        if input.level() == InputLevel::Inactive {
            clock.delay_ms(poll_ms);
            if input.level() == InputLevel::Inactive {
                return true;
            }
        }
        if clock.elapsed_since(started_ms) >= max_wait_ms as u64 {
            return false;
        }
        clock.delay_ms(poll_ms);
    }
}
