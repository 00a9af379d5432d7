//! Lane state
//!
//! A lane is one traffic direction: its signal head, its arrival detector,
//! and the counters the controller keeps for it. Lanes are passive; every
//! phase change goes through [`crate::signal::Controller`].

use crate::timing::MIN_GO_MS;
use crate::traits::{DetectorInput, Lamp, LampOutput};

/// Number of lanes in the default intersection
pub const LANE_COUNT: usize = 2;

/// Stable lane identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LaneId(pub u8);

impl core::fmt::Display for LaneId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Right-of-way phase of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Go,
    Caution,
    Stop,
}

impl Phase {
    /// Upper-case phase name used in logs and telemetry
    pub const fn as_str(&self) -> &'static str {
        match self {
            Phase::Go => "GO",
            Phase::Caution => "CAUTION",
            Phase::Stop => "STOP",
        }
    }

    /// Lamp lit while in this phase
    pub const fn lamp(&self) -> Lamp {
        match self {
            Phase::Go => Lamp::Go,
            Phase::Caution => Lamp::Caution,
            Phase::Stop => Lamp::Stop,
        }
    }

    /// Whether this phase holds right-of-way (GO or CAUTION)
    pub const fn holds_right_of_way(&self) -> bool {
        matches!(self, Phase::Go | Phase::Caution)
    }
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One traffic direction
///
/// `outputs` and `detector` are fixed at construction. Counters are only
/// mutated by the controller and the detector.
#[derive(Debug)]
pub struct Lane<O, I> {
    id: LaneId,
    outputs: O,
    detector: I,
    pub(crate) pending_count: u32,
    pub(crate) phase: Phase,
    pub(crate) go_duration_ms: u32,
    pub(crate) phase_started_ms: u64,
    pub(crate) cumulative_wait_ms: u64,
}

impl<O: LampOutput, I: DetectorInput> Lane<O, I> {
    /// Create a lane in STOP with the default minimum GO duration
    pub fn new(id: LaneId, outputs: O, detector: I) -> Self {
        Self {
            id,
            outputs,
            detector,
            pending_count: 0,
            phase: Phase::Stop,
            go_duration_ms: MIN_GO_MS,
            phase_started_ms: 0,
            cumulative_wait_ms: 0,
        }
    }

    /// Count one arrival, saturating at `u32::MAX`
    pub fn record_arrival(&mut self) -> u32 {
        self.pending_count = self.pending_count.saturating_add(1);
        self.pending_count
    }

    /// Turn every other lamp off, then light `lamp`
    ///
    /// A lamp that is already lit stays lit, so re-asserting STOP on a
    /// stopped lane does not flicker.
    pub(crate) fn show(&mut self, lamp: Lamp) {
        for other in Lamp::ALL {
            if other != lamp {
                self.outputs.lamp_off(other);
            }
        }
        self.outputs.lamp_on(lamp);
    }
}

impl<O, I> Lane<O, I> {
    pub fn id(&self) -> LaneId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Arrivals accumulated since the lane last entered STOP
    pub fn pending_count(&self) -> u32 {
        self.pending_count
    }

    /// GO duration of the current or most recent GO phase
    pub fn go_duration_ms(&self) -> u32 {
        self.go_duration_ms
    }

    /// Clock reading at which the current phase was entered
    pub fn phase_started_ms(&self) -> u64 {
        self.phase_started_ms
    }

    /// STOP time accrued at log time
    pub fn cumulative_wait_ms(&self) -> u64 {
        self.cumulative_wait_ms
    }

    pub fn outputs(&self) -> &O {
        &self.outputs
    }

    pub fn detector(&self) -> &I {
        &self.detector
    }
}
