//! Shared fakes for unit tests

use core::cell::Cell;

use crate::lane::{Lane, LaneId, LANE_COUNT};
use crate::signal::Controller;
use crate::timing::TimingParams;
use crate::traits::{DetectorInput, InputLevel, Lamp, LampOutput, MockTime, TimeSource};

/// Lamp outputs that remember which lamps are lit
#[derive(Debug, Default)]
pub struct TestLamps {
    pub lit: [bool; 3],
}

impl TestLamps {
    pub fn is_lit(&self, lamp: Lamp) -> bool {
        self.lit[lamp as usize]
    }

    pub fn lit_count(&self) -> usize {
        self.lit.iter().filter(|on| **on).count()
    }
}

impl LampOutput for TestLamps {
    fn lamp_on(&mut self, lamp: Lamp) {
        self.lit[lamp as usize] = true;
    }

    fn lamp_off(&mut self, lamp: Lamp) {
        self.lit[lamp as usize] = false;
    }
}

/// Detector that is active during a window of mock time
///
/// `window` holds `(pressed_at_ms, released_at_ms)`; the input reads
/// active while `pressed_at_ms <= now < released_at_ms`.
#[derive(Clone, Copy)]
pub struct TestSensor<'a> {
    pub clock: &'a MockTime,
    pub window: &'a Cell<(u64, u64)>,
}

impl DetectorInput for TestSensor<'_> {
    fn level(&self) -> InputLevel {
        let (pressed, released) = self.window.get();
        let now = self.clock.now_ms();
        if pressed <= now && now < released {
            InputLevel::Active
        } else {
            InputLevel::Inactive
        }
    }
}

/// Detector that never reports a vehicle
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSensor;

impl DetectorInput for NoSensor {
    fn level(&self) -> InputLevel {
        InputLevel::Inactive
    }
}

pub type TestController = Controller<TestLamps, NoSensor, LANE_COUNT>;

/// Two-lane controller without detectors, started at `now_ms`
pub fn controller_at(now_ms: u64) -> TestController {
    let lanes = [
        Lane::new(LaneId(0), TestLamps::default(), NoSensor),
        Lane::new(LaneId(1), TestLamps::default(), NoSensor),
    ];
    Controller::new(lanes, TimingParams::default(), now_ms).expect("default timing is valid")
}
