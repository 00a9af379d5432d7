//! Vehicle detector on a GPIO input
//!
//! The classic wiring is a push button or loop relay pulling the pin to
//! ground, with the internal pull-up holding it high when idle.

use traffic_signal_core::traits::{DetectorInput, InputLevel};

use crate::platform::{GpioInterface, GpioMode, Result};

/// Detector input with configurable polarity
#[derive(Debug)]
pub struct GpioDetector<G: GpioInterface> {
    pin: G,
    active_low: bool,
}

impl<G: GpioInterface> GpioDetector<G> {
    /// Input with pull-up, active when pulled low
    pub fn pull_up(mut pin: G) -> Result<Self> {
        pin.set_mode(GpioMode::InputPullUp)?;
        Ok(Self {
            pin,
            active_low: true,
        })
    }

    /// Input with pull-down, active when driven high
    pub fn pull_down(mut pin: G) -> Result<Self> {
        pin.set_mode(GpioMode::InputPullDown)?;
        Ok(Self {
            pin,
            active_low: false,
        })
    }

    pub fn pin(&self) -> &G {
        &self.pin
    }

    pub fn pin_mut(&mut self) -> &mut G {
        &mut self.pin
    }
}

impl<G: GpioInterface> DetectorInput for GpioDetector<G> {
    fn level(&self) -> InputLevel {
        if self.pin.read() != self.active_low {
            InputLevel::Active
        } else {
            InputLevel::Inactive
        }
    }
}
