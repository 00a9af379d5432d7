//! Three-lamp signal head on GPIO outputs
//!
//! Each lamp is one push-pull output, lit when high. Write failures are
//! logged and otherwise ignored: the controller treats lamp outputs as
//! infallible and keeps cycling.

use traffic_signal_core::traits::{Lamp, LampOutput};

use crate::platform::{GpioInterface, GpioMode, Result};

/// Stop, caution and go lamps of one lane
#[derive(Debug)]
pub struct GpioSignalHead<G: GpioInterface> {
    stop: G,
    caution: G,
    go: G,
    write_errors: u32,
}

impl<G: GpioInterface> GpioSignalHead<G> {
    /// Configure the three pins as outputs, all lamps off
    ///
    /// # Errors
    ///
    /// Returns the platform error of the first pin that cannot be
    /// configured or driven low.
    pub fn new(mut stop: G, mut caution: G, mut go: G) -> Result<Self> {
        for pin in [&mut stop, &mut caution, &mut go] {
            pin.set_mode(GpioMode::OutputPushPull)?;
            pin.set_low()?;
        }
        Ok(Self {
            stop,
            caution,
            go,
            write_errors: 0,
        })
    }

    /// Pin driving `lamp`
    pub fn pin(&self, lamp: Lamp) -> &G {
        match lamp {
            Lamp::Stop => &self.stop,
            Lamp::Caution => &self.caution,
            Lamp::Go => &self.go,
        }
    }

    /// Mutable access to the pin driving `lamp`
    pub fn pin_mut(&mut self, lamp: Lamp) -> &mut G {
        match lamp {
            Lamp::Stop => &mut self.stop,
            Lamp::Caution => &mut self.caution,
            Lamp::Go => &mut self.go,
        }
    }

    /// Whether `lamp` currently reads lit
    pub fn is_lit(&self, lamp: Lamp) -> bool {
        self.pin(lamp).read()
    }

    /// Lamp writes that failed since construction
    pub fn write_errors(&self) -> u32 {
        self.write_errors
    }

    fn drive(&mut self, lamp: Lamp, on: bool) {
        let pin = self.pin_mut(lamp);
        let result = if on { pin.set_high() } else { pin.set_low() };
        if let Err(e) = result {
            self.write_errors = self.write_errors.saturating_add(1);
            crate::log_warn!("Lamp {:?} write failed: {:?}", lamp, e);
        }
    }
}

impl<G: GpioInterface> LampOutput for GpioSignalHead<G> {
    fn lamp_on(&mut self, lamp: Lamp) {
        self.drive(lamp, true);
    }

    fn lamp_off(&mut self, lamp: Lamp) {
        self.drive(lamp, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockGpio;

    fn head() -> GpioSignalHead<MockGpio> {
        GpioSignalHead::new(
            MockGpio::new_output(),
            MockGpio::new_output(),
            MockGpio::new_output(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_head_is_dark() {
        let head = head();
        for lamp in Lamp::ALL {
            assert!(!head.is_lit(lamp));
        }
    }

    #[test]
    fn test_new_configures_input_pins_as_outputs() {
        let head = GpioSignalHead::new(
            MockGpio::new_input(),
            MockGpio::new_input(),
            MockGpio::new_input(),
        )
        .unwrap();
        assert_eq!(head.pin(Lamp::Go).mode(), GpioMode::OutputPushPull);
    }

    #[test]
    fn test_lamp_on_off() {
        let mut head = head();
        head.lamp_on(Lamp::Go);
        assert!(head.is_lit(Lamp::Go));
        assert!(!head.is_lit(Lamp::Stop));

        head.lamp_off(Lamp::Go);
        assert!(!head.is_lit(Lamp::Go));
        assert_eq!(head.write_errors(), 0);
    }

    #[test]
    fn test_construction_fails_on_dead_pin() {
        let mut go = MockGpio::new_output();
        go.fail_writes();
        let result = GpioSignalHead::new(MockGpio::new_output(), MockGpio::new_output(), go);
        assert!(result.is_err());
    }

    #[test]
    fn test_write_failure_is_counted_not_fatal() {
        let mut head = head();
        head.pin_mut(Lamp::Caution).fail_writes();

        head.lamp_on(Lamp::Caution);
        assert_eq!(head.write_errors(), 1);
        assert!(!head.is_lit(Lamp::Caution));

        // Other lamps keep working
        head.lamp_on(Lamp::Stop);
        assert!(head.is_lit(Lamp::Stop));
        assert_eq!(head.write_errors(), 1);
    }
}
