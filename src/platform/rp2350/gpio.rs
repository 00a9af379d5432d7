//! RP2350 GPIO implementation
//!
//! Lamp outputs and detector inputs on RP2350 using the `rp235x-hal` crate.

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};
use rp235x_hal::gpio::{
    DynPinId, FunctionNull, FunctionSioInput, FunctionSioOutput, Pin, PinId, PullNone, PullType,
    PullUp,
};

/// RP2350 GPIO implementation
///
/// Wraps the `rp235x-hal` GPIO pin to implement the `GpioInterface` trait.
pub struct Rp2350Gpio<I: PinId, F: rp235x_hal::gpio::Function, P: PullType> {
    pin: Pin<I, F, P>,
    mode: GpioMode,
}

impl<I: PinId, F: rp235x_hal::gpio::Function, P: PullType> Rp2350Gpio<I, F, P> {
    /// Wrap a HAL pin already configured for `mode`
    pub fn new(pin: Pin<I, F, P>, mode: GpioMode) -> Self {
        Self { pin, mode }
    }

    /// Erase the pin number from the type
    ///
    /// A signal head and a controller hold several pins of one type, so
    /// board code converts each configured pin before handing it over.
    pub fn into_dyn(self) -> Rp2350Gpio<DynPinId, F, P> {
        Rp2350Gpio {
            pin: self.pin.into_dyn_pin(),
            mode: self.mode,
        }
    }

    /// Convert to a push-pull lamp output
    pub fn into_output(self) -> Rp2350Gpio<I, FunctionSioOutput, PullNone>
    where
        I: rp235x_hal::gpio::ValidFunction<FunctionNull>,
        I: rp235x_hal::gpio::ValidFunction<FunctionSioOutput>,
    {
        let pin = self
            .pin
            .into_function::<FunctionNull>()
            .into_push_pull_output()
            .into_pull_type::<PullNone>();
        Rp2350Gpio {
            pin,
            mode: GpioMode::OutputPushPull,
        }
    }

    /// Convert to a detector input idling high through the internal pull-up
    pub fn into_pull_up_input(self) -> Rp2350Gpio<I, FunctionSioInput, PullUp>
    where
        I: rp235x_hal::gpio::ValidFunction<FunctionNull>,
        I: rp235x_hal::gpio::ValidFunction<FunctionSioInput>,
    {
        let pin = self
            .pin
            .into_function::<FunctionNull>()
            .into_pull_up_input();
        Rp2350Gpio {
            pin,
            mode: GpioMode::InputPullUp,
        }
    }
}

// Implementation for output pins
impl<I: PinId, P: PullType> GpioInterface for Rp2350Gpio<I, FunctionSioOutput, P> {
    fn set_high(&mut self) -> Result<()> {
        use embedded_hal::digital::v2::OutputPin;
        self.pin
            .set_high()
            .map_err(|_| PlatformError::Gpio(GpioError::HardwareError))
    }

    fn set_low(&mut self) -> Result<()> {
        use embedded_hal::digital::v2::OutputPin;
        self.pin
            .set_low()
            .map_err(|_| PlatformError::Gpio(GpioError::HardwareError))
    }

    fn read(&self) -> bool {
        use embedded_hal::digital::v2::InputPin;
        self.pin.is_high().unwrap_or(false)
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        // Pin type encodes the function; only the matching mode is accepted
        if mode.is_output() {
            self.mode = mode;
            Ok(())
        } else {
            Err(PlatformError::Gpio(GpioError::InvalidMode))
        }
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}

// Implementation for input pins
impl<I: PinId, P: PullType> GpioInterface for Rp2350Gpio<I, FunctionSioInput, P> {
    fn set_high(&mut self) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn set_low(&mut self) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn read(&self) -> bool {
        use embedded_hal::digital::v2::InputPin;
        self.pin.is_high().unwrap_or(false)
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        // Pin type encodes the function; only the matching mode is accepted
        if mode.is_output() {
            Err(PlatformError::Gpio(GpioError::InvalidMode))
        } else {
            self.mode = mode;
            Ok(())
        }
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
