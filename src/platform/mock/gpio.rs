//! Mock GPIO implementation for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};

/// Mock GPIO implementation
///
/// Tracks pin level and mode for test verification. Input pins honour
/// their pull resistor until a test drives them with `set_input_state`.
#[derive(Debug)]
pub struct MockGpio {
    state: bool,
    mode: GpioMode,
    driven: bool,
    fail_writes: bool,
}

impl MockGpio {
    /// Create a new mock GPIO in output mode (low)
    pub fn new_output() -> Self {
        Self {
            state: false,
            mode: GpioMode::OutputPushPull,
            driven: false,
            fail_writes: false,
        }
    }

    /// Create a new mock GPIO in input mode
    pub fn new_input() -> Self {
        Self {
            state: false,
            mode: GpioMode::Input,
            driven: false,
            fail_writes: false,
        }
    }

    /// Drive the input level (for simulating a detector)
    pub fn set_input_state(&mut self, high: bool) {
        self.state = high;
        self.driven = true;
    }

    /// Stop driving the input; the pull resistor decides the level again
    pub fn release_input(&mut self) {
        self.driven = false;
    }

    /// Make every subsequent write fail with a hardware error
    pub fn fail_writes(&mut self) {
        self.fail_writes = true;
    }

    fn write(&mut self, high: bool) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        if self.fail_writes {
            return Err(PlatformError::Gpio(GpioError::HardwareError));
        }
        self.state = high;
        Ok(())
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.write(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.write(false)
    }

    fn read(&self) -> bool {
        match self.mode {
            GpioMode::InputPullUp if !self.driven => true,
            GpioMode::InputPullDown if !self.driven => false,
            _ => self.state,
        }
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
