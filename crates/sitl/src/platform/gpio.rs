//! Simulated GPIO peripheral for SITL.
//!
//! Tracks pin level and mode for simulated lamps and detectors. Clones of
//! a pin share its state, so the traffic generator can press a detector
//! the controller owns and the runner can watch lamps.
//!
//! A detector press lasts a number of *reads* rather than a span of time:
//! the controller's debounce wait samples the pin, and each sample uses up
//! one read of the press.

use std::sync::{Arc, Mutex, MutexGuard};

use traffic_signal::platform::error::GpioError;
use traffic_signal::platform::{GpioInterface, GpioMode, PlatformError};

#[derive(Debug)]
struct PinState {
    level: bool,
    mode: GpioMode,
    /// Remaining reads at the pressed (driven low) level
    press_reads: u32,
}

/// Simulated GPIO pin with shared state tracking.
#[derive(Debug, Clone)]
pub struct SitlGpio {
    pin: u8,
    state: Arc<Mutex<PinState>>,
}

impl SitlGpio {
    /// Create a new GPIO pin configured as output (default low).
    pub fn new_output(pin: u8) -> Self {
        Self::with_mode(pin, GpioMode::OutputPushPull)
    }

    /// Create a new GPIO pin configured as input with pull-up.
    pub fn new_input(pin: u8) -> Self {
        Self::with_mode(pin, GpioMode::InputPullUp)
    }

    fn with_mode(pin: u8, mode: GpioMode) -> Self {
        Self {
            pin,
            state: Arc::new(Mutex::new(PinState {
                level: false,
                mode,
                press_reads: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PinState> {
        // A panicking test thread must not take the pin down with it
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get the pin number.
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Pull the input low for the next `reads` reads.
    ///
    /// Extends a press that is still in progress.
    pub fn press(&self, reads: u32) {
        let mut state = self.lock();
        state.press_reads = state.press_reads.max(reads);
    }

    /// Whether a press is still in progress.
    pub fn is_pressed(&self) -> bool {
        self.lock().press_reads > 0
    }

    /// Inject a level (for simulating a sensor wired high or low).
    pub fn inject_state(&self, level: bool) {
        self.lock().level = level;
    }

    /// Level without consuming a press read.
    pub fn peek(&self) -> bool {
        let state = self.lock();
        Self::level_of(&state)
    }

    fn level_of(state: &PinState) -> bool {
        if state.press_reads > 0 {
            return false;
        }
        match state.mode {
            GpioMode::InputPullUp => true,
            GpioMode::InputPullDown => false,
            _ => state.level,
        }
    }
}

impl GpioInterface for SitlGpio {
    fn set_high(&mut self) -> traffic_signal::platform::Result<()> {
        let mut state = self.lock();
        if !state.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        state.level = true;
        Ok(())
    }

    fn set_low(&mut self) -> traffic_signal::platform::Result<()> {
        let mut state = self.lock();
        if !state.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        state.level = false;
        Ok(())
    }

    fn read(&self) -> bool {
        let mut state = self.lock();
        let level = Self::level_of(&state);
        state.press_reads = state.press_reads.saturating_sub(1);
        level
    }

    fn set_mode(&mut self, mode: GpioMode) -> traffic_signal::platform::Result<()> {
        self.lock().mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.lock().mode
    }
}
