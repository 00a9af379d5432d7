//! RP2350 platform implementation for Raspberry Pi Pico 2 W
//!
//! Concrete GPIO, UART and clock implementations for driving a signal head and
//! reading push-button or loop detectors on the RP2350.
//!
//! # Feature Gate
//!
//! This module is only available when the `pico2_w` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! traffic_signal = { version = "0.1", features = ["pico2_w"] }
//! ```

mod gpio;
mod time;
mod uart;

pub use gpio::Rp2350Gpio;
pub use time::Rp2350Clock;
pub use uart::Rp2350Uart;
