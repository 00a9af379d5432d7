//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use traffic_signal::platform::mock::MockUart;
//! use traffic_signal::platform::traits::UartInterface;
//!
//! let mut uart = MockUart::new(Default::default());
//! uart.inject_rx_data(b"s");
//! assert!(uart.available());
//! ```

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod uart;

pub use gpio::MockGpio;
pub use uart::MockUart;
