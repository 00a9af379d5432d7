//! Simulated platform for SITL.
//!
//! Simulated peripherals (GPIO, UART, timer) implementing the controller's
//! platform traits on the host.

pub mod gpio;
pub mod timer;
pub mod uart;

pub use gpio::SitlGpio;
pub use timer::SitlTimeSource;
pub use uart::SitlUart;
