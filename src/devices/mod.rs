//! Signal head and detector drivers
//!
//! Adapters from platform GPIO pins to the lamp and detector traits of
//! `traffic_signal_core`.

pub mod detector;
pub mod signal_head;

pub use detector::GpioDetector;
pub use signal_head::GpioSignalHead;
