//! Core traits for platform-agnostic signal control.
//!
//! This module provides trait abstractions that decouple the controller
//! logic from the host platform that owns the lamps, the detectors, the
//! clock and the operator console.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Platform implementations (GPIO, UART, Embassy) live in the root crate

pub mod io;
pub mod time;

pub use io::{CommandChannel, DetectorInput, InputLevel, Lamp, LampOutput, TelemetrySink};
pub use time::{Delay, MockTime, TimeSource};
