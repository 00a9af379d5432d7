//! traffic_signal_core - Pure no_std logic for a demand-responsive signal controller
//!
//! This crate contains the platform-agnostic state machine and timing rules
//! of a two-lane intersection. It can be tested on host without any feature
//! flags or embedded dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives in logic (only optional derives)
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Lamps, detectors, clock and console injected via traits
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource, LampOutput, ...)
//! - [`lane`]: Lane data and phases
//! - [`timing`]: Timing parameters and the GO duration calculation
//! - [`signal`]: The intersection controller state machine
//! - [`detector`]: Debounced vehicle detection
//! - [`telemetry`]: Lane records and CSV rendering
//! - [`command`]: Single-byte operator commands
//! - [`scheduler`]: Tick statistics

#![no_std]

pub mod command;
pub mod detector;
pub mod lane;
pub mod scheduler;
pub mod signal;
pub mod telemetry;
pub mod timing;
pub mod traits;

#[cfg(test)]
mod testing;

pub use detector::{Detection, VehicleDetector};
pub use lane::{Lane, LaneId, Phase, LANE_COUNT};
pub use signal::{Controller, SignalError, StepOutcome, Transition};
pub use timing::{TimingError, TimingParams};
