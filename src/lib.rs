#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! traffic_signal - Demand-responsive controller for a two-lane intersection
//!
//! This library provides platform abstraction, lamp and detector drivers,
//! operator console and telemetry adapters, and the scheduler loop that
//! drives the pure state machine of `traffic_signal_core`.

// Platform abstraction layer (GPIO, UART, time)
pub mod platform;

// Lamp and detector drivers using platform abstraction
pub mod devices;

// Core systems (logging, scheduler loop)
pub mod core;

// Operator console and telemetry transports
pub mod communication;

// Timing configuration
pub mod parameters;
