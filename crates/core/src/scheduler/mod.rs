//! Tick statistics for the cooperative scheduler loop
//!
//! The loop itself lives in the root crate next to the platform adapters;
//! this module holds the pure bookkeeping it reports through.
//!
//! # Components
//!
//! - [`types`]: Core types (TickStats)

pub mod types;

pub use types::*;
