//! I/O collaborator traits
//!
//! The controller never touches hardware directly. Lamps, detectors, the
//! telemetry consumer and the operator console are reached through these
//! traits, implemented by the platform crates.

use crate::telemetry::LaneRecord;

/// One of the three lamps of a signal head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lamp {
    Stop,
    Caution,
    Go,
}

impl Lamp {
    /// All lamps of a signal head, in mounting order
    pub const ALL: [Lamp; 3] = [Lamp::Stop, Lamp::Caution, Lamp::Go];
}

/// Lamp output port of one lane
///
/// Outputs are infallible at this layer: implementations that drive real
/// hardware report failures through their own logging.
pub trait LampOutput {
    /// Energize a lamp
    fn lamp_on(&mut self, lamp: Lamp);

    /// De-energize a lamp
    fn lamp_off(&mut self, lamp: Lamp);
}

/// Logical level of a detector input after pull/polarity handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputLevel {
    /// A vehicle is present (button pressed, loop occupied)
    Active,
    /// Idle level
    Inactive,
}

/// Arrival-sensing input of one lane
pub trait DetectorInput {
    /// Sample the current level
    fn level(&self) -> InputLevel;
}

/// Consumer of telemetry records
///
/// Delivery is fire-and-forget. `begin_entry`/`end_entry` frame the
/// records of one logger invocation and default to no-ops.
pub trait TelemetrySink {
    /// Called once before the records of a log entry
    fn begin_entry(&mut self, _timestamp_ms: u64) {}

    /// Emit one lane record
    fn emit(&mut self, record: &LaneRecord);

    /// Called once after the records of a log entry
    fn end_entry(&mut self) {}
}

/// Single-byte operator command channel
///
/// Reading never blocks: `read_byte` returns `None` when nothing is
/// pending.
pub trait CommandChannel {
    /// Whether at least one byte can be read without blocking
    fn available(&self) -> bool;

    /// Take the next pending byte, if any
    fn read_byte(&mut self) -> Option<u8>;

    /// Send one line of reply text (the implementation adds the line ending)
    fn write_line(&mut self, line: &str);
}
