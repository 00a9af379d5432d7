//! Telemetry records
//!
//! One [`LaneRecord`] per lane is produced every log interval. Records
//! render as CSV rows under [`CSV_HEADER`] for file or serial consumers.

use core::fmt::{self, Write};

use crate::lane::{LaneId, Phase};

/// Column header matching [`LaneRecord::write_csv`]
pub const CSV_HEADER: &str =
    "Timestamp(ms),LaneID,State,VehicleCount,CurrentGreenDuration(ms),WaitTime(ms)";

/// Capacity of a rendered CSV row
pub const CSV_ROW_CAPACITY: usize = 96;

/// Snapshot of one lane at log time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LaneRecord {
    pub timestamp_ms: u64,
    pub lane_id: LaneId,
    pub phase: Phase,
    pub pending_count: u32,
    pub go_duration_ms: u32,
    pub cumulative_wait_ms: u64,
}

impl LaneRecord {
    /// Write the record as one CSV row (no line ending)
    pub fn write_csv<W: Write>(&self, out: &mut W) -> fmt::Result {
        write!(
            out,
            "{},{},{},{},{},{}",
            self.timestamp_ms,
            self.lane_id,
            self.phase.as_str(),
            self.pending_count,
            self.go_duration_ms,
            self.cumulative_wait_ms
        )
    }

    /// Render the record into a fixed-capacity string
    pub fn to_csv(&self) -> heapless::String<CSV_ROW_CAPACITY> {
        let mut row = heapless::String::new();
        // Widest possible row is well under CSV_ROW_CAPACITY
        let _ = self.write_csv(&mut row);
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_row() {
        let record = LaneRecord {
            timestamp_ms: 10000,
            lane_id: LaneId(1),
            phase: Phase::Stop,
            pending_count: 3,
            go_duration_ms: 4000,
            cumulative_wait_ms: 10000,
        };
        assert_eq!(record.to_csv().as_str(), "10000,1,STOP,3,4000,10000");
    }

    #[test]
    fn test_widest_row_fits() {
        let record = LaneRecord {
            timestamp_ms: u64::MAX,
            lane_id: LaneId(u8::MAX),
            phase: Phase::Caution,
            pending_count: u32::MAX,
            go_duration_ms: u32::MAX,
            cumulative_wait_ms: u64::MAX,
        };
        let mut row = heapless::String::<CSV_ROW_CAPACITY>::new();
        assert!(record.write_csv(&mut row).is_ok());
    }

    #[test]
    fn test_header_has_one_column_per_field() {
        assert_eq!(CSV_HEADER.split(',').count(), 6);
    }
}
