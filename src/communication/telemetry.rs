//! Telemetry sinks
//!
//! Both sinks render the same text for one log entry:
//!
//! ```text
//! --- LOG ENTRY ---
//! Timestamp(ms),LaneID,State,VehicleCount,CurrentGreenDuration(ms),WaitTime(ms)
//! 10000,0,GO,0,4000,0
//! 10000,1,STOP,2,4000,6000
//! --- END ---
//! ```

use traffic_signal_core::telemetry::{LaneRecord, CSV_HEADER};
use traffic_signal_core::traits::TelemetrySink;

use crate::platform::UartInterface;

/// First line of a log entry
pub const ENTRY_BEGIN: &str = "--- LOG ENTRY ---";

/// Last line of a log entry
pub const ENTRY_END: &str = "--- END ---";

/// Telemetry through the logging macros (defmt on target, stdout on host)
#[derive(Debug, Default)]
pub struct LogTelemetry {
    entries: u32,
}

impl LogTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed entries
    pub fn entries(&self) -> u32 {
        self.entries
    }
}

impl TelemetrySink for LogTelemetry {
    fn begin_entry(&mut self, _timestamp_ms: u64) {
        crate::log_info!("{}", ENTRY_BEGIN);
        crate::log_info!("{}", CSV_HEADER);
    }

    fn emit(&mut self, record: &LaneRecord) {
        let row = record.to_csv();
        crate::log_info!("{}", row.as_str());
    }

    fn end_entry(&mut self) {
        crate::log_info!("{}", ENTRY_END);
        self.entries = self.entries.saturating_add(1);
    }
}

/// Telemetry written as CRLF text lines to a UART
#[derive(Debug)]
pub struct UartTelemetry<U: UartInterface> {
    uart: U,
    write_errors: u32,
}

impl<U: UartInterface> UartTelemetry<U> {
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            write_errors: 0,
        }
    }

    pub fn uart(&self) -> &U {
        &self.uart
    }

    /// Lines that could not be written completely
    pub fn write_errors(&self) -> u32 {
        self.write_errors
    }

    fn line(&mut self, text: &str) {
        let written = self
            .uart
            .write(text.as_bytes())
            .and_then(|_| self.uart.write(b"\r\n"));
        if let Err(e) = written {
            self.write_errors = self.write_errors.saturating_add(1);
            crate::log_warn!("Telemetry write failed: {:?}", e);
        }
    }
}

impl<U: UartInterface> TelemetrySink for UartTelemetry<U> {
    fn begin_entry(&mut self, _timestamp_ms: u64) {
        self.line(ENTRY_BEGIN);
        self.line(CSV_HEADER);
    }

    fn emit(&mut self, record: &LaneRecord) {
        let row = record.to_csv();
        self.line(row.as_str());
    }

    fn end_entry(&mut self) {
        self.line(ENTRY_END);
        if let Err(e) = self.uart.flush() {
            crate::log_warn!("Telemetry flush failed: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockUart;
    use crate::platform::traits::UartConfig;
    use traffic_signal_core::{LaneId, Phase};

    fn record(lane: u8, phase: Phase, pending: u32, wait: u64) -> LaneRecord {
        LaneRecord {
            timestamp_ms: 10000,
            lane_id: LaneId(lane),
            phase,
            pending_count: pending,
            go_duration_ms: 4000,
            cumulative_wait_ms: wait,
        }
    }

    #[test]
    fn test_uart_entry_framing() {
        let mut sink = UartTelemetry::new(MockUart::new(UartConfig::default()));
        sink.begin_entry(10000);
        sink.emit(&record(0, Phase::Go, 0, 0));
        sink.emit(&record(1, Phase::Stop, 2, 6000));
        sink.end_entry();

        assert_eq!(
            sink.uart().tx_lines(),
            vec![
                ENTRY_BEGIN.to_string(),
                CSV_HEADER.to_string(),
                "10000,0,GO,0,4000,0".to_string(),
                "10000,1,STOP,2,4000,6000".to_string(),
                ENTRY_END.to_string(),
            ]
        );
        assert_eq!(sink.write_errors(), 0);
    }

    #[test]
    fn test_log_sink_counts_entries() {
        let mut sink = LogTelemetry::new();
        sink.begin_entry(0);
        sink.emit(&record(0, Phase::Caution, 1, 0));
        sink.end_entry();
        assert_eq!(sink.entries(), 1);
    }
}
