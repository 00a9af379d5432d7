//! Telemetry sinks for simulation runs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use traffic_signal::communication::LogTelemetry;
use traffic_signal_core::telemetry::{LaneRecord, CSV_HEADER};
use traffic_signal_core::traits::TelemetrySink;

use crate::error::SitlError;

/// Plain CSV: one header line, then one row per lane record.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    out: W,
    rows: u64,
    write_errors: u64,
}

impl CsvSink<BufWriter<File>> {
    /// Create (or truncate) a CSV file and write its header.
    pub fn create(path: &Path) -> Result<Self, SitlError> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file)).map_err(SitlError::from)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap a writer, writing the header immediately.
    pub fn new(mut out: W) -> std::io::Result<Self> {
        writeln!(out, "{CSV_HEADER}")?;
        Ok(Self {
            out,
            rows: 0,
            write_errors: 0,
        })
    }

    /// Rows written.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Rows lost to write errors.
    pub fn write_errors(&self) -> u64 {
        self.write_errors
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TelemetrySink for CsvSink<W> {
    fn emit(&mut self, record: &LaneRecord) {
        match writeln!(self.out, "{}", record.to_csv()) {
            Ok(()) => self.rows += 1,
            Err(e) => {
                self.write_errors += 1;
                eprintln!("CSV write failed: {e}");
            }
        }
    }

    fn end_entry(&mut self) {
        if let Err(e) = self.out.flush() {
            eprintln!("CSV flush failed: {e}");
        }
    }
}

/// Telemetry destination chosen from the configuration.
#[derive(Debug)]
pub enum SimTelemetry {
    /// Framed entries on the log
    Log(LogTelemetry),
    /// CSV file
    Csv(CsvSink<BufWriter<File>>),
}

impl SimTelemetry {
    /// CSV file if `path` is given, the log otherwise.
    pub fn open(path: Option<&Path>) -> Result<Self, SitlError> {
        match path {
            Some(path) => Ok(SimTelemetry::Csv(CsvSink::create(path)?)),
            None => Ok(SimTelemetry::Log(LogTelemetry::new())),
        }
    }
}

impl TelemetrySink for SimTelemetry {
    fn begin_entry(&mut self, timestamp_ms: u64) {
        match self {
            SimTelemetry::Log(sink) => sink.begin_entry(timestamp_ms),
            SimTelemetry::Csv(sink) => sink.begin_entry(timestamp_ms),
        }
    }

    fn emit(&mut self, record: &LaneRecord) {
        match self {
            SimTelemetry::Log(sink) => sink.emit(record),
            SimTelemetry::Csv(sink) => sink.emit(record),
        }
    }

    fn end_entry(&mut self) {
        match self {
            SimTelemetry::Log(sink) => sink.end_entry(),
            SimTelemetry::Csv(sink) => sink.end_entry(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traffic_signal_core::{LaneId, Phase};

    #[test]
    fn test_csv_sink_writes_header_and_rows() {
        let mut sink = CsvSink::new(Vec::new()).unwrap();
        sink.begin_entry(10000);
        sink.emit(&LaneRecord {
            timestamp_ms: 10000,
            lane_id: LaneId(1),
            phase: Phase::Stop,
            pending_count: 3,
            go_duration_ms: 4000,
            cumulative_wait_ms: 6000,
        });
        sink.end_entry();

        assert_eq!(sink.rows(), 1);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            format!("{CSV_HEADER}\n10000,1,STOP,3,4000,6000\n")
        );
    }
}
