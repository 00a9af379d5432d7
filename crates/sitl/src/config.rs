//! Simulation configuration.
//!
//! Loaded from JSON. Every field has a default, so `{}` is a valid
//! configuration: default timing, no traffic, 100 ms steps, run until
//! stopped.
//!
//! ```json
//! {
//!   "timing": { "min_go_ms": 4000, "caution_ms": 2000 },
//!   "lanes": [
//!     { "arrival_interval_ms": 3000 },
//!     { "scripted_arrivals_ms": [500, 900, 12000], "press_reads": 4 }
//!   ],
//!   "step_ms": 50,
//!   "duration_ms": 60000,
//!   "csv_path": "signal_log.csv"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use traffic_signal::parameters::timing_from_build_env;
use traffic_signal_core::{TimingParams, LANE_COUNT};

use crate::error::SitlError;

/// Timing section, mirroring [`TimingParams`] field for field.
///
/// Fields missing from the file take the firmware's build-time timing, so a
/// simulation run matches a board built from the same environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub min_go_ms: u32,
    pub max_go_ms: u32,
    pub per_vehicle_bonus_ms: u32,
    pub caution_ms: u32,
    pub log_interval_ms: u32,
    pub debounce_max_wait_ms: u32,
    pub debounce_poll_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        timing_from_build_env().into()
    }
}

impl From<TimingParams> for TimingConfig {
    fn from(p: TimingParams) -> Self {
        Self {
            min_go_ms: p.min_go_ms,
            max_go_ms: p.max_go_ms,
            per_vehicle_bonus_ms: p.per_vehicle_bonus_ms,
            caution_ms: p.caution_ms,
            log_interval_ms: p.log_interval_ms,
            debounce_max_wait_ms: p.debounce_max_wait_ms,
            debounce_poll_ms: p.debounce_poll_ms,
        }
    }
}

impl TimingConfig {
    /// Validated controller timing.
    pub fn to_params(&self) -> Result<TimingParams, SitlError> {
        let params = TimingParams {
            min_go_ms: self.min_go_ms,
            max_go_ms: self.max_go_ms,
            per_vehicle_bonus_ms: self.per_vehicle_bonus_ms,
            caution_ms: self.caution_ms,
            log_interval_ms: self.log_interval_ms,
            debounce_max_wait_ms: self.debounce_max_wait_ms,
            debounce_poll_ms: self.debounce_poll_ms,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Vehicle arrivals on one lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneTraffic {
    /// Periodic arrivals, first one after one interval.
    pub arrival_interval_ms: Option<u64>,
    /// Arrivals at fixed simulation times.
    pub scripted_arrivals_ms: Vec<u64>,
    /// Detector reads each press stays active for.
    pub press_reads: u32,
}

impl Default for LaneTraffic {
    fn default() -> Self {
        Self {
            arrival_interval_ms: None,
            scripted_arrivals_ms: Vec::new(),
            press_reads: 3,
        }
    }
}

/// Complete simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub timing: TimingConfig,
    /// Traffic per lane; missing lanes get no traffic.
    pub lanes: Vec<LaneTraffic>,
    /// Simulated time between controller ticks.
    pub step_ms: u64,
    /// Stop after this much simulated time; `None` runs until interrupted.
    pub duration_ms: Option<u64>,
    /// Write telemetry as CSV to this file instead of the log.
    pub csv_path: Option<PathBuf>,
    /// Pace steps against the wall clock.
    pub realtime: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            lanes: Vec::new(),
            step_ms: 100,
            duration_ms: None,
            csv_path: None,
            realtime: true,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, SitlError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, SitlError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<(), SitlError> {
        self.timing.to_params()?;
        if self.step_ms == 0 {
            return Err(SitlError::Config("step_ms must be at least 1".into()));
        }
        if self.lanes.len() > LANE_COUNT {
            return Err(SitlError::Config(format!(
                "{} lanes configured, the intersection has {}",
                self.lanes.len(),
                LANE_COUNT
            )));
        }
        for (index, lane) in self.lanes.iter().enumerate() {
            if lane.arrival_interval_ms == Some(0) {
                return Err(SitlError::Config(format!(
                    "lane {index}: arrival_interval_ms must be at least 1"
                )));
            }
            if lane.press_reads == 0 {
                return Err(SitlError::Config(format!(
                    "lane {index}: press_reads must be at least 1"
                )));
            }
        }
        Ok(())
    }

    /// Traffic for lane `index`, empty if not configured.
    pub fn lane(&self, index: usize) -> LaneTraffic {
        self.lanes.get(index).cloned().unwrap_or_default()
    }
}
