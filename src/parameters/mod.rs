//! Timing configuration
//!
//! Phase timings are fixed at build time. Each one can be overridden by an
//! environment variable read by `build.rs`:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `SIGNAL_MIN_GO_MS` | `min_go_ms` | 4000 |
//! | `SIGNAL_MAX_GO_MS` | `max_go_ms` | 15000 |
//! | `SIGNAL_PER_VEHICLE_MS` | `per_vehicle_bonus_ms` | 500 |
//! | `SIGNAL_CAUTION_MS` | `caution_ms` | 2000 |
//! | `SIGNAL_LOG_INTERVAL_MS` | `log_interval_ms` | 10000 |
//!
//! Unset variables are empty and keep the default. Values that do not parse,
//! or a combination that fails [`TimingParams::validate`], fall back to the
//! defaults with a warning.

pub mod timing;

pub use timing::{timing_from_build_env, TimingOverrides};
