//! Dynamic green-time calculation and timing parameters
//!
//! The GO phase of a lane grows with the demand that accumulated while it
//! was stopped, between a floor that prevents starvation and a ceiling that
//! prevents one lane from monopolizing the intersection.
//!
//! All durations are in milliseconds.

/// Minimum GO duration
pub const MIN_GO_MS: u32 = 4000;

/// Maximum GO duration
pub const MAX_GO_MS: u32 = 15000;

/// Extra GO time granted per waiting vehicle
pub const PER_VEHICLE_BONUS_MS: u32 = 500;

/// Fixed CAUTION duration
pub const CAUTION_MS: u32 = 2000;

/// Interval between telemetry entries
pub const LOG_INTERVAL_MS: u32 = 10000;

/// Longest time the detector waits for a held input to release
pub const DEBOUNCE_MAX_WAIT_MS: u32 = 500;

/// Sleep between samples while waiting for release
pub const DEBOUNCE_POLL_MS: u32 = 5;

/// Invalid timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// `min_go_ms` must be non-zero
    ZeroMinGo,
    /// `min_go_ms` exceeds `max_go_ms`
    MinAboveMax,
    /// `caution_ms` must be non-zero
    ZeroCaution,
    /// `log_interval_ms` must be non-zero
    ZeroLogInterval,
    /// `debounce_poll_ms` must be non-zero and no larger than `debounce_max_wait_ms`
    InvalidDebounce,
}

impl core::fmt::Display for TimingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TimingError::ZeroMinGo => write!(f, "minimum GO time must be non-zero"),
            TimingError::MinAboveMax => write!(f, "minimum GO time exceeds maximum GO time"),
            TimingError::ZeroCaution => write!(f, "CAUTION time must be non-zero"),
            TimingError::ZeroLogInterval => write!(f, "log interval must be non-zero"),
            TimingError::InvalidDebounce => write!(f, "invalid debounce poll/max-wait pair"),
        }
    }
}

/// Signal timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingParams {
    /// Floor of every GO phase
    pub min_go_ms: u32,
    /// Ceiling of every GO phase
    pub max_go_ms: u32,
    /// GO time added per vehicle waiting at phase entry
    pub per_vehicle_bonus_ms: u32,
    /// Duration of the CAUTION phase
    pub caution_ms: u32,
    /// Interval between telemetry entries
    pub log_interval_ms: u32,
    /// Upper bound of a single debounce wait
    pub debounce_max_wait_ms: u32,
    /// Sample period while waiting for a detector to release
    pub debounce_poll_ms: u32,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            min_go_ms: MIN_GO_MS,
            max_go_ms: MAX_GO_MS,
            per_vehicle_bonus_ms: PER_VEHICLE_BONUS_MS,
            caution_ms: CAUTION_MS,
            log_interval_ms: LOG_INTERVAL_MS,
            debounce_max_wait_ms: DEBOUNCE_MAX_WAIT_MS,
            debounce_poll_ms: DEBOUNCE_POLL_MS,
        }
    }
}

impl TimingParams {
    /// Check the parameter set for internal consistency
    pub fn validate(&self) -> Result<(), TimingError> {
        if self.min_go_ms == 0 {
            return Err(TimingError::ZeroMinGo);
        }
        if self.min_go_ms > self.max_go_ms {
            return Err(TimingError::MinAboveMax);
        }
        if self.caution_ms == 0 {
            return Err(TimingError::ZeroCaution);
        }
        if self.log_interval_ms == 0 {
            return Err(TimingError::ZeroLogInterval);
        }
        if self.debounce_poll_ms == 0 || self.debounce_poll_ms > self.debounce_max_wait_ms {
            return Err(TimingError::InvalidDebounce);
        }
        Ok(())
    }

    /// GO duration for a lane entering GO with `pending_count` waiting vehicles
    ///
    /// `min(min_go + pending * bonus, max_go)`, computed without overflow.
    pub fn go_duration_ms(&self, pending_count: u32) -> u32 {
        compute_go_duration(
            pending_count,
            self.min_go_ms,
            self.max_go_ms,
            self.per_vehicle_bonus_ms,
        )
    }

    /// Smallest demand that yields `max_go_ms`
    pub fn saturation_count(&self) -> u32 {
        if self.per_vehicle_bonus_ms == 0 {
            return u32::MAX;
        }
        let span = self.max_go_ms.saturating_sub(self.min_go_ms);
        span.div_ceil(self.per_vehicle_bonus_ms)
    }
}

/// Pure GO duration calculation
///
/// # Example
///
/// ```
/// use traffic_signal_core::timing::{compute_go_duration, MAX_GO_MS, MIN_GO_MS, PER_VEHICLE_BONUS_MS};
///
/// assert_eq!(compute_go_duration(0, MIN_GO_MS, MAX_GO_MS, PER_VEHICLE_BONUS_MS), 4000);
/// assert_eq!(compute_go_duration(10, MIN_GO_MS, MAX_GO_MS, PER_VEHICLE_BONUS_MS), 9000);
/// assert_eq!(compute_go_duration(30, MIN_GO_MS, MAX_GO_MS, PER_VEHICLE_BONUS_MS), 15000);
/// ```
pub const fn compute_go_duration(
    pending_count: u32,
    min_go_ms: u32,
    max_go_ms: u32,
    per_vehicle_bonus_ms: u32,
) -> u32 {
    let duration = min_go_ms.saturating_add(pending_count.saturating_mul(per_vehicle_bonus_ms));
    if duration > max_go_ms {
        max_go_ms
    } else {
        duration
    }
}
