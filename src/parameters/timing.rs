//! Build-time timing overrides

use traffic_signal_core::TimingParams;

/// Raw override strings, empty when not set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingOverrides<'a> {
    pub min_go_ms: &'a str,
    pub max_go_ms: &'a str,
    pub per_vehicle_bonus_ms: &'a str,
    pub caution_ms: &'a str,
    pub log_interval_ms: &'a str,
}

impl TimingOverrides<'static> {
    /// Overrides captured from the build environment
    pub const BUILD: Self = Self {
        min_go_ms: env!("SIGNAL_MIN_GO_MS"),
        max_go_ms: env!("SIGNAL_MAX_GO_MS"),
        per_vehicle_bonus_ms: env!("SIGNAL_PER_VEHICLE_MS"),
        caution_ms: env!("SIGNAL_CAUTION_MS"),
        log_interval_ms: env!("SIGNAL_LOG_INTERVAL_MS"),
    };
}

impl TimingOverrides<'_> {
    /// Whether any override is set
    pub fn is_empty(&self) -> bool {
        [
            self.min_go_ms,
            self.max_go_ms,
            self.per_vehicle_bonus_ms,
            self.caution_ms,
            self.log_interval_ms,
        ]
        .iter()
        .all(|value| value.trim().is_empty())
    }

    /// Apply the overrides on top of `base`
    ///
    /// Each field parses independently. If the combined result fails
    /// validation, `base` is returned unchanged.
    pub fn apply(&self, base: TimingParams) -> TimingParams {
        let params = TimingParams {
            min_go_ms: parse_or("SIGNAL_MIN_GO_MS", self.min_go_ms, base.min_go_ms),
            max_go_ms: parse_or("SIGNAL_MAX_GO_MS", self.max_go_ms, base.max_go_ms),
            per_vehicle_bonus_ms: parse_or(
                "SIGNAL_PER_VEHICLE_MS",
                self.per_vehicle_bonus_ms,
                base.per_vehicle_bonus_ms,
            ),
            caution_ms: parse_or("SIGNAL_CAUTION_MS", self.caution_ms, base.caution_ms),
            log_interval_ms: parse_or(
                "SIGNAL_LOG_INTERVAL_MS",
                self.log_interval_ms,
                base.log_interval_ms,
            ),
            ..base
        };

        match params.validate() {
            Ok(()) => params,
            Err(e) => {
                crate::log_warn!("Timing overrides rejected ({}), using defaults", e);
                base
            }
        }
    }
}

fn parse_or(name: &str, raw: &str, fallback: u32) -> u32 {
    let raw = raw.trim();
    if raw.is_empty() {
        return fallback;
    }
    match raw.parse::<u32>() {
        Ok(value) => value,
        Err(_) => {
            crate::log_warn!("Ignoring {}={}: not a millisecond count", name, raw);
            fallback
        }
    }
}

/// Timing parameters with build-time overrides applied
pub fn timing_from_build_env() -> TimingParams {
    let overrides = TimingOverrides::BUILD;
    if !overrides.is_empty() {
        crate::log_info!("Applying build-time timing overrides");
    }
    overrides.apply(TimingParams::default())
}
