use traffic_signal::platform::PlatformError;
use traffic_signal_core::{SignalError, TimingError};

/// Errors that can occur while configuring or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SitlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid timing: {0}")]
    Timing(TimingError),

    #[error("Controller error: {0}")]
    Signal(SignalError),

    #[error("Platform error: {0}")]
    Platform(PlatformError),
}

impl From<TimingError> for SitlError {
    fn from(e: TimingError) -> Self {
        SitlError::Timing(e)
    }
}

impl From<SignalError> for SitlError {
    fn from(e: SignalError) -> Self {
        match e {
            SignalError::Timing(timing) => SitlError::Timing(timing),
            other => SitlError::Signal(other),
        }
    }
}

impl From<PlatformError> for SitlError {
    fn from(e: PlatformError) -> Self {
        SitlError::Platform(e)
    }
}
