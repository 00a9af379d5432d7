//! traffic_signal_sitl - Software-in-the-loop simulation of the intersection
//!
//! Runs the unmodified controller from `traffic_signal` against simulated
//! GPIO pins, a simulated UART console and a shared simulated clock, with
//! configurable vehicle traffic per lane.

pub mod config;
pub mod error;
pub mod platform;
pub mod sim;
pub mod telemetry;
pub mod traffic;

pub use config::{LaneTraffic, SimConfig, TimingConfig};
pub use error::SitlError;
pub use platform::{SitlGpio, SitlTimeSource, SitlUart};
pub use sim::{RunSummary, Simulation};
pub use telemetry::{CsvSink, SimTelemetry};
pub use traffic::TrafficGenerator;
