//! Operator console and telemetry transports
//!
//! # Channels
//!
//! - **Console**: single-byte commands in, CRLF-terminated reply lines out,
//!   over any [`UartInterface`](crate::platform::UartInterface)
//! - **Telemetry**: CSV log entries, either through the logging macros
//!   ([`LogTelemetry`]) or written to a UART ([`UartTelemetry`])
//!
//! # Transport Settings
//!
//! - UART 9600 baud, 8N1 by default (see `UartConfig`)

pub mod console;
pub mod telemetry;

pub use console::{ConsoleStats, UartConsole};
pub use telemetry::{LogTelemetry, UartTelemetry};
