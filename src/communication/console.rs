//! UART operator console
//!
//! Adapts a [`UartInterface`] to the [`CommandChannel`] used by the command
//! handler. One byte is read per call and replies are written with a CRLF
//! line ending. I/O errors are counted and logged, never propagated: a
//! broken console must not stop the intersection.

use traffic_signal_core::traits::CommandChannel;

use crate::platform::UartInterface;

/// Console statistics for monitoring and diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleStats {
    /// Bytes received
    pub bytes_read: u32,
    /// Reply lines written
    pub lines_written: u32,
    /// UART read errors
    pub read_errors: u32,
    /// UART write errors
    pub write_errors: u32,
}

/// Command channel over a UART
#[derive(Debug)]
pub struct UartConsole<U: UartInterface> {
    uart: U,
    stats: ConsoleStats,
}

impl<U: UartInterface> UartConsole<U> {
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            stats: ConsoleStats::default(),
        }
    }

    /// Get console statistics
    pub fn stats(&self) -> ConsoleStats {
        self.stats
    }

    pub fn uart(&self) -> &U {
        &self.uart
    }

    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    fn write_all(&mut self, data: &[u8]) -> bool {
        let mut remaining = data;
        while !remaining.is_empty() {
            match self.uart.write(remaining) {
                Ok(0) => return false,
                Ok(n) => remaining = &remaining[n.min(remaining.len())..],
                Err(e) => {
                    crate::log_warn!("Console write failed: {:?}", e);
                    return false;
                }
            }
        }
        true
    }
}

impl<U: UartInterface> CommandChannel for UartConsole<U> {
    fn available(&self) -> bool {
        self.uart.available()
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.uart.read(&mut buf) {
            Ok(1) => {
                self.stats.bytes_read = self.stats.bytes_read.saturating_add(1);
                Some(buf[0])
            }
            Ok(_) => None,
            Err(e) => {
                self.stats.read_errors = self.stats.read_errors.saturating_add(1);
                crate::log_warn!("Console read failed: {:?}", e);
                None
            }
        }
    }

    fn write_line(&mut self, line: &str) {
        if self.write_all(line.as_bytes()) && self.write_all(b"\r\n") {
            self.stats.lines_written = self.stats.lines_written.saturating_add(1);
        } else {
            self.stats.write_errors = self.stats.write_errors.saturating_add(1);
        }
    }
}
