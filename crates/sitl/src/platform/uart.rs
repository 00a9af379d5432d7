//! Simulated UART peripheral for SITL.
//!
//! Provides in-memory ring buffers for TX/RX, carrying operator commands
//! in and console replies out.

use std::collections::VecDeque;

use traffic_signal::platform::error::UartError;
use traffic_signal::platform::{PlatformError, UartInterface};

/// Simulated UART with in-memory ring buffers.
#[derive(Debug)]
pub struct SitlUart {
    baud_rate: u32,
    tx_buffer: VecDeque<u8>,
    rx_buffer: VecDeque<u8>,
    capacity: usize,
}

impl SitlUart {
    /// Default buffer capacity in bytes.
    const DEFAULT_CAPACITY: usize = 4096;

    /// Create a new SITL UART with the given baud rate.
    pub fn new(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            tx_buffer: VecDeque::with_capacity(Self::DEFAULT_CAPACITY),
            rx_buffer: VecDeque::with_capacity(Self::DEFAULT_CAPACITY),
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    /// Inject data into the RX buffer (simulating received data).
    pub fn inject_rx_data(&mut self, data: &[u8]) {
        self.rx_buffer.extend(data);
    }

    /// Drain the TX buffer (simulating data being sent).
    pub fn drain_tx(&mut self) -> Vec<u8> {
        self.tx_buffer.drain(..).collect()
    }

    /// Drain the TX buffer as complete CRLF-terminated lines.
    ///
    /// A trailing partial line stays buffered.
    pub fn drain_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(end) = self
            .tx_buffer
            .iter()
            .zip(self.tx_buffer.iter().skip(1))
            .position(|(a, b)| *a == b'\r' && *b == b'\n')
        {
            let line: Vec<u8> = self.tx_buffer.drain(..end).collect();
            self.tx_buffer.drain(..2);
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Get the current baud rate.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

impl UartInterface for SitlUart {
    fn write(&mut self, data: &[u8]) -> traffic_signal::platform::Result<usize> {
        let available = self.capacity.saturating_sub(self.tx_buffer.len());
        if available == 0 && !data.is_empty() {
            return Err(PlatformError::Uart(UartError::Overrun));
        }
        let to_write = data.len().min(available);
        self.tx_buffer.extend(&data[..to_write]);
        Ok(to_write)
    }

    fn read(&mut self, buffer: &mut [u8]) -> traffic_signal::platform::Result<usize> {
        let to_read = buffer.len().min(self.rx_buffer.len());
        for (slot, byte) in buffer.iter_mut().zip(self.rx_buffer.drain(..to_read)) {
            *slot = byte;
        }
        Ok(to_read)
    }

    fn available(&self) -> bool {
        !self.rx_buffer.is_empty()
    }

    fn flush(&mut self) -> traffic_signal::platform::Result<()> {
        // No-op: data is immediately available in the buffer
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_drain() {
        let mut uart = SitlUart::new(9600);
        let written = uart.write(b"Hello").unwrap();
        assert_eq!(written, 5);
        let data = uart.drain_tx();
        assert_eq!(data, b"Hello");
    }

    #[test]
    fn test_inject_and_read() {
        let mut uart = SitlUart::new(9600);
        assert!(!uart.available());

        uart.inject_rx_data(b"sh");
        assert!(uart.available());

        let mut buf = [0u8; 1];
        assert_eq!(uart.read(&mut buf).unwrap(), 1);
        assert_eq!(&buf, b"s");
        assert!(uart.available());
    }

    #[test]
    fn test_drain_lines_keeps_partial() {
        let mut uart = SitlUart::new(9600);
        uart.write(b"Lane 0 count: 1\r\nLane 1 count: 2\r\nLane").unwrap();

        assert_eq!(
            uart.drain_lines(),
            vec!["Lane 0 count: 1".to_string(), "Lane 1 count: 2".to_string()]
        );
        assert_eq!(uart.drain_tx(), b"Lane");
    }

    #[test]
    fn test_full_buffer_overruns() {
        let mut uart = SitlUart::new(9600);
        let big = vec![b'x'; SitlUart::DEFAULT_CAPACITY];
        assert_eq!(uart.write(&big).unwrap(), SitlUart::DEFAULT_CAPACITY);
        assert_eq!(
            uart.write(b"y"),
            Err(PlatformError::Uart(UartError::Overrun))
        );
    }
}
