//! Mock UART implementation for testing

use crate::platform::{
    traits::{UartConfig, UartInterface},
    Result,
};
use core::cell::RefCell;
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

/// Mock UART implementation
///
/// Provides in-memory buffers for transmit and receive data,
/// allowing unit tests to verify console traffic without hardware.
///
/// # Example
///
/// ```ignore
/// use traffic_signal::platform::mock::MockUart;
/// use traffic_signal::platform::traits::UartInterface;
///
/// let mut uart = MockUart::new(Default::default());
///
/// uart.write(b"Lane 0 count: 3\r\n").unwrap();
/// assert_eq!(uart.tx_lines(), vec!["Lane 0 count: 3".to_string()]);
///
/// uart.inject_rx_data(b"s");
/// let mut buf = [0u8; 1];
/// assert_eq!(uart.read(&mut buf).unwrap(), 1);
/// assert_eq!(&buf, b"s");
/// ```
#[derive(Debug)]
pub struct MockUart {
    config: UartConfig,
    tx_buffer: RefCell<Vec<u8>>,
    rx_buffer: RefCell<VecDeque<u8>>,
}

impl MockUart {
    /// Create a new mock UART
    pub fn new(config: UartConfig) -> Self {
        Self {
            config,
            tx_buffer: RefCell::new(Vec::new()),
            rx_buffer: RefCell::new(VecDeque::new()),
        }
    }

    /// Get transmitted data (for test verification)
    pub fn tx_buffer(&self) -> Vec<u8> {
        self.tx_buffer.borrow().clone()
    }

    /// Transmitted data split into CRLF-terminated lines
    pub fn tx_lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.tx_buffer.borrow())
            .split("\r\n")
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
            .collect()
    }

    /// Clear transmit buffer
    pub fn clear_tx_buffer(&mut self) {
        self.tx_buffer.borrow_mut().clear();
    }

    /// Inject receive data (for test setup)
    pub fn inject_rx_data(&mut self, data: &[u8]) {
        self.rx_buffer.borrow_mut().extend(data.iter().copied());
    }

    /// Get current baud rate
    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }
}

impl UartInterface for MockUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.tx_buffer.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut rx = self.rx_buffer.borrow_mut();
        let to_read = core::cmp::min(buffer.len(), rx.len());

        for (slot, byte) in buffer.iter_mut().zip(rx.drain(..to_read)) {
            *slot = byte;
        }

        Ok(to_read)
    }

    fn available(&self) -> bool {
        !self.rx_buffer.borrow().is_empty()
    }

    fn flush(&mut self) -> Result<()> {
        // Mock implementation - nothing to flush
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_uart_write() {
        let mut uart = MockUart::new(UartConfig::default());
        let written = uart.write(b"Hello, World!").unwrap();
        assert_eq!(written, 13);
        assert_eq!(uart.tx_buffer(), b"Hello, World!");
    }

    #[test]
    fn test_mock_uart_read() {
        let mut uart = MockUart::new(UartConfig::default());
        uart.inject_rx_data(b"sx");

        let mut buffer = [0u8; 1];
        assert_eq!(uart.read(&mut buffer).unwrap(), 1);
        assert_eq!(&buffer, b"s");
        assert_eq!(uart.read(&mut buffer).unwrap(), 1);
        assert_eq!(&buffer, b"x");
        assert_eq!(uart.read(&mut buffer).unwrap(), 0);
    }

    #[test]
    fn test_mock_uart_available() {
        let mut uart = MockUart::new(UartConfig::default());
        assert!(!uart.available());

        uart.inject_rx_data(b"X");
        assert!(uart.available());

        let mut buf = [0u8; 1];
        uart.read(&mut buf).unwrap();
        assert!(!uart.available());
    }

    #[test]
    fn test_mock_uart_lines() {
        let mut uart = MockUart::new(UartConfig::default());
        uart.write(b"a\r\nb\r\n").unwrap();
        assert_eq!(uart.tx_lines(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(uart.baud_rate(), 9600);

        uart.clear_tx_buffer();
        assert!(uart.tx_lines().is_empty());
    }
}
