//! RP2350 UART implementation
//!
//! Operator console and serial telemetry on RP2350 using the `rp235x-hal`
//! crate.

use crate::platform::{
    error::{PlatformError, UartError},
    traits::{UartConfig, UartInterface},
    Result,
};
use rp235x_hal::uart::UartPeripheral;

/// RP2350 UART implementation
///
/// Wraps the `rp235x-hal` UART peripheral to implement the `UartInterface` trait.
///
/// # Note
///
/// In rp235x-hal, UART configuration is done during the `enable()` call.
/// This wrapper assumes the peripheral has already been enabled with the
/// settings in `config`, which is kept for reporting only.
pub struct Rp2350Uart<D, P>
where
    D: rp235x_hal::uart::UartDevice,
    P: rp235x_hal::uart::ValidUartPinout<D>,
{
    uart: UartPeripheral<rp235x_hal::uart::Enabled, D, P>,
    config: UartConfig,
}

impl<D, P> Rp2350Uart<D, P>
where
    D: rp235x_hal::uart::UartDevice,
    P: rp235x_hal::uart::ValidUartPinout<D>,
{
    /// Wrap an enabled HAL UART
    pub fn new(uart: UartPeripheral<rp235x_hal::uart::Enabled, D, P>, config: UartConfig) -> Self {
        Self { uart, config }
    }

    pub fn config(&self) -> UartConfig {
        self.config
    }
}

impl<D, P> UartInterface for Rp2350Uart<D, P>
where
    D: rp235x_hal::uart::UartDevice,
    P: rp235x_hal::uart::ValidUartPinout<D>,
{
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        // write_full_blocking() writes entire buffer
        self.uart.write_full_blocking(data);
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        // read_raw() would report WouldBlock on an empty FIFO
        if !self.uart.uart_is_readable() {
            return Ok(0);
        }
        self.uart
            .read_raw(buffer)
            .map_err(|_| PlatformError::Uart(UartError::ReadFailed))
    }

    fn available(&self) -> bool {
        self.uart.uart_is_readable()
    }

    fn flush(&mut self) -> Result<()> {
        // Wait until UART is no longer busy (all data transmitted)
        while self.uart.uart_is_busy() {
            core::hint::spin_loop();
        }
        Ok(())
    }
}
