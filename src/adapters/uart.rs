//! UART byte source for the Moppy serial link.
//!
//! Wraps an ESP-IDF [`UartDriver`] behind [`ByteSource`]. Reads always use
//! a zero timeout; the parser only asks for bytes the driver reported as
//! buffered, so nothing here ever waits on the wire.

#[cfg(target_os = "espidf")]
use esp_idf_hal::{delay::NON_BLOCK, sys::EspError, uart::UartDriver};

#[cfg(target_os = "espidf")]
use crate::protocol::ByteSource;

#[cfg(target_os = "espidf")]
pub struct UartSource<'d> {
    uart: UartDriver<'d>,
}

#[cfg(target_os = "espidf")]
impl<'d> UartSource<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }
}

/// Errors from the UART byte source.
#[cfg(target_os = "espidf")]
#[derive(Debug)]
pub enum UartError {
    /// Driver call failed.
    Driver(EspError),
    /// Fewer bytes arrived than were requested.
    ShortRead { wanted: usize, got: usize },
    /// Fewer bytes were queued for transmit than requested.
    ShortWrite { wanted: usize, wrote: usize },
}

#[cfg(target_os = "espidf")]
impl ByteSource for UartSource<'_> {
    type Error = UartError;

    fn bytes_available(&self) -> usize {
        self.uart.remaining_read().unwrap_or(0)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), UartError> {
        let got = self.uart.read(buf, NON_BLOCK).map_err(UartError::Driver)?;
        if got == buf.len() {
            Ok(())
        } else {
            Err(UartError::ShortRead { wanted: buf.len(), got })
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<(), UartError> {
        let wrote = self.uart.write(data).map_err(UartError::Driver)?;
        if wrote == data.len() {
            Ok(())
        } else {
            Err(UartError::ShortWrite { wanted: data.len(), wrote })
        }
    }
}
